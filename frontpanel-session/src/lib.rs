//! Front panel session
//!
//! Ties the core pipeline to a host application. The [`PanelSession`] lives
//! in the simulation context: it owns the hosted widget, polls buttons and
//! drives the lights. Screen work is handed to a [`PanelPresenter`] in the
//! presentation context through a [`RenderChannel`], which the host drains
//! once per tick after the session has ticked.
//!
//! ```ignore
//! let (mut session, mut presenter) = PanelSession::new(panel, gpu, sink, config);
//! session.set_screen_widget(Some(Box::new(menu)));
//! loop {
//!     session.tick(delta_time);
//!     presenter.process_pending();
//! }
//! ```

#![deny(unsafe_code)]

// Must come first so the macros are visible to the other modules
mod fmt;

pub mod channel;
pub mod config;
pub mod input;
pub mod presenter;
pub mod session;

pub use channel::{RenderChannel, RenderCommand};
pub use config::{load_config, load_config_file, load_or_default, ConfigError};
pub use input::InputSink;
pub use presenter::PanelPresenter;
pub use session::{PanelSession, ScreenSupport};
