//! Widget surface trait
//!
//! Implemented by the host's UI root. `T` is the render target type of the
//! readback backend in use.

use crate::geometry::Size;
use crate::hit_test::HitTestGrid;
use crate::input::{KeyEvent, Reply};

/// UI root that can be hosted on the panel screen
pub trait WidgetSurface<T> {
    /// Render one frame into `target`
    ///
    /// `hit_test` is cleared before the call; register painted widgets in it.
    /// `delta_time` is seconds since the previous tick.
    fn render(&mut self, target: &T, hit_test: &mut HitTestGrid, size: Size, delta_time: f32);

    /// Request (or cancel) a full layout pass before the next render
    fn set_needs_layout(&mut self, needs_layout: bool);

    /// Key-down tunnelling phase, offered before [`on_key_down`](Self::on_key_down)
    fn on_preview_key_down(&mut self, _event: &KeyEvent) -> Reply {
        Reply::Unhandled
    }

    fn on_key_down(&mut self, _event: &KeyEvent) -> Reply {
        Reply::Unhandled
    }

    fn on_key_up(&mut self, _event: &KeyEvent) -> Reply {
        Reply::Unhandled
    }
}
