//! Virtual window hosting one widget on the panel screen

use alloc::boxed::Box;

use crate::geometry::Size;
use crate::hit_test::HitTestGrid;
use crate::input::{KeyEvent, Reply};
use crate::widget::WidgetSurface;

/// Owned widget hosted by a window
pub type BoxedWidget<T> = Box<dyn WidgetSurface<T>>;

/// Offscreen window sized to the panel
///
/// Owns the hosted widget and the hit-test grid rebuilt on every render.
/// Binding new content schedules a full layout pass (prepass) that is
/// requested from the widget once, on the next render.
pub struct VirtualWindow<T> {
    size: Size,
    content: Option<BoxedWidget<T>>,
    needs_prepass: bool,
    hit_test: HitTestGrid,
}

impl<T> VirtualWindow<T> {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            content: None,
            needs_prepass: false,
            hit_test: HitTestGrid::new(size),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Bind a widget as content root, returning the one it replaces
    pub fn set_content(&mut self, widget: BoxedWidget<T>) -> Option<BoxedWidget<T>> {
        self.needs_prepass = true;
        self.content.replace(widget)
    }

    /// Unbind and return the content root
    pub fn take_content(&mut self) -> Option<BoxedWidget<T>> {
        self.needs_prepass = false;
        self.hit_test.clear();
        self.content.take()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn content_mut(&mut self) -> Option<&mut (dyn WidgetSurface<T> + 'static)> {
        self.content.as_deref_mut()
    }

    /// A full layout pass is pending
    pub fn needs_prepass(&self) -> bool {
        self.needs_prepass
    }

    /// Grid from the last render
    pub fn hit_test(&self) -> &HitTestGrid {
        &self.hit_test
    }

    /// Render the content into `target`
    ///
    /// Returns false when there is nothing to render.
    pub fn render(&mut self, target: &T, delta_time: f32) -> bool {
        let Some(widget) = self.content.as_deref_mut() else {
            return false;
        };
        if self.needs_prepass {
            widget.set_needs_layout(true);
            self.needs_prepass = false;
        }
        self.hit_test.clear();
        widget.render(target, &mut self.hit_test, self.size, delta_time);
        true
    }

    /// Offer a key-down: preview phase first, then normal phase
    pub fn key_down(&mut self, event: &KeyEvent) -> Reply {
        let Some(widget) = self.content.as_deref_mut() else {
            return Reply::Unhandled;
        };
        match widget.on_preview_key_down(event) {
            Reply::Handled => Reply::Handled,
            Reply::Unhandled => widget.on_key_down(event),
        }
    }

    /// Offer a key-up (normal phase only)
    pub fn key_up(&mut self, event: &KeyEvent) -> Reply {
        match self.content.as_deref_mut() {
            Some(widget) => widget.on_key_up(event),
            None => Reply::Unhandled,
        }
    }
}
