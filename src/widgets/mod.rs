pub mod animator;
pub mod goal_bar;
pub mod saved_state;

use crate::gfx::canvas::Canvas;

/// Layout constraint for one axis, carrying the size offered by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    /// The widget must be exactly this size.
    Exactly(u32),
    /// The widget may be at most this size.
    AtMost(u32),
    /// No constraint; the value is only a hint.
    Unspecified(u32),
}

impl MeasureSpec {
    pub fn size(self) -> u32 {
        match self {
            MeasureSpec::Exactly(n) | MeasureSpec::AtMost(n) | MeasureSpec::Unspecified(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub trait Widget {
    fn name(&self) -> &'static str;

    /// Resolves the widget size against the container constraints. The result
    /// has to be applied by the caller.
    #[must_use]
    fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> Size;

    /// Advances animations to the frame time `now` (seconds).
    fn tick(&mut self, now: f64);

    fn render(&self, canvas: &mut dyn Canvas, size: Size);

    /// Returns whether a repaint was requested since the last call, and clears the request.
    fn take_redraw_request(&mut self) -> bool;
}
