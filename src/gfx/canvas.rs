use super::math::{Color, Rect, Vec2};
use std::fmt;

/// Stroke/fill settings for a single draw call. Shapes are always filled and stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub stroke_width: f32,
}

impl Paint {
    pub fn new(color: Color, stroke_width: f32) -> Self {
        Self { color, stroke_width }
    }
}

/// Drawing surface the widgets paint onto, in pixel coordinates with the origin top-left.
pub trait Canvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint);
    fn draw_rect(&mut self, rect: Rect, paint: &Paint);
    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line { from: Vec2, to: Vec2, paint: Paint },
    Rect { rect: Rect, paint: Paint },
    Circle { center: Vec2, radius: f32, paint: Paint },
}

impl DrawOp {
    pub fn paint(&self) -> &Paint {
        match self {
            DrawOp::Line { paint, .. } | DrawOp::Rect { paint, .. } | DrawOp::Circle { paint, .. } => paint,
        }
    }
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.paint();
        let c = p.color;
        match self {
            DrawOp::Line { from, to, .. } => write!(
                f,
                "line ({}, {}) -> ({}, {})",
                from.x, from.y, to.x, to.y
            )?,
            DrawOp::Rect { rect, .. } => write!(
                f,
                "rect ({}, {}) -> ({}, {})",
                rect.x,
                rect.y,
                rect.right(),
                rect.bottom()
            )?,
            DrawOp::Circle { center, radius, .. } => write!(
                f,
                "circle ({}, {}) r={}",
                center.x, center.y, radius
            )?,
        }
        write!(
            f,
            " stroke={} rgba=({:.2}, {:.2}, {:.2}, {:.2})",
            p.stroke_width, c.r, c.g, c.b, c.a
        )
    }
}

/// Canvas that records draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct DrawList {
    pub ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for DrawList {
    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) {
        self.ops.push(DrawOp::Line { from, to, paint: *paint });
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::Rect { rect, paint: *paint });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.ops.push(DrawOp::Circle { center, radius, paint: *paint });
    }
}
