use super::canvas::{Canvas, Paint};
use super::math::{Color, Rect, Vec2};
use anyhow::Result;
use glow::HasContext;

const CIRCLE_SEGMENTS: usize = 48;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
}

/// Butt-capped quad covering a stroked segment. Zero-length segments produce nothing.
pub fn line_vertices(from: Vec2, to: Vec2, width: f32) -> Vec<Vertex> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON || width <= 0.0 {
        return Vec::new();
    }

    // half-width normal
    let nx = -dy / len * width * 0.5;
    let ny = dx / len * width * 0.5;

    let a = [from.x + nx, from.y + ny];
    let b = [to.x + nx, to.y + ny];
    let c = [to.x - nx, to.y - ny];
    let d = [from.x - nx, from.y - ny];

    [a, b, c, a, c, d].map(|pos| Vertex { pos }).to_vec()
}

pub fn rect_vertices(rect: Rect) -> Vec<Vertex> {
    let (x, y) = (rect.x, rect.y);
    let (x2, y2) = (rect.right(), rect.bottom());

    [[x, y], [x2, y], [x2, y2], [x, y], [x2, y2], [x, y2]]
        .map(|pos| Vertex { pos })
        .to_vec()
}

/// Filled disc as a list of independent triangles around the center.
pub fn circle_vertices(center: Vec2, radius: f32, segments: usize) -> Vec<Vertex> {
    if radius <= 0.0 || segments < 3 {
        return Vec::new();
    }

    let point = |i: usize| {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        [center.x + radius * angle.cos(), center.y + radius * angle.sin()]
    };

    let mut vertices = Vec::with_capacity(segments * 3);
    for i in 0..segments {
        vertices.push(Vertex { pos: [center.x, center.y] });
        vertices.push(Vertex { pos: point(i) });
        vertices.push(Vertex { pos: point(i + 1) });
    }
    vertices
}

pub struct DrawContext {
    gl: glow::Context,
    program: glow::Program,
    vbo: glow::Buffer,
    vertices: Vec<Vertex>,

    // Uniform locations
    u_viewport: Option<glow::UniformLocation>,
    u_color: Option<glow::UniformLocation>,
}

impl DrawContext {
    pub fn new(gl: glow::Context, program: glow::Program) -> Result<Self> {
        let vbo = unsafe {
            gl.create_buffer()
                .map_err(|e| anyhow::anyhow!("Failed to create buffer: {}", e))?
        };

        // GLES2 has no VAOs; attributes are bound on every flush
        let u_viewport = unsafe { gl.get_uniform_location(program, "uViewport") };
        let u_color = unsafe { gl.get_uniform_location(program, "uColor") };

        Ok(Self {
            gl,
            program,
            vbo,
            vertices: Vec::with_capacity(256),
            u_viewport,
            u_color,
        })
    }

    pub fn begin(&mut self, viewport_px: [f32; 2], background: Color) {
        self.vertices.clear();

        unsafe {
            self.gl.viewport(0, 0, viewport_px[0] as i32, viewport_px[1] as i32);
            self.gl.clear_color(background.r, background.g, background.b, background.a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);

            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            self.gl.use_program(Some(self.program));
            if let Some(loc) = self.u_viewport {
                self.gl.uniform_2_f32(Some(&loc), viewport_px[0], viewport_px[1]);
            }
        }
    }

    fn submit(&mut self, vertices: Vec<Vertex>, color: Color) {
        if vertices.is_empty() {
            return;
        }
        self.vertices.extend(vertices);
        self.set_color(color);
        self.flush_batch();
    }

    fn set_color(&mut self, color: Color) {
        unsafe {
            if let Some(loc) = self.u_color {
                self.gl.uniform_4_f32(Some(&loc), color.r, color.g, color.b, color.a);
            }
        }
    }

    fn flush_batch(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));

            let data = bytemuck::cast_slice(&self.vertices);
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::DYNAMIC_DRAW);

            let stride = std::mem::size_of::<Vertex>() as i32;

            if let Some(a_pos) = self.gl.get_attrib_location(self.program, "aPos") {
                self.gl.enable_vertex_attrib_array(a_pos);
                self.gl.vertex_attrib_pointer_f32(a_pos, 2, glow::FLOAT, false, stride, 0);
            }

            self.gl.draw_arrays(glow::TRIANGLES, 0, self.vertices.len() as i32);
        }

        self.vertices.clear();
    }

    pub fn flush(&mut self) {
        self.flush_batch();
    }
}

impl Canvas for DrawContext {
    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) {
        self.submit(line_vertices(from, to, paint.stroke_width), paint.color);
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        let outer = rect.outset(paint.stroke_width * 0.5);
        self.submit(rect_vertices(outer), paint.color);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let outer = radius + paint.stroke_width * 0.5;
        self.submit(circle_vertices(center, outer, CIRCLE_SEGMENTS), paint.color);
    }
}

impl Drop for DrawContext {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (f32, f32, f32, f32) {
        vertices.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(l, t, r, b), v| (l.min(v.pos[0]), t.min(v.pos[1]), r.max(v.pos[0]), b.max(v.pos[1])),
        )
    }

    #[test]
    fn horizontal_line_is_butt_capped_quad() {
        let v = line_vertices(Vec2::new(0.0, 10.0), Vec2::new(60.0, 10.0), 4.0);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (0.0, 8.0, 60.0, 12.0));
    }

    #[test]
    fn vertical_line_spans_its_length() {
        let v = line_vertices(Vec2::new(100.0, 15.0), Vec2::new(100.0, 25.0), 5.0);
        assert_eq!(bounds(&v), (97.5, 15.0, 102.5, 25.0));
    }

    #[test]
    fn degenerate_line_emits_nothing() {
        assert!(line_vertices(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 4.0).is_empty());
        assert!(line_vertices(Vec2::new(0.0, 5.0), Vec2::new(5.0, 5.0), 0.0).is_empty());
    }

    #[test]
    fn circle_stays_within_radius() {
        let c = Vec2::new(50.0, 20.0);
        let v = circle_vertices(c, 20.0, 32);
        assert_eq!(v.len(), 32 * 3);
        for vert in &v {
            let dx = vert.pos[0] - c.x;
            let dy = vert.pos[1] - c.y;
            assert!((dx * dx + dy * dy).sqrt() <= 20.0 + 1e-3);
        }
        let (l, _, r, _) = bounds(&v);
        assert!((l - 30.0).abs() < 1e-3 && (r - 70.0).abs() < 1e-3);
    }

    #[test]
    fn rect_covers_its_corners() {
        let v = rect_vertices(Rect::from_ltrb(95.0, 0.0, 105.0, 10.0).outset(2.5));
        assert_eq!(bounds(&v), (92.5, -2.5, 107.5, 12.5));
    }
}
