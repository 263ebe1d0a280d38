//! Scene drawing: every point pair joined by lightning, then the point markers.
//!
//! Drawing goes through the [`Canvas`] trait. [`FrameMesh`] is the canvas used
//! on screen: it tessellates strokes and markers into coloured triangles that
//! the render system uploads as one vertex buffer.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

use crate::lightning::{self, LineEffectConfig, LineField};
use crate::params::{RenderConfig, Rgba};
use crate::projection::Projector;
use crate::sculpture::Point;

/// Triangles per marker disc
const MARKER_SEGMENTS: usize = 16;

/// 2D drawing surface
pub trait Canvas {
    /// Surface dimensions (pixels)
    fn size(&self) -> Vec2;

    fn clear(&mut self, color: Rgba);

    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// Vertex data for scene triangles (pixel position + colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Triangle-list tessellation of one frame
#[derive(Debug, Clone)]
pub struct FrameMesh {
    size: Vec2,
    clear_color: Rgba,
    vertices: Vec<Vertex>,
}

impl FrameMesh {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
        for corner in [a, b, c] {
            self.vertices.push(Vertex {
                position: corner.to_array(),
                color,
            });
        }
    }
}

impl Canvas for FrameMesh {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.vertices.clear();
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, width: f32) {
        let half_width = width / 2.0;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let Some(direction) = (b - a).try_normalize() else {
                continue;
            };
            let offset = direction.perp() * half_width;
            self.push_triangle(a + offset, a - offset, b + offset, color);
            self.push_triangle(b + offset, a - offset, b - offset, color);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        for i in 0..MARKER_SEGMENTS {
            let a0 = TAU * i as f32 / MARKER_SEGMENTS as f32;
            let a1 = TAU * (i + 1) as f32 / MARKER_SEGMENTS as f32;
            let p0 = center + Vec2::from_angle(a0) * radius;
            let p1 = center + Vec2::from_angle(a1) * radius;
            self.push_triangle(center, p0, p1, color);
        }
    }
}

/// Draws the sculpture onto a [`Canvas`]; never touches simulation state
pub struct SceneRenderer {
    config: RenderConfig,
}

impl SceneRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw one frame
    ///
    /// # Arguments
    /// * `canvas` - Target surface
    /// * `points` - Current sculpture points
    /// * `projector` - Projection for the canvas viewport
    /// * `lines` - Active lightning style
    /// * `time_s` - Clock time (seconds), drives the wave mode
    /// * `rng` - Random source for the lightning jitter
    ///
    /// # Returns
    /// Number of lightning lines drawn
    pub fn draw<C, R>(
        &self,
        canvas: &mut C,
        points: &[Point],
        projector: &Projector,
        lines: &LineEffectConfig,
        time_s: f32,
        rng: &mut R,
    ) -> usize
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        canvas.clear(self.config.background);

        let projected: Vec<Vec2> = points
            .iter()
            .map(|point| projector.project(point.position))
            .collect();
        let field = LineField {
            center: projector.viewport().center(),
            time_s,
        };

        let mut line_count = 0;
        for (i, &start) in projected.iter().enumerate() {
            for &end in &projected[i + 1..] {
                let bolt = lightning::generate(start, end, lines, &field, rng);
                canvas.stroke_polyline(&bolt, self.config.line_color, self.config.line_width);
                line_count += 1;
            }
        }

        let radius = self.config.marker_radius(canvas.size().x);
        for &center in &projected {
            canvas.fill_circle(center, radius, self.config.marker_color);
        }

        line_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Viewport;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Stroke(usize),
        Circle(Vec2, f32),
    }

    struct Recorder {
        size: Vec2,
        ops: Vec<Op>,
    }

    impl Canvas for Recorder {
        fn size(&self) -> Vec2 {
            self.size
        }

        fn clear(&mut self, _color: Rgba) {
            self.ops.push(Op::Clear);
        }

        fn stroke_polyline(&mut self, points: &[Vec2], _color: Rgba, _width: f32) {
            self.ops.push(Op::Stroke(points.len()));
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Rgba) {
            self.ops.push(Op::Circle(center, radius));
        }
    }

    fn points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let p = Vec3::new(i as f32 * 40.0 - 100.0, 20.0, i as f32 * 10.0);
                Point::new(p, p)
            })
            .collect()
    }

    #[test]
    fn test_draw_order_and_pair_count() {
        let renderer = SceneRenderer::new(RenderConfig::default());
        let projector = Projector::new(Viewport::new(1280.0, 720.0));
        let mut canvas = Recorder {
            size: Vec2::new(1280.0, 720.0),
            ops: Vec::new(),
        };
        let lines = LineEffectConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        let drawn = renderer.draw(&mut canvas, &points(5), &projector, &lines, 0.0, &mut rng);

        assert_eq!(drawn, 10);
        assert_eq!(canvas.ops[0], Op::Clear);
        let strokes = &canvas.ops[1..11];
        assert!(strokes.iter().all(|op| *op == Op::Stroke(13)));
        let circles = &canvas.ops[11..];
        assert_eq!(circles.len(), 5);
        assert!(circles
            .iter()
            .all(|op| matches!(op, Op::Circle(_, r) if *r == 3.0)));
    }

    #[test]
    fn test_draw_does_not_mutate_points() {
        let renderer = SceneRenderer::new(RenderConfig::default());
        let projector = Projector::new(Viewport::new(800.0, 600.0));
        let mut canvas = FrameMesh::new(Vec2::new(800.0, 600.0));
        let lines = LineEffectConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let before = points(4);
        let after = before.clone();

        renderer.draw(&mut canvas, &after, &projector, &lines, 0.0, &mut rng);

        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_empty_and_single_point_scenes() {
        let renderer = SceneRenderer::new(RenderConfig::default());
        let projector = Projector::new(Viewport::new(400.0, 400.0));
        let mut canvas = FrameMesh::new(Vec2::new(400.0, 400.0));
        let lines = LineEffectConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(renderer.draw(&mut canvas, &[], &projector, &lines, 0.0, &mut rng), 0);
        assert!(canvas.vertices().is_empty());

        assert_eq!(renderer.draw(&mut canvas, &points(1), &projector, &lines, 0.0, &mut rng), 0);
        assert_eq!(canvas.vertices().len(), MARKER_SEGMENTS * 3);
    }

    #[test]
    fn test_mesh_tessellation() {
        let mut mesh = FrameMesh::new(Vec2::new(100.0, 100.0));
        let color = [1.0, 1.0, 1.0, 0.5];

        mesh.stroke_polyline(
            &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            color,
            2.0,
        );
        // Two quads of two triangles each
        assert_eq!(mesh.vertices().len(), 12);
        assert!(mesh
            .vertices()
            .iter()
            .take(6)
            .all(|v| v.position[1].abs() <= 1.0 + 1e-6));

        // Zero-length segments are skipped
        mesh.stroke_polyline(&[Vec2::ONE, Vec2::ONE], color, 2.0);
        assert_eq!(mesh.vertices().len(), 12);

        mesh.clear([0.0, 0.0, 0.0, 1.0]);
        assert!(mesh.vertices().is_empty());
    }
}
