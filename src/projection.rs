//! Fixed-focal-length perspective projection onto the drawing surface.

use glam::{Vec2, Vec3};

/// Focal length of the sculpture projection (pixels)
pub const FOCAL_LENGTH: f32 = 400.0;

/// Drawing-surface dimensions (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Maps sculpture space to screen space
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    focal_length: f32,
    viewport: Viewport,
}

impl Projector {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            focal_length: FOCAL_LENGTH,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Project a point; depth shrinks it toward the viewport centre
    ///
    /// Callers keep `z > -focal_length` (the sculpture keeps z in [0, 400]).
    pub fn project(&self, point: Vec3) -> Vec2 {
        let factor = self.focal_length / (self.focal_length + point.z);
        Vec2::new(point.x, point.y) * factor + self.viewport.center()
    }
}
