//! Point-cloud sculpture: an eased spread from a shared start position, then a
//! persistent-direction random walk bounded by the sculpture volume.

mod analyzer;
mod motion;

pub use analyzer::{BoundingBox, SculptureAnalysis, SculptureAnalyzer, SPREAD_REFERENCE};
pub use motion::{random_unit_vector, MovementState};

use glam::Vec3;
use rand::Rng;

use crate::params::SculptureParams;

/// Cubic ease-in-out over `t` in [0, 1]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Uniformly random position inside the sculpture volume
pub fn random_position<R: Rng + ?Sized>(params: &SculptureParams, rng: &mut R) -> Vec3 {
    let lateral = params.lateral_bound;
    Vec3::new(
        rng.gen_range(-lateral..=lateral),
        rng.gen_range(-lateral..=lateral),
        rng.gen_range(0.0..=params.depth_bound),
    )
}

/// A single sculpture point
#[derive(Debug, Clone)]
pub struct Point {
    pub position: Vec3,

    /// Where the spread phase delivers this point
    pub target: Vec3,

    /// Free-roam state, allocated once the spread phase ends
    pub movement: Option<MovementState>,
}

impl Point {
    pub fn new(start: Vec3, target: Vec3) -> Self {
        Self {
            position: start,
            target,
            movement: None,
        }
    }
}

/// One generation of points sharing a start position and start time
pub struct Sculpture {
    points: Vec<Point>,
    start_position: Vec3,
    start_time_ms: f64,
    params: SculptureParams,
}

impl Sculpture {
    /// Create a sculpture of `count` points (clamped to the allowed range)
    pub fn new<R: Rng + ?Sized>(
        params: SculptureParams,
        count: usize,
        now_ms: f64,
        rng: &mut R,
    ) -> Self {
        let mut sculpture = Self {
            points: Vec::new(),
            start_position: Vec3::ZERO,
            start_time_ms: now_ms,
            params,
        };
        sculpture.restart(count, now_ms, rng);
        sculpture
    }

    /// Replace the whole point set with a fresh generation
    ///
    /// The new points, start position and start time are built first and
    /// swapped in together, so no frame ever sees a mixed generation.
    ///
    /// # Returns
    /// The point count actually used after clamping
    pub fn restart<R: Rng + ?Sized>(&mut self, count: usize, now_ms: f64, rng: &mut R) -> usize {
        let count = self.params.clamp_point_count(count);
        let start_position = random_position(&self.params, rng);
        let points: Vec<Point> = (0..count)
            .map(|_| Point::new(start_position, random_position(&self.params, rng)))
            .collect();

        self.points = points;
        self.start_position = start_position;
        self.start_time_ms = now_ms;

        log::debug!(
            "New generation: {} points from ({:.1}, {:.1}, {:.1})",
            count,
            start_position.x,
            start_position.y,
            start_position.z
        );
        count
    }

    /// Advance every point to clock time `now_ms`
    ///
    /// During the spread phase positions are a pure function of elapsed time.
    /// Afterwards each point walks along its own persistent direction.
    pub fn advance<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        let elapsed_ms = now_ms - self.start_time_ms;
        let params = &self.params;

        if elapsed_ms < params.spread_duration_ms {
            let progress = (elapsed_ms / params.spread_duration_ms).clamp(0.0, 1.0) as f32;
            let eased = ease_in_out_cubic(progress);
            for point in &mut self.points {
                point.position = self.start_position.lerp(point.target, eased);
            }
        } else {
            for point in &mut self.points {
                point.roam(now_ms, params, rng);
            }
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    pub fn start_time_ms(&self) -> f64 {
        self.start_time_ms
    }

    pub fn params(&self) -> &SculptureParams {
        &self.params
    }

    /// Whether the spread phase is still running at `now_ms`
    pub fn is_spreading(&self, now_ms: f64) -> bool {
        now_ms - self.start_time_ms < self.params.spread_duration_ms
    }
}
