//! Point-cloud simulation parameters.

use std::ops::RangeInclusive;

/// Sculpture simulation parameters (space units are projector pixels at z = 0)
#[derive(Debug, Clone)]
pub struct SculptureParams {
    /// Half-extent of the x and y axes (points live in [-bound, bound])
    pub lateral_bound: f32,

    /// Depth of the z axis (points live in [0, depth])
    pub depth_bound: f32,

    /// Duration of the initial spread from the shared start position (milliseconds)
    pub spread_duration_ms: f64,

    /// Free-roam speed range (units per frame)
    pub speed_range: (f32, f32),

    /// Interval between direction changes (milliseconds)
    pub direction_change_ms: (f64, f64),

    /// Weight of the freshly drawn direction when blending (0..1)
    pub direction_blend: f32,

    /// Maximum jitter applied to the non-offending axes on a bounce
    pub bounce_jitter: f32,

    /// Allowed point counts for a sculpture
    pub point_count_range: RangeInclusive<usize>,

    /// Point count of the first sculpture
    pub initial_point_count: usize,
}

impl Default for SculptureParams {
    fn default() -> Self {
        Self {
            lateral_bound: 400.0,
            depth_bound: 400.0,
            spread_duration_ms: 3000.0,
            speed_range: (0.5, 2.0),
            direction_change_ms: (2000.0, 7000.0),
            direction_blend: 0.05,
            bounce_jitter: 0.1,
            point_count_range: 3..=55,
            initial_point_count: 8,
        }
    }
}

impl SculptureParams {
    /// Clamp a requested point count into the allowed range
    pub fn clamp_point_count(&self, count: usize) -> usize {
        count.clamp(
            *self.point_count_range.start(),
            *self.point_count_range.end(),
        )
    }
}
