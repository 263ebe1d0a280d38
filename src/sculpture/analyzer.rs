//! Aggregate statistics of the point cloud, consumed by the audio mapping.

use glam::Vec3;

use super::Point;

/// Distance that maps to a spread ratio of 1.0
pub const SPREAD_REFERENCE: f32 = 400.0;

/// Axis-aligned extent of the point cloud
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoundingBox {
    pub fn largest_extent(&self) -> f32 {
        self.width.max(self.height).max(self.depth)
    }
}

/// Per-frame description of the sculpture
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SculptureAnalysis {
    pub bounding_box: BoundingBox,

    /// Mean distance of the points from their centroid
    pub average_distance_from_centroid: f32,

    /// `average_distance_from_centroid / 400`
    pub spread_ratio: f32,

    /// Mean displacement since the previous analysis (units per frame)
    pub average_movement: f32,
}

impl SculptureAnalysis {
    /// Half of the largest bounding-box extent, the "size" the cutoff tracks
    pub fn size(&self) -> f32 {
        self.bounding_box.largest_extent() / 2.0
    }
}

/// Computes [`SculptureAnalysis`] and owns the previous-frame snapshot
#[derive(Debug, Default)]
pub struct SculptureAnalyzer {
    previous_positions: Vec<Vec3>,
}

impl SculptureAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the snapshot (a new generation has no movement history)
    pub fn reset(&mut self) {
        self.previous_positions.clear();
    }

    /// Analyze the current positions, then snapshot them for the next call
    pub fn analyze(&mut self, points: &[Point]) -> SculptureAnalysis {
        if points.is_empty() {
            self.previous_positions.clear();
            return SculptureAnalysis::default();
        }

        let count = points.len() as f32;

        let (min, max, sum) = points.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN), Vec3::ZERO),
            |(min, max, sum), point| {
                (
                    min.min(point.position),
                    max.max(point.position),
                    sum + point.position,
                )
            },
        );
        let extent = max - min;
        let centroid = sum / count;

        let average_distance_from_centroid = points
            .iter()
            .map(|point| point.position.distance(centroid))
            .sum::<f32>()
            / count;

        // Points without a snapshot contribute zero movement
        let average_movement = points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                self.previous_positions
                    .get(i)
                    .map_or(0.0, |previous| point.position.distance(*previous))
            })
            .sum::<f32>()
            / count;

        self.previous_positions.clear();
        self.previous_positions
            .extend(points.iter().map(|point| point.position));

        SculptureAnalysis {
            bounding_box: BoundingBox {
                width: extent.x,
                height: extent.y,
                depth: extent.z,
            },
            average_distance_from_centroid,
            spread_ratio: average_distance_from_centroid / SPREAD_REFERENCE,
            average_movement,
        }
    }
}
