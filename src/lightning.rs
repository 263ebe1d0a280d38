//! Jagged "lightning" polylines between projected points.
//!
//! Every line gets one intensity from the active [`LineMode`]; interior
//! vertices are then pushed sideways by an independent random amount that
//! peaks at the middle of the line and vanishes at the endpoints.

use std::f32::consts::PI;
use std::fmt;

use glam::Vec2;
use rand::Rng;

/// Planar distance that maps to a normalized distance of 1.0 (pixels)
pub const DISTANCE_REFERENCE: f32 = 500.0;

/// Distance from the viewport centre that maps to a factor of 1.0 (pixels)
pub const CENTER_REFERENCE: f32 = 400.0;

/// Sub-mode of [`LineMode::Distance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    /// Farther apart → more electric
    Normal,
    /// Closer together → more electric
    Inverse,
}

/// Intensity model of the lightning lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    Distance(DistanceMode),
    Center,
    Random,
    Wave,
}

impl LineMode {
    /// Every mode, with distance in its normal sub-mode
    pub const ALL: [LineMode; 4] = [
        LineMode::Distance(DistanceMode::Normal),
        LineMode::Center,
        LineMode::Random,
        LineMode::Wave,
    ];

    /// Short mode name ("distance", "center", ...)
    pub fn name(&self) -> &'static str {
        match self {
            LineMode::Distance(_) => "distance",
            LineMode::Center => "center",
            LineMode::Random => "random",
            LineMode::Wave => "wave",
        }
    }

    /// Human-readable control label, e.g. `Lines: distance (inverse)`
    pub fn label(&self) -> String {
        match self {
            LineMode::Distance(DistanceMode::Normal) => "Lines: distance (normal)".to_string(),
            LineMode::Distance(DistanceMode::Inverse) => "Lines: distance (inverse)".to_string(),
            other => format!("Lines: {}", other.name()),
        }
    }

    /// One-sentence explanation of what the mode does
    pub fn description(&self) -> &'static str {
        match self {
            LineMode::Distance(DistanceMode::Normal) => {
                "Distance Mode (Normal): Lines become more electric as dots move further apart."
            }
            LineMode::Distance(DistanceMode::Inverse) => {
                "Distance Mode (Inverse): Lines become more electric as dots move closer together."
            }
            LineMode::Center => {
                "Center Mode: Lines become more electric as dots move away from the center of the canvas."
            }
            LineMode::Random => {
                "Random Mode: Each line has a randomly assigned electric intensity."
            }
            LineMode::Wave => {
                "Wave Mode: Line intensity pulses over time, creating flowing electric patterns."
            }
        }
    }

    /// Draw a mode uniformly; distance picks its sub-mode with a fair coin
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => {
                if rng.gen_bool(0.5) {
                    LineMode::Distance(DistanceMode::Normal)
                } else {
                    LineMode::Distance(DistanceMode::Inverse)
                }
            }
            1 => LineMode::Center,
            2 => LineMode::Random,
            _ => LineMode::Wave,
        }
    }
}

impl fmt::Display for LineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineMode::Distance(DistanceMode::Normal) => write!(f, "distance"),
            LineMode::Distance(DistanceMode::Inverse) => write!(f, "distance-inverse"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Lightning style shared by every line in a frame
#[derive(Debug, Clone, PartialEq)]
pub struct LineEffectConfig {
    pub mode: LineMode,

    /// Number of segments per line (at least 2)
    pub base_segments: u32,

    /// Peak sideways displacement before the mode factor (pixels, >= 0)
    pub base_intensity: f32,

    /// Time scale of the wave mode (> 0)
    pub speed_multiplier: f32,
}

impl Default for LineEffectConfig {
    fn default() -> Self {
        Self {
            mode: LineMode::Distance(DistanceMode::Normal),
            base_segments: 12,
            base_intensity: 30.0,
            speed_multiplier: 1.0,
        }
    }
}

impl LineEffectConfig {
    /// Fresh random style: any mode, 5..=19 segments, intensity 10..60, speed 0.5..2.5
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            mode: LineMode::random(rng),
            base_segments: rng.gen_range(5..=19),
            base_intensity: rng.gen_range(10.0..60.0),
            speed_multiplier: rng.gen_range(0.5..2.5),
        }
    }

    /// Default style in a specific mode
    pub fn with_mode(mode: LineMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn segments(&self) -> usize {
        self.base_segments.max(2) as usize
    }
}

/// Frame-wide inputs of the intensity models
#[derive(Debug, Clone, Copy)]
pub struct LineField {
    /// Viewport centre (pixels), used by the center mode
    pub center: Vec2,

    /// Clock time (seconds), used by the wave mode
    pub time_s: f32,
}

/// Intensity of the line from `start` to `end`
pub fn line_intensity<R: Rng + ?Sized>(
    start: Vec2,
    end: Vec2,
    config: &LineEffectConfig,
    field: &LineField,
    rng: &mut R,
) -> f32 {
    let factor = match config.mode {
        LineMode::Distance(sub_mode) => distance_factor(start, end, sub_mode),
        LineMode::Center => start.distance(field.center) / CENTER_REFERENCE,
        LineMode::Random => rng.gen_range(0.5..=1.5),
        LineMode::Wave => {
            let phase = field.time_s * config.speed_multiplier + (start.x + start.y) * 0.01;
            (1.0 + phase.sin()) / 2.0
        }
    };
    config.base_intensity * factor
}

fn distance_factor(start: Vec2, end: Vec2, sub_mode: DistanceMode) -> f32 {
    let normalized = start.distance(end) / DISTANCE_REFERENCE;
    match sub_mode {
        DistanceMode::Normal => normalized,
        DistanceMode::Inverse => 1.0 - 0.5 * normalized,
    }
}

/// Squared mean line intensity relative to the base intensity
///
/// Only the distance modes vary per pair; every other mode counts each line at
/// full base intensity. No pairs gives 0.
pub fn intensity_factor(projected: &[Vec2], config: &LineEffectConfig) -> f32 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, &start) in projected.iter().enumerate() {
        for &end in &projected[i + 1..] {
            total += match config.mode {
                LineMode::Distance(sub_mode) => distance_factor(start, end, sub_mode),
                _ => 1.0,
            };
            pairs += 1;
        }
    }
    if pairs == 0 {
        return 0.0;
    }
    (total / pairs as f32).powi(2)
}

/// Build the lightning polyline from `start` to `end`
///
/// # Returns
/// `segments + 1` vertices; the first is exactly `start` and the last exactly `end`
pub fn generate<R: Rng + ?Sized>(
    start: Vec2,
    end: Vec2,
    config: &LineEffectConfig,
    field: &LineField,
    rng: &mut R,
) -> Vec<Vec2> {
    let segments = config.segments();
    let intensity = line_intensity(start, end, config, field, rng);

    let delta = end - start;
    let normal = delta.perp().try_normalize().unwrap_or(Vec2::Y);

    let mut vertices = Vec::with_capacity(segments + 1);
    vertices.push(start);
    for i in 1..segments {
        let t = i as f32 / segments as f32;
        let base = start + delta * t;
        let displacement = intensity * (t * PI).sin();
        let offset: f32 = rng.gen_range(-0.5..=0.5);
        vertices.push(base + normal * offset * displacement);
    }
    vertices.push(end);
    vertices
}
