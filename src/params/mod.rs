//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (milliseconds, Hz, pixels, etc.)
//! - Documented ranges and meanings
//! - The mapping formulas they feed

mod audio;
mod render;
mod sculpture;

// Re-export all types
pub use audio::AudioConfig;
pub use render::{RecordingConfig, RenderConfig, Rgba};
pub use sculpture::SculptureParams;
