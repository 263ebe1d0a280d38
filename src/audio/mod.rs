//! Drone synthesis and sculpture-to-sound mapping.
//!
//! Looping noise runs through a resonant lowpass into a gain stage. The mapper
//! retargets cutoff, resonance and level from the sculpture analysis every
//! frame; the chain glides to the targets on its own sample clock.

mod chain;
mod error;
mod mapper;
mod ramp;
mod system;

// Re-export public types
pub use chain::{LowPassFilter, NoiseSource, SignalChain};
pub use error::AudioError;
pub use mapper::{frequency_modulation, AudioMapper, DroneTargets, SoundState};
pub use ramp::{AutomatedParam, RampShape};
pub use system::AudioSystem;
