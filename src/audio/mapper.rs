//! Maps sculpture statistics onto the drone's cutoff, resonance and level.

use rand::Rng;

use super::error::AudioError;
use super::system::AudioSystem;
use crate::lightning::{DistanceMode, LineEffectConfig, LineMode};
use crate::params::AudioConfig;
use crate::sculpture::{SculptureAnalysis, SPREAD_REFERENCE};

/// Sound on/off state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    Disabled,
    Enabled,
}

/// Parameter targets for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneTargets {
    pub cutoff_hz: f32,
    pub q: f32,
    pub gain: f32,
}

impl DroneTargets {
    /// Targets from the sculpture statistics alone
    pub fn from_analysis(analysis: &SculptureAnalysis, config: &AudioConfig) -> Self {
        Self::modulated(analysis, 1.0, config)
    }

    /// Targets with the cutoff scaled by a line-mode factor before clamping
    ///
    /// Bigger sculptures get darker, busier ones brighter; spread opens up
    /// resonance and level.
    pub fn modulated(analysis: &SculptureAnalysis, factor: f32, config: &AudioConfig) -> Self {
        let size = finite_or_zero(analysis.size());
        let movement = finite_or_zero(analysis.average_movement);
        let spread_ratio = finite_or_zero(analysis.spread_ratio);

        let (cutoff_min, cutoff_max) = config.cutoff_range_hz;
        let closeness = (1.0 - size / SPREAD_REFERENCE).clamp(0.0, 1.0);
        let cutoff_hz = cutoff_min
            + (cutoff_max - cutoff_min) * closeness.powf(1.5)
            + movement * config.movement_to_cutoff_hz;

        let (q_min, q_max) = config.q_range;
        let q = q_min + (q_max - q_min) * spread_ratio;

        let gain = (config.base_gain
            + movement * config.movement_to_gain
            + spread_ratio * config.spread_to_gain)
            .min(config.max_gain);

        Self {
            cutoff_hz: (cutoff_hz * finite_or_zero(factor)).clamp(cutoff_min, cutoff_max),
            q,
            gain,
        }
    }
}

/// Cutoff multiplier for the active line style
///
/// # Arguments
/// * `lines` - Active lightning style
/// * `intensity_factor` - Squared mean line intensity (see [`crate::lightning::intensity_factor`])
/// * `time_s` - Clock time (seconds), drives the wave mode
/// * `rng` - Random source for the random mode
pub fn frequency_modulation<R: Rng + ?Sized>(
    lines: &LineEffectConfig,
    intensity_factor: f32,
    time_s: f32,
    rng: &mut R,
) -> f32 {
    let intensity_factor = finite_or_zero(intensity_factor).max(0.0);
    match lines.mode {
        LineMode::Wave => 1.0 + (time_s * lines.speed_multiplier).sin() * 0.5,
        LineMode::Random => rng.gen_range(0.5..=1.5),
        LineMode::Distance(DistanceMode::Normal) => 1.0 + intensity_factor * 0.5,
        LineMode::Distance(DistanceMode::Inverse) => 1.0 / (1.0 + intensity_factor * 0.3),
        LineMode::Center => 1.0,
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

type AudioOpener = Box<dyn FnMut(&AudioConfig) -> Result<AudioSystem, AudioError>>;

/// Owns the drone and drives its parameters from the sculpture
///
/// The audio system is opened on the first enable. If opening fails the
/// mapper stays disabled; the next enable tries again.
pub struct AudioMapper {
    config: AudioConfig,
    state: SoundState,
    system: Option<AudioSystem>,
    opener: AudioOpener,
    /// Chain clock at the last enable, for the fade-in envelope
    fade_in_start_s: f64,
}

impl AudioMapper {
    /// Mapper that opens the default output device
    pub fn new(config: AudioConfig) -> Self {
        Self::with_opener(config, |config| AudioSystem::open(config, None))
    }

    /// Mapper with a custom way of opening the audio system
    pub fn with_opener(
        config: AudioConfig,
        opener: impl FnMut(&AudioConfig) -> Result<AudioSystem, AudioError> + 'static,
    ) -> Self {
        Self {
            config,
            state: SoundState::Disabled,
            system: None,
            opener: Box::new(opener),
            fade_in_start_s: 0.0,
        }
    }

    pub fn state(&self) -> SoundState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == SoundState::Enabled
    }

    pub fn system(&self) -> Option<&AudioSystem> {
        self.system.as_ref()
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Drive the on/off transition
    ///
    /// # Returns
    /// The resulting state (still `Disabled` if the device could not be opened)
    pub fn set_enabled(&mut self, enabled: bool) -> SoundState {
        match (self.state, enabled) {
            (SoundState::Disabled, true) => self.enable(),
            (SoundState::Enabled, false) => self.disable(),
            _ => {}
        }
        self.state
    }

    fn enable(&mut self) {
        if self.system.is_none() {
            match (self.opener)(&self.config) {
                Ok(system) => {
                    log::info!("Audio initialized");
                    self.system = Some(system);
                }
                Err(e) => {
                    log::warn!("Sound unavailable, staying silent: {}", e);
                    return;
                }
            }
        }
        let Some(system) = &self.system else {
            return;
        };

        let (target, fade_in) = (self.config.base_gain, self.config.fade_in_s);
        self.fade_in_start_s = system.with_chain(|chain| {
            chain.ramp_gain(target, fade_in);
            chain.time_s()
        });
        self.state = SoundState::Enabled;
        log::info!("Sound enabled");
    }

    fn disable(&mut self) {
        if let Some(system) = &self.system {
            let fade_out = self.config.fade_out_s;
            system.with_chain(|chain| chain.ramp_gain(0.0, fade_out));
        }
        self.state = SoundState::Disabled;
        log::info!("Sound disabled");
    }

    /// Retarget the drone for this frame
    ///
    /// # Arguments
    /// * `analysis` - Sculpture statistics for this frame
    /// * `lines` - Active lightning style
    /// * `intensity_factor` - Squared mean line intensity over the projected pairs
    /// * `time_s` - Clock time (seconds)
    /// * `rng` - Random source for the random line mode
    ///
    /// # Returns
    /// The targets that were scheduled, or `None` while disabled
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        analysis: &SculptureAnalysis,
        lines: &LineEffectConfig,
        intensity_factor: f32,
        time_s: f32,
        rng: &mut R,
    ) -> Option<DroneTargets> {
        if self.state != SoundState::Enabled {
            return None;
        }
        let system = self.system.as_ref()?;

        let factor = frequency_modulation(lines, intensity_factor, time_s, rng);
        let targets = DroneTargets::modulated(analysis, factor, &self.config);

        let config = &self.config;
        let fade_in_start_s = self.fade_in_start_s;
        system.with_chain(|chain| {
            // Keep the enable fade audible instead of jumping to the mapped level
            let fade_progress = if config.fade_in_s > 0.0 {
                ((chain.time_s() - fade_in_start_s) / config.fade_in_s as f64).clamp(0.0, 1.0) as f32
            } else {
                1.0
            };
            chain.ramp_cutoff(targets.cutoff_hz, config.retarget_ramp_s);
            chain.ramp_q(targets.q, config.retarget_ramp_s);
            chain.ramp_gain(targets.gain * fade_progress, config.retarget_ramp_s);
        });

        Some(targets)
    }
}
