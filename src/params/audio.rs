//! Drone synthesis configuration and mapping constants.

/// Noise drone configuration with parameter-mapping ranges
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Sample rate used when no device is available (offline rendering, Hz)
    pub sample_rate_hz: u32,

    /// Length of the looping noise buffer (seconds)
    pub noise_buffer_s: f32,

    /// Peak amplitude of the noise samples
    pub noise_amplitude: f32,

    /// Lowpass cutoff when the chain is first built (Hz)
    pub initial_cutoff_hz: f32,

    /// Filter resonance when the chain is first built
    pub initial_q: f32,

    /// Cutoff mapping range (Hz)
    /// Formula: cutoff = min + (max - min) * (1 - size/400)^1.5 + movement * 200
    pub cutoff_range_hz: (f32, f32),

    /// Cutoff added per unit of average movement (Hz)
    pub movement_to_cutoff_hz: f32,

    /// Resonance mapping range
    /// Formula: q = min + (max - min) * spread_ratio
    pub q_range: (f32, f32),

    /// Gain floor of the mapping
    /// Formula: gain = min(ceiling, base + movement * 0.2 + spread_ratio * 0.1)
    pub base_gain: f32,

    /// Gain ceiling of the mapping
    pub max_gain: f32,

    /// Gain added per unit of average movement
    pub movement_to_gain: f32,

    /// Gain added per unit of spread ratio
    pub spread_to_gain: f32,

    /// Duration of the per-frame retargeting ramps (seconds)
    pub retarget_ramp_s: f32,

    /// Fade-in duration on enable (seconds)
    pub fade_in_s: f32,

    /// Fade-out duration on disable (seconds)
    pub fade_out_s: f32,

    /// Output hard-clip level (protects ears and speakers)
    pub clip_level: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            noise_buffer_s: 0.5,
            noise_amplitude: 0.5,
            initial_cutoff_hz: 400.0,
            initial_q: 1.5,
            cutoff_range_hz: (80.0, 800.0),
            movement_to_cutoff_hz: 200.0,
            q_range: (0.5, 4.0),
            base_gain: 0.05,
            max_gain: 0.3,
            movement_to_gain: 0.2,
            spread_to_gain: 0.1,
            retarget_ramp_s: 0.05,
            fade_in_s: 0.3,
            fade_out_s: 0.25,
            clip_level: 0.5,
        }
    }
}

impl AudioConfig {
    /// Number of samples in the looping noise buffer at the given rate
    pub fn noise_buffer_len(&self, sample_rate_hz: u32) -> usize {
        ((sample_rate_hz as f32 * self.noise_buffer_s) as usize).max(1)
    }

    /// Validate configuration (positive rates, ordered ranges, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.noise_buffer_s <= 0.0 {
            return Err(format!(
                "Noise buffer length must be > 0, got {}s",
                self.noise_buffer_s
            ));
        }
        let (lo, hi) = self.cutoff_range_hz;
        if lo <= 0.0 || hi < lo {
            return Err(format!("Invalid cutoff range {}..{} Hz", lo, hi));
        }
        let (q_lo, q_hi) = self.q_range;
        if q_lo <= 0.0 || q_hi < q_lo {
            return Err(format!("Invalid Q range {}..{}", q_lo, q_hi));
        }
        if self.max_gain < 0.0 || self.base_gain < 0.0 {
            return Err("Gains must be >= 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AudioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_noise_buffer_len() {
        let config = AudioConfig::default();

        // Half a second of samples
        assert_eq!(config.noise_buffer_len(44100), 22050);
        assert_eq!(config.noise_buffer_len(48000), 24000);
    }

    #[test]
    fn test_rejects_inverted_cutoff_range() {
        let config = AudioConfig {
            cutoff_range_hz: (800.0, 80.0),
            ..AudioConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
