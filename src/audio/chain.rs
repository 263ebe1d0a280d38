//! Noise → lowpass → gain signal chain, rendered sample by sample.

use std::f32::consts::PI;

use rand::Rng;

use super::ramp::AutomatedParam;
use crate::params::AudioConfig;

/// Looping buffer of independent uniform noise samples
pub struct NoiseSource {
    buffer: Vec<f32>,
    position: usize,
}

impl NoiseSource {
    pub fn new<R: Rng + ?Sized>(len: usize, amplitude: f32, rng: &mut R) -> Self {
        let buffer = (0..len.max(1))
            .map(|_| rng.gen_range(-1.0..=1.0) * amplitude)
            .collect();
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = self.buffer[self.position];
        self.position = (self.position + 1) % self.buffer.len();
        sample
    }
}

/// Resonant two-pole lowpass (RBJ cookbook biquad)
///
/// Coefficients are only recomputed when cutoff or Q actually change.
pub struct LowPassFilter {
    sample_rate_hz: f32,
    cutoff_hz: f32,
    q: f32,
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl LowPassFilter {
    pub fn new(sample_rate_hz: f32, cutoff_hz: f32, q: f32) -> Self {
        let mut filter = Self {
            sample_rate_hz,
            cutoff_hz: f32::NAN,
            q: f32::NAN,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.set_params(cutoff_hz, q);
        filter
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn set_params(&mut self, cutoff_hz: f32, q: f32) {
        let nyquist = self.sample_rate_hz / 2.0;
        let cutoff_hz = cutoff_hz.clamp(1.0, nyquist * 0.99);
        let q = q.max(0.01);
        if cutoff_hz == self.cutoff_hz && q == self.q {
            return;
        }
        self.cutoff_hz = cutoff_hz;
        self.q = q;

        let w0 = 2.0 * PI * cutoff_hz / self.sample_rate_hz;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;

        self.b0 = (1.0 - cos_w0) / 2.0 / a0;
        self.b1 = (1.0 - cos_w0) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    pub fn process(&mut self, x0: f32) -> f32 {
        let y0 = self.b0 * x0 + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;
        y0
    }
}

/// The drone: looping noise through a lowpass into a gain stage
///
/// The chain keeps its own clock (samples rendered / sample rate); ramps are
/// scheduled against that clock and advance as samples are pulled.
pub struct SignalChain {
    noise: NoiseSource,
    filter: LowPassFilter,
    cutoff_hz: AutomatedParam,
    q: AutomatedParam,
    gain: AutomatedParam,
    sample_rate_hz: u32,
    samples_rendered: u64,
    clip_level: f32,
}

impl SignalChain {
    /// Build the chain silent (gain 0) at the configured initial cutoff and Q
    pub fn new<R: Rng + ?Sized>(config: &AudioConfig, sample_rate_hz: u32, rng: &mut R) -> Self {
        let noise = NoiseSource::new(
            config.noise_buffer_len(sample_rate_hz),
            config.noise_amplitude,
            rng,
        );
        let filter = LowPassFilter::new(
            sample_rate_hz as f32,
            config.initial_cutoff_hz,
            config.initial_q,
        );
        Self {
            noise,
            filter,
            cutoff_hz: AutomatedParam::new(config.initial_cutoff_hz),
            q: AutomatedParam::new(config.initial_q),
            gain: AutomatedParam::new(0.0),
            sample_rate_hz,
            samples_rendered: 0,
            clip_level: config.clip_level,
        }
    }

    /// Audio clock (seconds of output rendered so far)
    pub fn time_s(&self) -> f64 {
        self.samples_rendered as f64 / self.sample_rate_hz as f64
    }

    pub fn cutoff_hz(&self) -> &AutomatedParam {
        &self.cutoff_hz
    }

    pub fn q(&self) -> &AutomatedParam {
        &self.q
    }

    pub fn gain(&self) -> &AutomatedParam {
        &self.gain
    }

    /// Exponential glide of the cutoff starting now
    pub fn ramp_cutoff(&mut self, target_hz: f32, duration_s: f32) {
        let now = self.time_s();
        self.cutoff_hz.exponential_ramp_to(target_hz, now, duration_s);
    }

    /// Linear glide of the resonance starting now
    pub fn ramp_q(&mut self, target: f32, duration_s: f32) {
        let now = self.time_s();
        self.q.linear_ramp_to(target, now, duration_s);
    }

    /// Linear glide of the output level starting now
    pub fn ramp_gain(&mut self, target: f32, duration_s: f32) {
        let now = self.time_s();
        self.gain.linear_ramp_to(target, now, duration_s);
    }

    pub fn next_sample(&mut self) -> f32 {
        let now = self.time_s();
        let cutoff = self.cutoff_hz.advance(now);
        let q = self.q.advance(now);
        let gain = self.gain.advance(now);

        self.filter.set_params(cutoff, q);
        let filtered = self.filter.process(self.noise.next_sample());
        self.samples_rendered += 1;

        // Safety limiter: hard clip to prevent ear damage
        (filtered * gain).clamp(-self.clip_level, self.clip_level)
    }

    /// Fill an interleaved buffer, duplicating the mono drone on every channel
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        for frame in out.chunks_mut(channels.max(1)) {
            let sample = self.next_sample();
            frame.fill(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_noise_loops_and_respects_amplitude() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut noise = NoiseSource::new(100, 0.5, &mut rng);
        let first: Vec<f32> = (0..100).map(|_| noise.next_sample()).collect();
        let second: Vec<f32> = (0..100).map(|_| noise.next_sample()).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.abs() <= 0.5));
        assert!(first.iter().any(|s| *s != first[0]));
    }

    #[test]
    fn test_lowpass_passes_dc_and_attenuates_nyquist() {
        let mut filter = LowPassFilter::new(44100.0, 400.0, 0.707);

        let mut dc = 0.0;
        for _ in 0..10_000 {
            dc = filter.process(1.0);
        }
        assert!((dc - 1.0).abs() < 1e-3);

        let mut filter = LowPassFilter::new(44100.0, 400.0, 0.707);
        let output: Vec<f32> = (0..10_000)
            .map(|i| filter.process(if i % 2 == 0 { 1.0 } else { -1.0 }))
            .collect();
        assert!(rms(&output[5_000..]) < 0.01);
    }

    #[test]
    fn test_filter_clamps_cutoff_below_nyquist() {
        let filter = LowPassFilter::new(8000.0, 10_000.0, 1.0);
        assert!(filter.cutoff_hz() < 4000.0);
    }

    #[test]
    fn test_chain_starts_silent() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut chain = SignalChain::new(&AudioConfig::default(), 44100, &mut rng);
        let mut out = vec![1.0; 512];
        chain.render(&mut out, 2);

        assert!(out.iter().all(|s| *s == 0.0));
        assert!((chain.time_s() - 256.0 / 44100.0).abs() < 1e-9);
    }

    #[test]
    fn test_gain_ramp_brings_up_drone() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = AudioConfig::default();
        let mut chain = SignalChain::new(&config, 44100, &mut rng);
        chain.ramp_gain(0.3, 0.05);

        let mut out = vec![0.0; 44100];
        chain.render(&mut out, 1);

        assert_eq!(chain.gain().value(), 0.3);
        assert!(rms(&out[22050..]) > 0.0);
        assert!(out.iter().all(|s| s.abs() <= config.clip_level));
    }

    #[test]
    fn test_ramps_use_chain_clock() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut chain = SignalChain::new(&AudioConfig::default(), 1000, &mut rng);
        let mut out = vec![0.0; 500];
        chain.render(&mut out, 1);

        chain.ramp_cutoff(100.0, 1.0);
        // Ramp starts at the current clock, not at zero
        assert_eq!(chain.cutoff_hz().value_at(0.5), 400.0);
        assert!((chain.cutoff_hz().value_at(1.0) - 200.0).abs() < 0.5);
        assert_eq!(chain.cutoff_hz().target(), 100.0);
    }
}
