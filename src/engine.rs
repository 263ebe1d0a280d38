//! Frame driver: owns the whole sculpture state and runs one tick per frame.

use glam::Vec2;
use rand::Rng;

use crate::audio::{AudioMapper, SoundState};
use crate::lightning::{self, LineEffectConfig, LineMode};
use crate::params::{RenderConfig, SculptureParams};
use crate::projection::{Projector, Viewport};
use crate::scene::{Canvas, SceneRenderer};
use crate::sculpture::{Sculpture, SculptureAnalysis, SculptureAnalyzer};

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub point_count: usize,
    pub line_count: usize,
    pub spreading: bool,
}

/// All mutable state of a running sculpture
///
/// Simulation, sound and drawing are driven from [`on_frame`](Self::on_frame).
/// The other operations are the UI-facing controls; each one replaces its
/// piece of state completely before returning, so the next frame never sees
/// a half-updated generation.
pub struct Engine<R: Rng> {
    sculpture: Sculpture,
    line_config: LineEffectConfig,
    analyzer: SculptureAnalyzer,
    last_analysis: SculptureAnalysis,
    audio: AudioMapper,
    projector: Projector,
    renderer: SceneRenderer,
    /// Clock time of the latest frame (milliseconds)
    clock_ms: f64,
    rng: R,
}

impl<R: Rng> Engine<R> {
    /// Build the engine with a first generation starting at clock time 0
    ///
    /// The first line style is random, like every later one.
    pub fn new(
        params: SculptureParams,
        render_config: RenderConfig,
        audio: AudioMapper,
        viewport: Viewport,
        mut rng: R,
    ) -> Self {
        let count = params.initial_point_count;
        let sculpture = Sculpture::new(params, count, 0.0, &mut rng);

        let mut engine = Self {
            sculpture,
            line_config: LineEffectConfig::default(),
            analyzer: SculptureAnalyzer::new(),
            last_analysis: SculptureAnalysis::default(),
            audio,
            projector: Projector::new(viewport),
            renderer: SceneRenderer::new(render_config),
            clock_ms: 0.0,
            rng,
        };
        engine.randomize_line_effect();
        engine
    }

    /// Replace the point set with a new generation of `count` points
    ///
    /// # Returns
    /// The point count actually used (clamped to the allowed range)
    pub fn restart(&mut self, count: usize) -> usize {
        let count = self.sculpture.restart(count, self.clock_ms, &mut self.rng);
        // Snapshots from the old generation would read as a huge jump
        self.analyzer.reset();
        log::info!("New sculpture with {} points", count);
        count
    }

    /// New generation with a uniformly random point count
    pub fn restart_random(&mut self) -> usize {
        let range = self.sculpture.params().point_count_range.clone();
        let count = self.rng.gen_range(range);
        self.restart(count)
    }

    /// Draw a fresh lightning style
    ///
    /// # Returns
    /// The chosen mode, for updating labels
    pub fn randomize_line_effect(&mut self) -> LineMode {
        self.line_config = LineEffectConfig::random(&mut self.rng);
        let mode = self.line_config.mode;
        log::info!(
            "{} ({} segments, intensity {:.1}, speed {:.2})",
            mode.label(),
            self.line_config.base_segments,
            self.line_config.base_intensity,
            self.line_config.speed_multiplier
        );
        log::info!("{}", mode.description());
        mode
    }

    /// Switch the line mode, keeping the other style settings
    pub fn set_line_mode(&mut self, mode: LineMode) {
        self.line_config.mode = mode;
        log::info!("{}", mode.label());
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> SoundState {
        self.audio.set_enabled(enabled)
    }

    pub fn toggle_sound(&mut self) -> SoundState {
        let enabled = !self.audio.is_enabled();
        self.set_sound_enabled(enabled)
    }

    /// New drawing-surface dimensions (pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.projector.set_viewport(Viewport::new(width, height));
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// Run one tick: advance, analyze, retarget the drone, draw
    ///
    /// # Arguments
    /// * `now_ms` - Clock time (milliseconds); read, never assumed to step evenly
    /// * `canvas` - Surface to draw on
    pub fn on_frame<C: Canvas + ?Sized>(&mut self, now_ms: f64, canvas: &mut C) -> FrameStats {
        self.clock_ms = now_ms;
        let time_s = (now_ms / 1000.0) as f32;

        self.sculpture.advance(now_ms, &mut self.rng);

        // Analyzed even while silent so enabling sound doesn't see a stale snapshot
        self.last_analysis = self.analyzer.analyze(self.sculpture.points());
        if self.audio.is_enabled() {
            let projected: Vec<Vec2> = self
                .sculpture
                .points()
                .iter()
                .map(|point| self.projector.project(point.position))
                .collect();
            let intensity_factor = lightning::intensity_factor(&projected, &self.line_config);
            self.audio.update(
                &self.last_analysis,
                &self.line_config,
                intensity_factor,
                time_s,
                &mut self.rng,
            );
        }

        let line_count = self.renderer.draw(
            canvas,
            self.sculpture.points(),
            &self.projector,
            &self.line_config,
            time_s,
            &mut self.rng,
        );

        FrameStats {
            point_count: self.sculpture.points().len(),
            line_count,
            spreading: self.sculpture.is_spreading(now_ms),
        }
    }

    pub fn sculpture(&self) -> &Sculpture {
        &self.sculpture
    }

    pub fn line_config(&self) -> &LineEffectConfig {
        &self.line_config
    }

    pub fn last_analysis(&self) -> &SculptureAnalysis {
        &self.last_analysis
    }

    pub fn audio(&self) -> &AudioMapper {
        &self.audio
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.projector.viewport().size()
    }

    /// Window title: line label and sound state
    pub fn title(&self) -> String {
        let sound = match self.audio.state() {
            SoundState::Enabled => "Sound: on",
            SoundState::Disabled => "Sound: off",
        };
        format!(
            "Floating Dots | {} | {}",
            self.line_config.mode.label(),
            sound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, AudioSystem};
    use crate::params::AudioConfig;
    use crate::scene::FrameMesh;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn engine(seed: u64) -> Engine<StdRng> {
        Engine::new(
            SculptureParams::default(),
            RenderConfig::default(),
            AudioMapper::with_opener(AudioConfig::default(), AudioSystem::offline),
            Viewport::new(800.0, 600.0),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_first_frame_draws_every_pair() {
        let mut engine = engine(1);
        let mut mesh = FrameMesh::new(Vec2::new(800.0, 600.0));

        let stats = engine.on_frame(0.0, &mut mesh);

        assert_eq!(stats.point_count, 8);
        assert_eq!(stats.line_count, 8 * 7 / 2);
        assert!(stats.spreading);
    }

    #[test]
    fn test_restart_uses_latest_clock() {
        let mut engine = engine(2);
        let mut mesh = FrameMesh::new(Vec2::new(800.0, 600.0));
        engine.on_frame(10_000.0, &mut mesh);

        assert_eq!(engine.restart(5), 5);
        assert_eq!(engine.sculpture().start_time_ms(), 10_000.0);

        let stats = engine.on_frame(10_016.0, &mut mesh);
        assert!(stats.spreading);
        assert_eq!(stats.line_count, 10);
    }

    #[test]
    fn test_restart_random_stays_in_range() {
        let mut engine = engine(3);
        for _ in 0..50 {
            let count = engine.restart_random();
            assert!((3..=55).contains(&count));
            assert_eq!(engine.sculpture().points().len(), count);
        }
    }

    #[test]
    fn test_first_line_style_is_random() {
        let mut rng = StdRng::seed_from_u64(21);
        let params = SculptureParams::default();
        let count = params.initial_point_count;
        Sculpture::new(params, count, 0.0, &mut rng);
        let expected = LineEffectConfig::random(&mut rng);

        assert_eq!(engine(21).line_config(), &expected);

        let modes: HashSet<&str> = (0..40)
            .map(|seed| engine(seed).line_config().mode.name())
            .collect();
        assert!(modes.len() > 1);
    }

    #[test]
    fn test_randomize_covers_every_mode() {
        let mut engine = engine(4);
        let names: HashSet<&str> = (0..100)
            .map(|_| engine.randomize_line_effect().name())
            .collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_sound_toggle_before_any_frame() {
        let mut engine = engine(5);
        assert_eq!(engine.toggle_sound(), SoundState::Enabled);
        assert_eq!(engine.toggle_sound(), SoundState::Disabled);
        assert!(engine.title().ends_with("Sound: off"));
    }

    #[test]
    fn test_failed_audio_keeps_visuals_running() {
        let mut engine = Engine::new(
            SculptureParams::default(),
            RenderConfig::default(),
            AudioMapper::with_opener(AudioConfig::default(), |_| {
                Err(AudioError::NoOutputDevice)
            }),
            Viewport::new(800.0, 600.0),
            StdRng::seed_from_u64(6),
        );
        let mut mesh = FrameMesh::new(Vec2::new(800.0, 600.0));

        assert_eq!(engine.set_sound_enabled(true), SoundState::Disabled);
        let stats = engine.on_frame(16.0, &mut mesh);
        assert_eq!(stats.line_count, 28);
        assert!(!mesh.vertices().is_empty());
    }

    #[test]
    fn test_resize_moves_projection_centre() {
        let mut engine = engine(7);
        engine.resize(1920.0, 1080.0);
        assert_eq!(engine.viewport_size(), Vec2::new(1920.0, 1080.0));
    }

    #[test]
    fn test_title_shows_line_label() {
        let mut engine = engine(8);
        engine.set_line_mode(LineMode::Wave);
        assert_eq!(engine.title(), "Floating Dots | Lines: wave | Sound: off");
    }
}
