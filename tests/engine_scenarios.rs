//! End-to-end scenarios through the public engine API.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use floating_dots::audio::{AudioMapper, AudioSystem, SoundState};
use floating_dots::engine::Engine;
use floating_dots::lightning::LineMode;
use floating_dots::params::{AudioConfig, RenderConfig, SculptureParams};
use floating_dots::projection::Viewport;
use floating_dots::scene::{Canvas, FrameMesh};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn offline_engine(seed: u64) -> Engine<StdRng> {
    Engine::new(
        SculptureParams::default(),
        RenderConfig::default(),
        AudioMapper::with_opener(AudioConfig::default(), AudioSystem::offline),
        Viewport::new(1280.0, 720.0),
        StdRng::seed_from_u64(seed),
    )
}

#[test]
fn test_three_point_sculpture_spreads_to_targets() {
    let mut engine = offline_engine(10);
    engine.restart(3);
    let mut mesh = FrameMesh::new(Vec2::new(1280.0, 720.0));

    engine.on_frame(0.0, &mut mesh);
    let start = engine.sculpture().start_position();
    for point in engine.sculpture().points() {
        assert!(point.position.distance(start) < 1e-4);
    }

    engine.on_frame(3000.0, &mut mesh);
    for point in engine.sculpture().points() {
        assert!(point.position.distance(point.target) < 1e-3);
    }
}

#[test]
fn test_long_run_with_sound_stays_bounded() {
    let mut engine = offline_engine(11);
    let mut mesh = FrameMesh::new(Vec2::new(1280.0, 720.0));
    assert_eq!(engine.set_sound_enabled(true), SoundState::Enabled);

    let mut now = 0.0;
    for frame in 0..1200 {
        now += FRAME_MS;
        if frame % 300 == 299 {
            engine.randomize_line_effect();
        }
        engine.on_frame(now, &mut mesh);

        for point in engine.sculpture().points() {
            let p = point.position;
            assert!(p.x.abs() <= 400.0 && p.y.abs() <= 400.0);
            assert!((0.0..=400.0).contains(&p.z));
        }
        let analysis = engine.last_analysis();
        assert!(analysis.spread_ratio.is_finite());
        assert!(analysis.average_movement.is_finite());
    }

    // The drone targets stay inside the mapped ranges
    let system = engine.audio().system().unwrap();
    let (cutoff, q, gain) = system.with_chain(|chain| {
        (
            chain.cutoff_hz().target(),
            chain.q().target(),
            chain.gain().target(),
        )
    });
    assert!((80.0..=800.0).contains(&cutoff));
    assert!(q >= 0.5);
    assert!((0.0..=0.3).contains(&gain));
}

#[test]
fn test_every_frame_draws_all_pairs_and_markers() {
    let mut engine = offline_engine(12);
    engine.set_line_mode(LineMode::Center);
    let count = engine.restart(6);
    let mut mesh = FrameMesh::new(Vec2::new(1280.0, 720.0));

    let stats = engine.on_frame(5000.0, &mut mesh);

    assert_eq!(stats.point_count, count);
    assert_eq!(stats.line_count, count * (count - 1) / 2);
    assert!(!stats.spreading);
    assert_eq!(mesh.clear_color(), RenderConfig::default().background);
    assert!(!mesh.vertices().is_empty());
}

#[test]
fn test_resize_updates_drawing_surface() {
    let mut engine = offline_engine(13);
    let mut mesh = FrameMesh::new(Vec2::new(1280.0, 720.0));

    engine.resize(400.0, 800.0);
    mesh.resize(Vec2::new(400.0, 800.0));
    engine.on_frame(100.0, &mut mesh);

    assert_eq!(mesh.size(), Vec2::new(400.0, 800.0));
    assert_eq!(engine.viewport_size(), Vec2::new(400.0, 800.0));
}
