//! Floating Dots - drifting points joined by lightning, with a noise drone
//!
//! Keys: L new line style, N new sculpture, S sound on/off, Esc quit.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use floating_dots::audio::{AudioMapper, AudioSystem};
use floating_dots::cli::Args;
use floating_dots::engine::Engine;
use floating_dots::params::*;
use floating_dots::projection::Viewport;
use floating_dots::rendering::RenderSystem;
use floating_dots::scene::FrameMesh;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    mesh: FrameMesh,

    // Sculpture, sound and drawing
    engine: Engine<StdRng>,

    // Configuration
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    // Time tracking
    start_time: Instant,
    frame_num: usize,
}

impl App {
    fn new(args: &Args, recording_config: Option<RecordingConfig>) -> Self {
        let render_config = RenderConfig::default();
        let mut sculpture_params = SculptureParams::default();
        if let Some(points) = args.points {
            sculpture_params.initial_point_count = sculpture_params.clamp_point_count(points);
        }

        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let audio = match recording_config.clone() {
            // The recording WAV is written from the device callback
            Some(recording) => AudioMapper::with_opener(AudioConfig::default(), move |config| {
                AudioSystem::open(config, Some(&recording))
            }),
            None => AudioMapper::new(AudioConfig::default()),
        };

        let viewport = Viewport::new(
            render_config.window_width as f32,
            render_config.window_height as f32,
        );
        let mut engine = Engine::new(
            sculpture_params,
            render_config.clone(),
            audio,
            viewport,
            rng,
        );
        if let Some(mode) = args.parse_line_mode() {
            engine.set_line_mode(mode);
        }
        if args.sound || recording_config.is_some() {
            engine.set_sound_enabled(true);
        }

        Self {
            window: None,
            render_system: None,
            mesh: FrameMesh::new(viewport.size()),
            engine,
            render_config,
            recording_config,
            start_time: Instant::now(),
            frame_num: 0,
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.engine.title());
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyL => {
                self.engine.randomize_line_effect();
            }
            KeyCode::KeyN => {
                self.engine.restart_random();
            }
            KeyCode::KeyS => {
                self.engine.toggle_sound();
            }
            _ => return,
        }
        self.update_title();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(width, height);
        }
        self.mesh.resize(glam::Vec2::new(width as f32, height as f32));
        self.engine.resize(width as f32, height as f32);
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.engine.title())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.recording_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render_system.size();
        self.window = Some(window);
        self.render_system = Some(render_system);
        self.resize(width, height);

        // The first generation spreads from the first visible frame
        self.start_time = Instant::now();

        match &self.recording_config {
            Some(config) => log::info!(
                "Recording {} frames to {}",
                config.total_frames(),
                config.output_dir
            ),
            None => log::info!("Running. L: lines, N: new sculpture, S: sound, Esc: quit"),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(system) = self.engine.audio().system() {
            if let Err(e) = system.finish_recording() {
                log::error!("{}", e);
            }
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let now_ms = match &self.recording_config {
            // Deterministic frame clock while recording
            Some(config) => {
                if self.frame_num >= config.total_frames() {
                    log::info!("Recording complete");
                    event_loop.exit();
                    return;
                }
                config.frame_time_ms(self.frame_num)
            }
            None => self.start_time.elapsed().as_secs_f64() * 1000.0,
        };

        let stats = self.engine.on_frame(now_ms, &mut self.mesh);
        log::trace!(
            "frame {}: {} points, {} lines",
            self.frame_num,
            stats.point_count,
            stats.line_count
        );

        let Some(render_system) = &mut self.render_system else {
            return;
        };
        match render_system.render(&self.mesh, self.frame_num) {
            Ok(()) => self.frame_num += 1,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let recording_config = args
        .create_recording_config()
        .context("Failed to create recording directories")?;

    let mut app = App::new(&args, recording_config);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;
    Ok(())
}
