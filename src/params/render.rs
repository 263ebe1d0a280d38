//! Rendering and recording configuration.

/// Linear RGBA colour, components in [0, 1]
pub type Rgba = [f32; 4];

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Frame clear colour
    pub background: Rgba,

    /// Lightning stroke colour (white at half opacity)
    pub line_color: Rgba,

    /// Lightning stroke width (pixels)
    pub line_width: f32,

    /// Point marker colour
    pub marker_color: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            background: [0.0, 0.0, 0.0, 1.0],
            line_color: [1.0, 1.0, 1.0, 0.5],
            line_width: 1.0,
            marker_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl RenderConfig {
    /// Marker radius for a viewport width (phones get smaller dots)
    pub fn marker_radius(&self, viewport_width: f32) -> f32 {
        if viewport_width < 480.0 {
            2.0
        } else if viewport_width < 768.0 {
            2.5
        } else {
            3.0
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Clock time of a frame (milliseconds)
    pub fn frame_time_ms(&self, frame_num: usize) -> f64 {
        frame_num as f64 * 1000.0 / self.fps as f64
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_radius_breakpoints() {
        let config = RenderConfig::default();
        assert_eq!(config.marker_radius(375.0), 2.0);
        assert_eq!(config.marker_radius(600.0), 2.5);
        assert_eq!(config.marker_radius(1280.0), 3.0);
    }

    #[test]
    fn test_recording_frame_clock() {
        let config = RecordingConfig::new(2.0);
        assert_eq!(config.total_frames(), 120);
        assert_eq!(config.frame_time_ms(0), 0.0);
        assert!((config.frame_time_ms(60) - 1000.0).abs() < 1e-9);
    }
}
