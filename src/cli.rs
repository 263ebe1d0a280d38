//! Command-line argument parsing.

use clap::Parser;

use crate::lightning::{DistanceMode, LineMode};
use crate::params::RecordingConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "floating-dots")]
#[command(about = "Drifting 3D dots joined by lightning, with a noise drone", long_about = None)]
pub struct Args {
    /// Initial number of points (clamped to 3..=55)
    #[arg(long, value_name = "N")]
    pub points: Option<usize>,

    /// Seed for a reproducible sculpture
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Start with the drone enabled
    #[arg(long)]
    pub sound: bool,

    /// Initial line mode: distance, distance-inverse, center, random, wave (random if omitted)
    #[arg(long, value_name = "MODE")]
    pub lines: Option<String>,

    /// Record frames and audio (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,
}

impl Args {
    /// Parse the line mode from command-line arguments (`None` if not given)
    pub fn parse_line_mode(&self) -> Option<LineMode> {
        let lines = self.lines.as_ref()?;
        let mode = match lines.to_lowercase().as_str() {
            "distance" | "distance-normal" => LineMode::Distance(DistanceMode::Normal),
            "distance-inverse" | "inverse" => LineMode::Distance(DistanceMode::Inverse),
            "center" | "centre" => LineMode::Center,
            "random" => LineMode::Random,
            "wave" => LineMode::Wave,
            other => {
                log::warn!("Unknown line mode '{}', using distance", other);
                LineMode::Distance(DistanceMode::Normal)
            }
        };
        Some(mode)
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> std::io::Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        let config = RecordingConfig::new(duration);

        // Create output directories
        std::fs::create_dir_all(config.frames_dir())?;
        std::fs::create_dir_all(&config.output_dir)?;

        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::parse_from(std::iter::once("floating-dots").chain(list.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.points, None);
        assert!(!args.sound);
        assert_eq!(args.parse_line_mode(), None);
        assert!(args.create_recording_config().unwrap().is_none());
    }

    #[test]
    fn test_line_mode_names() {
        assert_eq!(
            args(&["--lines", "distance-inverse"]).parse_line_mode(),
            Some(LineMode::Distance(DistanceMode::Inverse))
        );
        assert_eq!(args(&["--lines", "Wave"]).parse_line_mode(), Some(LineMode::Wave));
        assert_eq!(
            args(&["--lines", "sparkles"]).parse_line_mode(),
            Some(LineMode::Distance(DistanceMode::Normal))
        );
    }

    #[test]
    fn test_flags() {
        let args = args(&["--points", "20", "--seed", "9", "--sound"]);
        assert_eq!(args.points, Some(20));
        assert_eq!(args.seed, Some(9));
        assert!(args.sound);
    }
}
