//! Error types for the audio subsystem.

use std::fmt;

/// Errors that can occur while bringing up the drone output.
#[derive(Debug)]
pub enum AudioError {
    /// The host has no default output device.
    NoOutputDevice,
    /// The device refused to report its default configuration.
    DeviceConfig(cpal::DefaultStreamConfigError),
    /// The device's default sample format is not 32-bit float.
    UnsupportedSampleFormat(cpal::SampleFormat),
    /// Failed to build the output stream.
    BuildStream(cpal::BuildStreamError),
    /// Failed to start the output stream.
    PlayStream(cpal::PlayStreamError),
    /// The audio configuration failed validation.
    InvalidConfig(String),
    /// Failed to create or finalize the WAV recording.
    Recording(hound::Error),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "No audio output device found"),
            AudioError::DeviceConfig(e) => write!(f, "Failed to get audio config: {}", e),
            AudioError::UnsupportedSampleFormat(format) => {
                write!(f, "Unsupported output sample format: {:?}", format)
            }
            AudioError::BuildStream(e) => write!(f, "Failed to build audio stream: {}", e),
            AudioError::PlayStream(e) => write!(f, "Failed to start audio stream: {}", e),
            AudioError::InvalidConfig(msg) => write!(f, "Invalid audio config: {}", msg),
            AudioError::Recording(e) => write!(f, "Audio recording failed: {}", e),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::DeviceConfig(e) => Some(e),
            AudioError::BuildStream(e) => Some(e),
            AudioError::PlayStream(e) => Some(e),
            AudioError::Recording(e) => Some(e),
            _ => None,
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        AudioError::DeviceConfig(e)
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(e: cpal::BuildStreamError) -> Self {
        AudioError::BuildStream(e)
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(e: cpal::PlayStreamError) -> Self {
        AudioError::PlayStream(e)
    }
}

impl From<hound::Error> for AudioError {
    fn from(e: hound::Error) -> Self {
        AudioError::Recording(e)
    }
}
