//! Audio system owning the drone chain and its output stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::sync::{Arc, Mutex, MutexGuard};

use super::chain::SignalChain;
use super::error::AudioError;
use crate::params::{AudioConfig, RecordingConfig};

type SharedWavWriter = Arc<Mutex<Option<hound::WavWriter<BufWriter<File>>>>>;

/// Audio system managing the drone chain (thread-safe)
pub struct AudioSystem {
    /// Signal chain shared with the audio callback
    chain: Arc<Mutex<SignalChain>>,

    /// Channel count of the output
    channels: usize,

    /// WAV writer fed by the audio callback while recording
    wav_writer: Option<SharedWavWriter>,

    /// Audio output stream (kept alive; `None` for offline systems)
    stream: Option<cpal::Stream>,
}

impl AudioSystem {
    /// Open the default output device and start the (silent) drone
    pub fn open(
        config: &AudioConfig,
        recording_config: Option<&RecordingConfig>,
    ) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::InvalidConfig)?;

        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::UnsupportedSampleFormat(supported.sample_format()));
        }
        let stream_config: cpal::StreamConfig = supported.into();
        let sample_rate_hz = stream_config.sample_rate.0;
        let channels = stream_config.channels as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate_hz,
            channels
        );

        // Create WAV writer if recording
        let wav_writer = match recording_config {
            Some(recording) => {
                let spec = hound::WavSpec {
                    channels: channels as u16,
                    sample_rate: sample_rate_hz,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let writer = hound::WavWriter::create(recording.audio_path(), spec)?;
                log::info!("Recording audio to {}", recording.audio_path());
                Some(Arc::new(Mutex::new(Some(writer))))
            }
            None => None,
        };

        let chain = Arc::new(Mutex::new(SignalChain::new(
            config,
            sample_rate_hz,
            &mut StdRng::from_entropy(),
        )));
        let chain_clone = Arc::clone(&chain);
        let wav_writer_clone = wav_writer.clone();

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                lock_or_recover(&chain_clone).render(data, channels);

                // Record to WAV if recording
                if let Some(ref writer) = wav_writer_clone {
                    if let Some(w) = lock_or_recover(writer).as_mut() {
                        for &sample in data.iter() {
                            let _ = w.write_sample(sample);
                        }
                    }
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            chain,
            channels,
            wav_writer,
            stream: Some(stream),
        })
    }

    /// Build the chain without a device; samples are pulled with [`render`](Self::render)
    pub fn offline(config: &AudioConfig) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::InvalidConfig)?;
        let chain = SignalChain::new(config, config.sample_rate_hz, &mut StdRng::from_entropy());
        Ok(Self {
            chain: Arc::new(Mutex::new(chain)),
            channels: 1,
            wav_writer: None,
            stream: None,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_offline(&self) -> bool {
        self.stream.is_none()
    }

    /// Run `f` with exclusive access to the chain
    pub fn with_chain<T>(&self, f: impl FnOnce(&mut SignalChain) -> T) -> T {
        f(&mut lock_or_recover(&self.chain))
    }

    /// Pull interleaved samples from the chain (offline use)
    pub fn render(&self, out: &mut [f32]) {
        lock_or_recover(&self.chain).render(out, self.channels);
    }

    /// Close the WAV recording, flushing its header
    pub fn finish_recording(&self) -> Result<(), AudioError> {
        let Some(writer) = &self.wav_writer else {
            return Ok(());
        };
        if let Some(w) = lock_or_recover(writer).take() {
            w.finalize()?;
            log::info!("Audio recording finalized");
        }
        Ok(())
    }
}

/// The audio thread must never panic on a poisoned lock
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
