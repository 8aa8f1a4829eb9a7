//! CPAL audio output driving the synth bus.

use crate::bus::SynthBus;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Default)]
pub struct AudioOutputConfig {
    pub output_device_index: Option<usize>,
}

pub struct AudioOutput {
    sample_rate: u32,
    channels: usize,
    output_device_index: Option<usize>,
    stream: Option<cpal::Stream>,
}

impl AudioOutput {
    pub fn new(config: AudioOutputConfig) -> Result<Self> {
        let device = Self::get_device(config.output_device_index)?;
        let output_config = device.default_output_config()?;

        Ok(Self {
            sample_rate: output_config.sample_rate().0,
            channels: output_config.channels() as usize,
            output_device_index: config.output_device_index,
            stream: None,
        })
    }

    /// Start pulling audio from `bus`. A no-op while already running.
    pub fn start(&mut self, bus: Arc<SynthBus>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let device = Self::get_device(self.output_device_index)?;
        let config = device.default_output_config()?;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config.into(), bus)?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config.into(), bus)?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config.into(), bus)?,
            format => {
                return Err(Error::InvalidDevice(format!(
                    "Unsupported sample format: {:?}",
                    format
                )));
            }
        };

        stream.play()?;
        info!(
            "Audio output started: {} Hz, {} channels",
            self.sample_rate, self.channels
        );

        self.stream = Some(stream);
        Ok(())
    }

    /// Close the stream.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("Audio output stopped");
        }
    }

    fn get_device(index: Option<usize>) -> Result<cpal::Device> {
        let host = cpal::default_host();

        if let Some(idx) = index {
            let devices: Vec<_> = host.output_devices()?.collect();

            let device_count = devices.len();
            devices.into_iter().nth(idx).ok_or_else(|| {
                Error::InvalidDevice(format!(
                    "Output device index {} out of range (available: {})",
                    idx, device_count
                ))
            })
        } else {
            host.default_output_device()
                .ok_or_else(|| Error::InvalidDevice("No output device available".to_string()))
        }
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        bus: Arc<SynthBus>,
    ) -> Result<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut mix = Vec::<f32>::new();

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mix.resize(data.len(), 0.0);
                bus.render_interleaved(&mut mix, channels);
                for (sample, value) in data.iter_mut().zip(&mix) {
                    *sample = T::from_sample(*value);
                }
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;

        Ok(stream)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}
