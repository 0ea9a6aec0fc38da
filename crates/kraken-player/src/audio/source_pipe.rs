//! System audio capture.
//!
//! Opens a cpal input stream (or loopback on an output device where the host
//! allows it) and keeps the most recent mono samples in a shared ring buffer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const BUFFER_SIZE: usize = 1024;

/// Some drivers hang forever when asked for their default config
const DEVICE_TIMEOUT: Duration = Duration::from_secs(3);

struct DeviceInfo {
    device: Device,
    name: String,
    is_input: bool,
}

pub struct SourcePipe {
    buffer: Arc<Mutex<Vec<f32>>>,
    device_name: Option<String>,
    stream: Option<Stream>,
    paused: bool,
    // Auto-gain normalization state
    smoothed_peak: f32,
    target_level: f32,
}

impl SourcePipe {
    pub fn new() -> Self {
        let devices = Self::collect_devices();
        let buffer = Arc::new(Mutex::new(vec![0.0; BUFFER_SIZE]));

        let stream = match Self::preferred_device(&devices) {
            Some(index) => {
                let info = &devices[index];
                let device_type = if info.is_input { "input" } else { "output" };
                let stream = Self::build_stream(info, Arc::clone(&buffer));
                if stream.is_some() {
                    log::info!("[{}] Capturing: {} ({})", index, info.name, device_type);
                }
                stream.map(|s| (s, info.name.clone()))
            }
            None => {
                log::warn!("No audio devices found");
                None
            }
        };

        let (stream, device_name) = match stream {
            Some((s, name)) => (Some(s), Some(name)),
            None => (None, None),
        };

        Self {
            buffer,
            device_name,
            stream,
            paused: false,
            smoothed_peak: 0.1,
            target_level: 0.5,
        }
    }

    /// Print every capture-capable device to stdout
    pub fn list_devices() {
        println!("=== Audio Devices ===");
        for (idx, info) in Self::collect_devices().iter().enumerate() {
            let device_type = if info.is_input { "input" } else { "output" };
            println!("  [{}] {} ({})", idx, info.name, device_type);
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.stream.is_some() && !self.paused
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    fn collect_devices() -> Vec<DeviceInfo> {
        let host = cpal::default_host();
        let mut devices = Vec::new();

        if let Ok(input_devices) = host.input_devices() {
            for device in input_devices {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo { device, name, is_input: true });
                }
            }
        }

        if let Ok(output_devices) = host.output_devices() {
            for device in output_devices {
                if let Ok(name) = device.name() {
                    devices.push(DeviceInfo { device, name, is_input: false });
                }
            }
        }

        devices
    }

    fn preferred_device(devices: &[DeviceInfo]) -> Option<usize> {
        if devices.is_empty() {
            return None;
        }

        // Monitor sources on pipewire/pulse see what the system plays
        let index = devices
            .iter()
            .position(|d| d.is_input && d.name == "pipewire")
            .or_else(|| devices.iter().position(|d| d.is_input && d.name == "pulse"))
            .or_else(|| {
                // Loopback on the default output
                let host = cpal::default_host();
                let default_output = host.default_output_device().and_then(|d| d.name().ok());
                default_output.and_then(|name| devices.iter().position(|d| !d.is_input && d.name == name))
            })
            .unwrap_or(0);
        Some(index)
    }

    fn config_with_timeout(device: &Device, is_input: bool) -> Option<StreamConfig> {
        let device_clone = device.clone();
        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let config = if is_input {
                device_clone.default_input_config()
            } else {
                device_clone.default_output_config()
            };
            let _ = tx.send(config);
        });

        match rx.recv_timeout(DEVICE_TIMEOUT) {
            Ok(Ok(config)) => Some(config.into()),
            Ok(Err(e)) => {
                log::warn!("Failed to get device config: {}", e);
                None
            }
            Err(_) => {
                log::warn!("Device config timed out after {:?}", DEVICE_TIMEOUT);
                None
            }
        }
    }

    fn build_stream(info: &DeviceInfo, audio_buffer: Arc<Mutex<Vec<f32>>>) -> Option<Stream> {
        let stream_config = Self::config_with_timeout(&info.device, info.is_input)?;
        let channels = (stream_config.channels as usize).max(1);

        let err_fn = |err| log::error!("Audio stream error: {}", err);

        let stream = info.device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buffer = lock(&audio_buffer);
                buffer.extend(
                    data.chunks(channels)
                        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
                );
                let excess = buffer.len().saturating_sub(BUFFER_SIZE);
                buffer.drain(..excess);
            },
            err_fn,
            None,
        );

        match stream {
            Ok(s) => match s.play() {
                Ok(()) => Some(s),
                Err(e) => {
                    log::warn!("Failed to start stream on {}: {}", info.name, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to build stream on {}: {}", info.name, e);
                None
            }
        }
    }

    /// Stop capturing and zero the buffer
    pub fn pause(&mut self) {
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                log::warn!("Failed to pause capture: {}", e);
            }
        }
        lock(&self.buffer).iter_mut().for_each(|x| *x = 0.0);
        self.paused = true;
    }

    pub fn play(&mut self) {
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.play() {
                log::warn!("Failed to resume capture: {}", e);
            }
        }
        self.paused = false;
    }

    /// Current samples with auto-gain normalization
    pub fn stream(&mut self) -> Vec<f32> {
        let buffer = lock(&self.buffer).clone();

        let current_peak = buffer.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Fast attack, slow release
        if current_peak > self.smoothed_peak {
            self.smoothed_peak = self.smoothed_peak * 0.8 + current_peak * 0.2;
        } else {
            self.smoothed_peak = self.smoothed_peak * 0.995 + current_peak * 0.005;
        }

        let safe_peak = self.smoothed_peak.max(0.001);
        let gain = (self.target_level / safe_peak).clamp(0.5, 10.0);

        buffer.iter().map(|s| (s * gain).clamp(-1.0, 1.0)).collect()
    }
}

/// A panicking audio callback must not take the render loop down with it
fn lock(buffer: &Mutex<Vec<f32>>) -> MutexGuard<'_, Vec<f32>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}
