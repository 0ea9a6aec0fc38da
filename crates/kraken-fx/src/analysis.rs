//! Audio analysis boundary and the byte-spectrum analyser behind it.
//!
//! The visualizer consumes 8-bit snapshots: frequency magnitudes mapped
//! from a decibel window onto 0-255, and time-domain samples centred on 128.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::TAU;
use std::sync::Arc;

/// Analysis window length in samples; yields `FFT_SIZE / 2` bins
pub const FFT_SIZE: usize = 256;

const SMOOTHING: f32 = 0.8;
const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

/// Silence in the time-domain byte encoding
pub const TIME_DOMAIN_CENTER: u8 = 128;

/// One frame's worth of analysis data
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisWindow {
    /// Frequency-bin magnitudes, 0-255
    pub frequency: Vec<u8>,
    /// Time-domain amplitudes, 0-255 centred on 128
    pub time_domain: Vec<u8>,
}

impl AnalysisWindow {
    pub fn new(bin_count: usize) -> Self {
        Self {
            frequency: vec![0; bin_count],
            time_domain: vec![TIME_DOMAIN_CENTER; bin_count],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.frequency.len()
    }

    /// Resize both buffers, keeping existing values where possible
    pub fn resize(&mut self, bin_count: usize) {
        self.frequency.resize(bin_count, 0);
        self.time_domain.resize(bin_count, TIME_DOMAIN_CENTER);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceState {
    Suspended,
    Running,
}

/// Supplies analysis snapshots on demand
pub trait AnalysisSource {
    /// Number of frequency bins per snapshot
    fn bin_count(&self) -> usize;

    fn state(&self) -> SourceState;

    fn resume(&mut self);

    fn suspend(&mut self);

    /// Fill `window` with the latest frequency and time-domain snapshot
    fn sample(&mut self, window: &mut AnalysisWindow);
}

/// FFT analyser with Blackman windowing, temporal smoothing and a fixed
/// decibel range mapped onto bytes
pub struct ByteAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl ByteAnalyser {
    pub fn new() -> Self {
        Self::with_size(FFT_SIZE)
    }

    pub fn with_size(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let n = fft_size as f32;

        // Blackman window
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let x = i as f32 / n;
                0.42 - 0.5 * (TAU * x).cos() + 0.08 * (2.0 * TAU * x).cos()
            })
            .collect();

        Self {
            fft: FftPlanner::new().plan_fft_forward(fft_size),
            window,
            smoothed: vec![0.0; fft_size / 2],
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Analyse the most recent `fft_size` samples (zero-padded at the front
    /// when fewer are available) into `out`
    pub fn process(&mut self, samples: &[f32], out: &mut AnalysisWindow) {
        let fft_size = self.fft_size();
        let bins = self.bin_count();
        out.resize(bins);

        let recent = &samples[samples.len().saturating_sub(fft_size)..];
        let pad = fft_size - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let range = MAX_DECIBELS - MIN_DECIBELS;
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() / fft_size as f32;
            *smoothed = SMOOTHING * *smoothed + (1.0 - SMOOTHING) * magnitude;

            let db = 20.0 * (*smoothed + 1e-12).log10();
            let scaled = 255.0 * (db - MIN_DECIBELS) / range;
            out.frequency[k] = scaled.clamp(0.0, 255.0) as u8;
        }

        // Most recent `bins` samples
        let tail = &samples[samples.len().saturating_sub(bins)..];
        let lead = bins - tail.len();
        for (i, slot) in out.time_domain.iter_mut().enumerate() {
            let sample = if i < lead { 0.0 } else { tail[i - lead] };
            *slot = (128.0 * (1.0 + sample)).clamp(0.0, 255.0) as u8;
        }
    }
}

impl Default for ByteAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_maps_to_floor_and_centre() {
        let mut analyser = ByteAnalyser::new();
        let mut window = AnalysisWindow::new(analyser.bin_count());
        analyser.process(&[0.0; FFT_SIZE], &mut window);

        assert_eq!(window.bin_count(), FFT_SIZE / 2);
        assert!(window.frequency.iter().all(|v| *v == 0));
        assert!(window.time_domain.iter().all(|v| *v == TIME_DOMAIN_CENTER));
    }

    #[test]
    fn test_sine_peaks_in_its_bin() {
        let mut analyser = ByteAnalyser::new();
        let mut window = AnalysisWindow::new(analyser.bin_count());
        let bin = 16;
        let samples: Vec<f32> = (0..FFT_SIZE)
            .map(|i| (TAU * bin as f32 * i as f32 / FFT_SIZE as f32).sin())
            .collect();

        for _ in 0..20 {
            analyser.process(&samples, &mut window);
        }

        let (peak, value) = window
            .frequency
            .iter()
            .enumerate()
            .max_by_key(|(_, v)| **v)
            .map(|(i, v)| (i, *v))
            .unwrap();
        assert_eq!(value, 255);
        assert!((peak as i32 - bin as i32).abs() <= 1);
        assert!(window.frequency[bin] == 255);
    }

    #[test]
    fn test_time_domain_encoding() {
        let mut analyser = ByteAnalyser::new();
        let mut window = AnalysisWindow::new(analyser.bin_count());
        let mut samples = vec![0.0; FFT_SIZE];
        let last = samples.len() - 1;
        samples[last] = 1.0;
        samples[last - 1] = -1.0;
        samples[last - 2] = 0.5;

        analyser.process(&samples, &mut window);
        let td = &window.time_domain;
        assert_eq!(td[td.len() - 1], 255);
        assert_eq!(td[td.len() - 2], 0);
        assert_eq!(td[td.len() - 3], 192);
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut analyser = ByteAnalyser::new();
        let mut window = AnalysisWindow::new(4);
        analyser.process(&[0.25; 10], &mut window);
        assert_eq!(window.bin_count(), FFT_SIZE / 2);
        assert_eq!(window.time_domain[0], TIME_DOMAIN_CENTER);
        assert_eq!(window.time_domain[FFT_SIZE / 2 - 1], 160);
    }
}
