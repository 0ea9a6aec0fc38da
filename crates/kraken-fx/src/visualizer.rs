//! Frequency visualizer: bars, waveform and radial projections.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::analysis::{AnalysisSource, AnalysisWindow, FFT_SIZE};
use crate::color::Rgba;
use crate::settings::VisualizerMode;
use crate::surface::Surface;

/// Bars are drawn wider than an even split so the busy low end fills the
/// surface and the quiet top bins run off the right edge
const BAR_WIDTH_FACTOR: f32 = 2.5;
/// Radial inner radius as a fraction of the smaller surface side
const RING_RADIUS: f32 = 0.15;
/// Longest radial tick as a fraction of the ring radius
const MAX_TICK: f32 = 0.8;

/// Samples the analysis source once per frame and draws the chosen mode
pub struct Visualizer {
    window: AnalysisWindow,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            window: AnalysisWindow::new(FFT_SIZE / 2),
        }
    }

    /// The snapshot taken on the most recent frame
    pub fn window(&self) -> &AnalysisWindow {
        &self.window
    }

    pub fn update_and_draw(&mut self, mode: VisualizerMode, source: &mut dyn AnalysisSource, surface: &mut dyn Surface) {
        if mode == VisualizerMode::None {
            return;
        }

        self.window.resize(source.bin_count());
        source.sample(&mut self.window);
        draw(mode, &self.window, surface);
    }
}

/// Render one projection of `window` onto `surface`
pub fn draw(mode: VisualizerMode, window: &AnalysisWindow, surface: &mut dyn Surface) {
    match mode {
        VisualizerMode::None => {}
        VisualizerMode::Bars => draw_bars(&window.frequency, surface),
        VisualizerMode::Wave => draw_wave(&window.time_domain, surface),
        VisualizerMode::Circle => draw_circle(&window.frequency, surface),
    }
}

fn draw_bars(frequency: &[u8], surface: &mut dyn Surface) {
    let bins = frequency.len();
    if bins == 0 {
        return;
    }
    let (w, h) = surface.size();
    let bar_width = w / bins as f32 * BAR_WIDTH_FACTOR;

    for (i, value) in frequency.iter().enumerate() {
        let bar_height = *value as f32 / 255.0 * h;
        let hue = 180.0 + i as f32 / bins as f32 * 40.0;
        let x = i as f32 * bar_width;

        surface.fill_rect(
            x,
            h - bar_height,
            (bar_width - 1.0).max(0.0),
            bar_height,
            Rgba::hsla(hue, 0.8, 0.5, 0.8),
        );
    }
}

fn draw_wave(time_domain: &[u8], surface: &mut dyn Surface) {
    let bins = time_domain.len();
    if bins == 0 {
        return;
    }
    let (w, h) = surface.size();
    let slice_width = w / bins as f32;

    let mut points: Vec<(f32, f32)> = time_domain
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let v = *sample as f32 / 128.0;
            (i as f32 * slice_width, v * h / 2.0)
        })
        .collect();
    points.push((w, h / 2.0));

    surface.stroke_polyline(&points, 2.0, Rgba::from_u8(59, 158, 190, 0.8));
}

fn draw_circle(frequency: &[u8], surface: &mut dyn Surface) {
    let bins = frequency.len();
    let (w, h) = surface.size();
    let (cx, cy) = (w / 2.0, h / 2.0);
    let radius = w.min(h) * RING_RADIUS;
    let max_tick = radius * MAX_TICK;

    for (i, value) in frequency.iter().enumerate() {
        // Start at 12 o'clock, sweep clockwise (y grows downwards)
        let angle = i as f32 / bins as f32 * TAU - FRAC_PI_2;
        let tick = *value as f32 / 255.0 * max_tick;
        let (sin, cos) = angle.sin_cos();

        surface.stroke_line(
            (cx + cos * radius, cy + sin * radius),
            (cx + cos * (radius + tick), cy + sin * (radius + tick)),
            2.0,
            Rgba::hsla(180.0 + i as f32 / bins as f32 * 60.0, 0.8, 0.55, 0.7),
        );
    }

    // Inner glow
    surface.fill_circle(cx, cy, radius * 0.3, Rgba::from_u8(59, 158, 190, 0.1));
}
