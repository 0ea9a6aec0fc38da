//! Animation driver tying the ambient field, bursts and visualizer together.

use rand::Rng;

use crate::analysis::AnalysisSource;
use crate::burst::BurstEmitter;
use crate::particles::{AmbientField, FrameTime};
use crate::settings::{EffectKind, EffectSettings, EffectTable, VisualizerMode};
use crate::surface::Layers;
use crate::visualizer::Visualizer;

/// Longest frame step the simulation will take, in seconds
pub const MAX_FRAME_DT: f32 = 0.1;

/// Period the animation clock wraps at before it reaches the particles, in
/// seconds. Keeps `FrameTime::elapsed` at sub-millisecond f32 resolution.
const CLOCK_WRAP: f64 = 3600.0;

/// All animation state, owned by whoever drives the frame loop
pub struct Engine<R: Rng> {
    rng: R,
    table: EffectTable,
    effect: EffectKind,
    visualizer_mode: VisualizerMode,
    field: AmbientField,
    bursts: BurstEmitter,
    visualizer: Visualizer,
    /// Clock value of the previous tick
    last_time: f64,
    last_frame: FrameTime,
    /// Ambient layer size used for spawning
    size: (f32, f32),
    /// Burst layer size; bursts start at its centre
    burst_size: (f32, f32),
}

impl<R: Rng> Engine<R> {
    pub fn new(rng: R, table: EffectTable, effect: EffectKind, visualizer_mode: VisualizerMode, size: (f32, f32)) -> Self {
        let mut engine = Self {
            rng,
            table,
            effect,
            visualizer_mode,
            field: AmbientField::new(),
            bursts: BurstEmitter::new(),
            visualizer: Visualizer::new(),
            last_time: 0.0,
            last_frame: FrameTime::new(0.0, 0.0),
            size,
            burst_size: size,
        };
        engine.reset_population();
        engine
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    pub fn visualizer_mode(&self) -> VisualizerMode {
        self.visualizer_mode
    }

    pub fn table(&self) -> &EffectTable {
        &self.table
    }

    /// Settings of the active effect
    pub fn settings(&self) -> EffectSettings {
        self.table.get(self.effect)
    }

    pub fn field(&self) -> &AmbientField {
        &self.field
    }

    pub fn bursts(&self) -> &BurstEmitter {
        &self.bursts
    }

    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    /// Timing handed to the particles on the latest tick
    pub fn last_frame(&self) -> FrameTime {
        self.last_frame
    }

    /// Run one frame. `now` is the host clock in seconds since start.
    pub fn tick(&mut self, now: f64, layers: &mut Layers, analysis: Option<&mut dyn AnalysisSource>) {
        let dt = ((now - self.last_time) as f32).clamp(0.0, MAX_FRAME_DT);
        self.last_time = now;
        let time = FrameTime::new(dt, now.rem_euclid(CLOCK_WRAP) as f32);
        self.last_frame = time;

        self.size = layers.ambient.size();
        self.burst_size = layers.burst.size();

        layers.clear();

        if self.effect != EffectKind::None {
            self.field.step(time, &mut *layers.ambient, &mut self.rng);
        }

        self.bursts.update_and_draw(dt, &mut *layers.burst);

        if self.visualizer_mode != VisualizerMode::None {
            if let Some(source) = analysis {
                self.visualizer
                    .update_and_draw(self.visualizer_mode, source, &mut *layers.visualizer);
            }
        }
    }

    /// Switch ambient effect, loading that effect's settings
    pub fn set_effect(&mut self, effect: EffectKind) {
        self.effect = effect;
        self.reset_population();
        log::info!("Effect: {} {:?}", effect.label(), self.settings());
    }

    pub fn set_visualizer(&mut self, mode: VisualizerMode) {
        self.visualizer_mode = mode;
        log::info!("Visualizer: {}", mode.label());
    }

    /// Change the active effect's settings and repopulate right away
    pub fn update_settings(&mut self, f: impl FnOnce(&mut EffectSettings)) {
        let mut settings = self.settings();
        f(&mut settings);
        self.table.set(self.effect, settings);
        self.reset_population();
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.update_settings(|s| s.quantity = quantity);
    }

    pub fn set_size(&mut self, size: u32) {
        self.update_settings(|s| s.size = size);
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.update_settings(|s| s.speed = speed);
    }

    /// A new track started: burst from the centre and repopulate
    pub fn track_changed(&mut self) {
        let (w, h) = self.burst_size;
        self.bursts.trigger(w / 2.0, h / 2.0, &mut self.rng);
        self.reset_population();
    }

    /// New surface dimensions; live particles are kept
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = (width, height);
        self.burst_size = (width, height);
    }

    fn reset_population(&mut self) {
        let settings = self.table.get(self.effect);
        self.field.reset(self.effect, settings, self.size, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisWindow, SourceState};
    use crate::burst::BURST_COUNT;
    use crate::surface::recording::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Surfaces {
        ambient: RecordingSurface,
        burst: RecordingSurface,
        visualizer: RecordingSurface,
    }

    impl Surfaces {
        fn new(w: f32, h: f32) -> Self {
            Self {
                ambient: RecordingSurface::new(w, h),
                burst: RecordingSurface::new(w, h),
                visualizer: RecordingSurface::new(w, h),
            }
        }

        fn layers(&mut self) -> Layers<'_> {
            Layers::new(&mut self.ambient, &mut self.burst, &mut self.visualizer)
        }
    }

    struct FlatSource(usize);

    impl AnalysisSource for FlatSource {
        fn bin_count(&self) -> usize {
            16
        }
        fn state(&self) -> SourceState {
            SourceState::Running
        }
        fn resume(&mut self) {}
        fn suspend(&mut self) {}
        fn sample(&mut self, window: &mut AnalysisWindow) {
            self.0 += 1;
            window.frequency.iter_mut().for_each(|v| *v = 255);
        }
    }

    fn engine(effect: EffectKind, mode: VisualizerMode) -> Engine<StdRng> {
        Engine::new(StdRng::seed_from_u64(7), EffectTable::default(), effect, mode, (800.0, 600.0))
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut e = engine(EffectKind::Rain, VisualizerMode::None);
        let mut s = Surfaces::new(800.0, 600.0);

        // Track one drop with a known speed to read dt back
        e.tick(0.0, &mut s.layers(), None);
        let before: Vec<f32> = e.field().particles().iter().map(|p| p.position().1).collect();
        e.tick(5.0, &mut s.layers(), None);
        let after: Vec<f32> = e.field().particles().iter().map(|p| p.position().1).collect();

        // Rain tops out at 1000 px/s at speed 100; default is 500 at most
        for (b, a) in before.iter().zip(&after) {
            if a > b {
                assert!(a - b <= 500.0 * MAX_FRAME_DT + 1e-3);
            }
        }
    }

    #[test]
    fn test_dt_stays_accurate_after_long_uptime() {
        let mut e = engine(EffectKind::Snow, VisualizerMode::None);
        let mut s = Surfaces::new(800.0, 600.0);

        for start in [200_000.0, 600_000.0] {
            e.tick(start, &mut s.layers(), None);
            for k in 1..8 {
                e.tick(start + k as f64 / 60.0, &mut s.layers(), None);
                let frame = e.last_frame();
                assert!((frame.dt - 1.0 / 60.0).abs() < 1e-5, "dt {} at {}", frame.dt, start);
                assert!(frame.elapsed >= 0.0 && frame.elapsed < CLOCK_WRAP as f32);
            }
        }
    }

    #[test]
    fn test_tick_clears_every_layer() {
        let mut e = engine(EffectKind::Dust, VisualizerMode::Bars);
        let mut s = Surfaces::new(800.0, 600.0);
        let mut source = FlatSource(0);
        e.tick(0.016, &mut s.layers(), Some(&mut source));
        e.tick(0.032, &mut s.layers(), Some(&mut source));

        assert_eq!(s.ambient.clears, 2);
        assert_eq!(s.burst.clears, 2);
        assert_eq!(s.visualizer.clears, 2);
        assert_eq!(source.0, 2);
        assert_eq!(s.visualizer.rects().len(), 16);
        assert_eq!(s.ambient.circles().len(), 30);
    }

    #[test]
    fn test_missing_source_skips_visualizer() {
        let mut e = engine(EffectKind::None, VisualizerMode::Circle);
        let mut s = Surfaces::new(800.0, 600.0);
        e.tick(0.016, &mut s.layers(), None);
        assert!(s.visualizer.calls.is_empty());
        assert!(s.ambient.calls.is_empty());
    }

    #[test]
    fn test_switching_effect_resets_population() {
        let mut e = engine(EffectKind::Bubbles, VisualizerMode::None);
        let mut s = Surfaces::new(800.0, 600.0);
        e.tick(0.016, &mut s.layers(), None);
        assert_eq!(e.field().len(), 20);

        e.set_effect(EffectKind::Rain);
        assert_eq!(e.field().kind(), EffectKind::Rain);
        assert_eq!(e.field().len(), 60);
        e.tick(0.032, &mut s.layers(), None);
        assert_eq!(e.field().len(), 60);

        e.set_effect(EffectKind::Stars);
        assert!(e.field().is_empty());
    }

    #[test]
    fn test_settings_change_repopulates_active_effect() {
        let mut e = engine(EffectKind::Snow, VisualizerMode::None);
        e.set_quantity(75);
        assert_eq!(e.field().len(), 75);
        assert_eq!(e.table().get(EffectKind::Snow).quantity, 75);

        e.set_size(20);
        assert_eq!(e.field().settings().size, 20);

        // Clamped into range
        e.set_speed(1000);
        assert_eq!(e.settings().speed, 100);

        // Other effects untouched
        assert_eq!(e.table().get(EffectKind::Rain), EffectSettings::defaults_for(EffectKind::Rain));
    }

    #[test]
    fn test_track_change_bursts_once_and_drains() {
        let mut e = engine(EffectKind::Embers, VisualizerMode::None);
        let mut s = Surfaces::new(800.0, 600.0);
        e.tick(0.0, &mut s.layers(), None);

        e.track_changed();
        assert_eq!(e.bursts().len(), BURST_COUNT);
        assert!(e.bursts().particles().iter().all(|p| (p.x, p.y) == (400.0, 300.0)));
        assert_eq!(e.field().len(), 15);

        let mut now = 0.0;
        for _ in 0..120 {
            now += 1.0 / 60.0;
            e.tick(now, &mut s.layers(), None);
        }
        assert!(e.bursts().is_empty());
    }

    #[test]
    fn test_resize_is_used_on_next_frame() {
        let mut e = engine(EffectKind::Bubbles, VisualizerMode::None);
        let mut small = Surfaces::new(200.0, 100.0);
        e.resize(200.0, 100.0);
        e.track_changed();
        assert!(e.bursts().particles().iter().all(|p| (p.x, p.y) == (100.0, 50.0)));

        // Newly scattered bubbles fit the new bounds
        for p in e.field().particles() {
            let (x, y) = p.position();
            assert!(x < 200.0 && y < 100.0);
        }

        e.tick(0.016, &mut small.layers(), None);
        assert_eq!(e.field().len(), 20);
    }
}
