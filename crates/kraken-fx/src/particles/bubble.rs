//! Translucent bubbles rising with a sideways wobble.

use rand::Rng;
use std::f32::consts::TAU;

use super::{FrameTime, Liveness, Spawn};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::{GradientStop, Surface};

/// Fixed per-frame step the rise and wobble are tuned against
const FRAME_STEP: f32 = 0.016;

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub wobble_speed: f32,
    pub wobble_amp: f32,
    pub wobble_offset: f32,
    pub opacity: f32,
}

impl Bubble {
    pub fn spawn<R: Rng>(settings: &EffectSettings, spawn: Spawn, (w, h): (f32, f32), rng: &mut R) -> Self {
        let size_scale = settings.size_scale();
        let speed_scale = settings.speed_scale();

        Self {
            x: rng.random::<f32>() * w,
            y: match spawn {
                Spawn::Scattered => rng.random::<f32>() * h,
                Spawn::Edge => h + 20.0,
            },
            size: (rng.random::<f32>() * 8.0 + 4.0) * size_scale,
            speed: (rng.random::<f32>() * 20.0 + 15.0) * speed_scale,
            wobble_speed: rng.random::<f32>() * 2.0 + 1.0,
            wobble_amp: rng.random::<f32>() * 25.0 + 10.0,
            wobble_offset: rng.random::<f32>() * TAU,
            opacity: rng.random::<f32>() * 0.4 + 0.2,
        }
    }

    pub fn update_and_draw(&mut self, time: FrameTime, surface: &mut dyn Surface) -> Liveness {
        self.y -= self.speed * FRAME_STEP;
        self.x += (time.elapsed * self.wobble_speed + self.wobble_offset).sin() * self.wobble_amp * FRAME_STEP;

        if self.y + self.size < -10.0 {
            return Liveness::Dead;
        }

        let o = self.opacity;
        let focus = (self.x - self.size * 0.3, self.y - self.size * 0.3);
        let stops = [
            GradientStop::new(0.0, Rgba::from_u8(120, 200, 255, o)),
            GradientStop::new(0.5, Rgba::from_u8(59, 158, 190, o * 0.5)),
            GradientStop::new(1.0, Rgba::from_u8(59, 158, 190, o * 0.1)),
        ];
        surface.fill_radial_gradient(self.x, self.y, self.size, focus, &stops);

        // Shine highlight
        surface.fill_circle(focus.0, focus.1, self.size * 0.3, Rgba::WHITE.with_alpha(o * 0.7));

        Liveness::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EffectKind;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings() -> EffectSettings {
        EffectSettings::defaults_for(EffectKind::Bubbles)
    }

    #[test]
    fn test_edge_spawn_starts_below_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let b = Bubble::spawn(&settings(), Spawn::Edge, (800.0, 600.0), &mut rng);
            assert_eq!(b.y, 620.0);
            assert!(b.x >= 0.0 && b.x < 800.0);
        }
    }

    #[test]
    fn test_rises_and_draws_body_plus_highlight() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut b = Bubble::spawn(&settings(), Spawn::Scattered, (800.0, 600.0), &mut rng);
        let start_y = b.y;

        let live = b.update_and_draw(FrameTime::new(1.0 / 60.0, 0.5), &mut surface);

        assert_eq!(live, Liveness::Alive);
        assert!((start_y - b.y - b.speed * FRAME_STEP).abs() < 1e-4);
        assert!(matches!(surface.calls[0], DrawCall::Gradient { .. }));
        assert!(matches!(surface.calls[1], DrawCall::Circle { .. }));
    }

    #[test]
    fn test_dies_once_fully_above_top() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut b = Bubble::spawn(&settings(), Spawn::Scattered, (800.0, 600.0), &mut rng);
        b.y = -10.0 - b.size;

        let live = b.update_and_draw(FrameTime::new(1.0 / 60.0, 0.0), &mut surface);
        assert_eq!(live, Liveness::Dead);
        assert!(surface.calls.is_empty());
    }
}
