use rand::Rng;
use std::f32::consts::TAU;

use super::{FrameTime, Liveness};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::Surface;

/// How far past an edge a mote drifts before reappearing opposite
const WRAP_MARGIN: f32 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DustMote {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
    pub wobble_speed: f32,
    pub wobble_offset: f32,
    pub opacity: f32,
}

impl DustMote {
    /// Dust has no entry edge; it is always scattered
    pub fn spawn<R: Rng>(settings: &EffectSettings, (w, h): (f32, f32), rng: &mut R) -> Self {
        let speed_scale = settings.speed_scale();
        Self {
            x: rng.random::<f32>() * w,
            y: rng.random::<f32>() * h,
            size: (rng.random::<f32>() * 1.5 + 0.5) * settings.size_scale(),
            vx: (rng.random::<f32>() - 0.5) * 6.0 * speed_scale,
            vy: (rng.random::<f32>() - 0.5) * 4.0 * speed_scale,
            wobble_speed: rng.random::<f32>() * 0.3 + 0.1,
            wobble_offset: rng.random::<f32>() * TAU,
            opacity: rng.random::<f32>() * 0.2 + 0.05,
        }
    }

    pub fn update_and_draw(&mut self, time: FrameTime, surface: &mut dyn Surface) -> Liveness {
        let t = time.elapsed;
        let wobble = (t * self.wobble_speed + self.wobble_offset).sin();
        self.x += (self.vx + wobble * 2.0) * time.dt;
        self.y += (self.vy + wobble) * time.dt;

        let (w, h) = surface.size();
        if self.x < -WRAP_MARGIN {
            self.x = w + WRAP_MARGIN;
        }
        if self.x > w + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        }
        if self.y < -WRAP_MARGIN {
            self.y = h + WRAP_MARGIN;
        }
        if self.y > h + WRAP_MARGIN {
            self.y = -WRAP_MARGIN;
        }

        let shimmer = 0.8 + (t * 0.5 + self.wobble_offset).sin() * 0.2;
        surface.fill_circle(self.x, self.y, self.size, Rgba::from_u8(220, 215, 200, self.opacity * shimmer));

        Liveness::Alive
    }
}
