//! Fireflies wandering between random targets with a slow on/off glow.

use rand::Rng;

use super::{FrameTime, Liveness};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::Surface;

/// Distance at which a firefly considers its target reached
const ARRIVAL_RADIUS: f32 = 30.0;
/// Velocity multiplier applied every frame
const DRAG: f32 = 0.95;
/// Rate the rendered glow eases towards on/off
const GLOW_EASE: f32 = 3.0;
/// Below this intensity nothing is drawn
const MIN_VISIBLE_GLOW: f32 = 0.02;

#[derive(Clone, Debug, PartialEq)]
pub struct Firefly {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub glow_on: bool,
    /// Seconds until `glow_on` flips
    pub glow_timer: f32,
    pub glow_intensity: f32,
}

impl Firefly {
    pub fn spawn<R: Rng>(settings: &EffectSettings, (w, h): (f32, f32), rng: &mut R) -> Self {
        let speed_scale = settings.speed_scale();
        let glow_on = rng.random::<f32>() > 0.5;

        Self {
            x: rng.random::<f32>() * w,
            y: rng.random::<f32>() * h,
            size: (rng.random::<f32>() * 2.0 + 1.0) * settings.size_scale(),
            vx: (rng.random::<f32>() - 0.5) * 5.0 * speed_scale,
            vy: (rng.random::<f32>() - 0.5) * 5.0 * speed_scale,
            target_x: rng.random::<f32>() * w,
            target_y: rng.random::<f32>() * h,
            glow_on,
            glow_timer: rng.random::<f32>() * 3.0,
            glow_intensity: if glow_on { 1.0 } else { 0.0 },
        }
    }

    pub fn update_and_draw<R: Rng>(&mut self, time: FrameTime, surface: &mut dyn Surface, rng: &mut R) -> Liveness {
        let dt = time.dt;
        let (w, h) = surface.size();

        let dx = self.target_x - self.x;
        let dy = self.target_y - self.y;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < ARRIVAL_RADIUS {
            self.target_x = rng.random::<f32>() * w;
            self.target_y = rng.random::<f32>() * h;
        }

        if dist > 0.0 {
            self.vx += dx / dist * 5.0 * dt;
            self.vy += dy / dist * 5.0 * dt;
        }
        self.vx *= DRAG;
        self.vy *= DRAG;
        self.x += self.vx * dt * 20.0;
        self.y += self.vy * dt * 20.0;

        self.glow_timer -= dt;
        if self.glow_timer <= 0.0 {
            self.glow_on = !self.glow_on;
            self.glow_timer = 1.0 + rng.random::<f32>() * 3.0;
        }

        let target = if self.glow_on { 1.0 } else { 0.0 };
        self.glow_intensity += (target - self.glow_intensity) * dt * GLOW_EASE;

        if self.glow_intensity < MIN_VISIBLE_GLOW {
            return Liveness::Alive;
        }

        let glow = self.glow_intensity;
        surface.fill_circle(self.x, self.y, self.size * 5.0, Rgba::from_u8(180, 255, 80, glow * 0.1));
        surface.fill_circle(self.x, self.y, self.size * 2.5, Rgba::from_u8(200, 255, 120, glow * 0.3));
        surface.fill_circle(self.x, self.y, self.size, Rgba::from_u8(255, 255, 180, glow * 0.9));

        Liveness::Alive
    }
}
