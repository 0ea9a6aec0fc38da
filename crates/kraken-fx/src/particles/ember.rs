use rand::Rng;
use std::f32::consts::TAU;

use super::{FrameTime, Liveness, Spawn};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::Surface;

#[derive(Clone, Debug, PartialEq)]
pub struct Ember {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub wobble_speed: f32,
    pub wobble_amp: f32,
    pub wobble_offset: f32,
    /// Orange-red, degrees
    pub hue: f32,
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
}

impl Ember {
    pub fn spawn<R: Rng>(settings: &EffectSettings, spawn: Spawn, (w, h): (f32, f32), rng: &mut R) -> Self {
        Self {
            x: rng.random::<f32>() * w,
            y: match spawn {
                Spawn::Scattered => rng.random::<f32>() * h,
                Spawn::Edge => h + 20.0,
            },
            size: (rng.random::<f32>() * 2.0 + 1.0) * settings.size_scale(),
            speed: (rng.random::<f32>() * 8.0 + 5.0) * settings.speed_scale(),
            wobble_speed: rng.random::<f32>() * 1.5 + 0.5,
            wobble_amp: rng.random::<f32>() * 20.0 + 10.0,
            wobble_offset: rng.random::<f32>() * TAU,
            hue: rng.random::<f32>() * 40.0 + 10.0,
            life: 1.0,
            decay: 0.0003 + rng.random::<f32>() * 0.0003,
        }
    }

    /// Two offset sines so neighbouring embers never pulse in step
    fn flicker(&self, t: f32) -> f32 {
        0.6 + (t * 8.0 + self.wobble_offset).sin() * 0.2 + (t * 13.0 + self.wobble_offset * 2.0).sin() * 0.2
    }

    pub fn update_and_draw(&mut self, time: FrameTime, surface: &mut dyn Surface) -> Liveness {
        self.y -= self.speed * time.dt;
        self.x += (time.elapsed * self.wobble_speed + self.wobble_offset).sin() * self.wobble_amp * time.dt * 0.5;
        self.life -= self.decay;

        if self.life <= 0.0 || self.y < -20.0 {
            return Liveness::Dead;
        }

        let glow = self.life * self.flicker(time.elapsed);

        // Outer soft glow, middle glow, hot core
        surface.fill_circle(self.x, self.y, self.size * 3.0, Rgba::hsla(self.hue, 1.0, 0.5, glow * 0.15));
        surface.fill_circle(self.x, self.y, self.size * 1.5, Rgba::hsla(self.hue + 10.0, 1.0, 0.6, glow * 0.4));
        surface.fill_circle(self.x, self.y, self.size * 0.6, Rgba::hsla(self.hue + 30.0, 1.0, 0.85, glow));

        Liveness::Alive
    }
}
