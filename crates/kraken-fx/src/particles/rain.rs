use rand::Rng;

use super::{FrameTime, Liveness, Spawn};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::Surface;

#[derive(Clone, Debug, PartialEq)]
pub struct RainDrop {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
    pub opacity: f32,
}

impl RainDrop {
    pub fn spawn<R: Rng>(settings: &EffectSettings, spawn: Spawn, (w, h): (f32, f32), rng: &mut R) -> Self {
        Self {
            x: rng.random::<f32>() * w,
            y: match spawn {
                Spawn::Scattered => rng.random::<f32>() * h,
                Spawn::Edge => -20.0,
            },
            length: (rng.random::<f32>() * 15.0 + 10.0) * settings.size_scale(),
            speed: (rng.random::<f32>() * 300.0 + 200.0) * settings.speed_scale(),
            opacity: rng.random::<f32>() * 0.5 + 0.3,
        }
    }

    pub fn update_and_draw(&mut self, time: FrameTime, surface: &mut dyn Surface) -> Liveness {
        self.y += self.speed * time.dt;

        let (_, h) = surface.size();
        if self.y > h + self.length {
            return Liveness::Dead;
        }

        surface.stroke_line(
            (self.x, self.y),
            (self.x + 1.0, self.y + self.length),
            1.0,
            Rgba::from_u8(150, 200, 255, self.opacity),
        );
        Liveness::Alive
    }
}
