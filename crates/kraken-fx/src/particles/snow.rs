use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::{FrameTime, Liveness, Spawn};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::Surface;

const ARMS: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub wobble_speed: f32,
    pub wobble_amp: f32,
    pub wobble_offset: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
}

/// Rotate a local offset and translate it to the flake's centre
fn place((cx, cy): (f32, f32), (px, py): (f32, f32), angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (cx + px * cos - py * sin, cy + px * sin + py * cos)
}

impl Snowflake {
    pub fn spawn<R: Rng>(settings: &EffectSettings, spawn: Spawn, (w, h): (f32, f32), rng: &mut R) -> Self {
        Self {
            x: rng.random::<f32>() * w,
            y: match spawn {
                Spawn::Scattered => rng.random::<f32>() * h,
                Spawn::Edge => -20.0,
            },
            size: (rng.random::<f32>() * 3.0 + 2.0) * settings.size_scale(),
            speed: (rng.random::<f32>() * 15.0 + 10.0) * settings.speed_scale(),
            wobble_speed: rng.random::<f32>() * 1.5 + 0.5,
            wobble_amp: rng.random::<f32>() * 20.0 + 10.0,
            wobble_offset: rng.random::<f32>() * TAU,
            rotation: rng.random::<f32>() * TAU,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.5,
            opacity: rng.random::<f32>() * 0.6 + 0.4,
        }
    }

    pub fn update_and_draw(&mut self, time: FrameTime, surface: &mut dyn Surface) -> Liveness {
        self.y += self.speed * time.dt;
        self.x += (time.elapsed * self.wobble_speed + self.wobble_offset).sin() * self.wobble_amp * time.dt * 0.3;
        self.rotation += self.rotation_speed * time.dt;

        let (_, h) = surface.size();
        if self.y > h + self.size {
            return Liveness::Dead;
        }

        let centre = (self.x, self.y);
        let s = self.size;
        let color = Rgba::WHITE.with_alpha(self.opacity);
        let weight = s * 0.15;

        for arm in 0..ARMS {
            let angle = self.rotation + arm as f32 * PI / 3.0;
            let tip = place(centre, (0.0, -s), angle);
            let fork = place(centre, (0.0, -s * 0.4), angle);

            surface.stroke_line(centre, tip, weight, color);
            surface.stroke_line(fork, place(centre, (s * 0.25, -s * 0.6), angle), weight, color);
            surface.stroke_line(fork, place(centre, (-s * 0.25, -s * 0.6), angle), weight, color);
        }

        surface.fill_circle(self.x, self.y, s * 0.1, color);
        Liveness::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EffectKind;
    use crate::surface::recording::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flake() -> Snowflake {
        let mut rng = StdRng::seed_from_u64(41);
        Snowflake::spawn(&EffectSettings::defaults_for(EffectKind::Snow), Spawn::Edge, (500.0, 500.0), &mut rng)
    }

    #[test]
    fn test_six_arms_with_branches_and_centre_dot() {
        let mut f = flake();
        f.y = 100.0;
        let mut surface = RecordingSurface::new(500.0, 500.0);
        assert_eq!(f.update_and_draw(FrameTime::new(0.0, 0.0), &mut surface), Liveness::Alive);

        assert_eq!(surface.lines().len(), ARMS * 3);
        assert_eq!(surface.circles().len(), 1);
    }

    #[test]
    fn test_arm_tips_are_symmetric() {
        let mut f = flake();
        f.y = 100.0;
        f.rotation = 0.0;
        f.rotation_speed = 0.0;
        let mut surface = RecordingSurface::new(500.0, 500.0);
        f.update_and_draw(FrameTime::new(0.0, 0.0), &mut surface);

        let tips: Vec<(f32, f32)> = surface.lines().iter().step_by(3).map(|l| l.1).collect();
        assert_eq!(tips.len(), 6);
        for tip in &tips {
            let d = ((tip.0 - f.x).powi(2) + (tip.1 - f.y).powi(2)).sqrt();
            assert!((d - f.size).abs() < 1e-3);
        }
        // First arm points straight up with no rotation
        assert!((tips[0].0 - f.x).abs() < 1e-3);
        assert!((tips[0].1 - (f.y - f.size)).abs() < 1e-3);
    }

    #[test]
    fn test_rotates_and_falls() {
        let mut f = flake();
        let (y0, r0) = (f.y, f.rotation);
        let mut surface = RecordingSurface::new(500.0, 500.0);
        f.update_and_draw(FrameTime::new(0.1, 0.0), &mut surface);
        assert!(f.y > y0);
        assert!((f.rotation - (r0 + f.rotation_speed * 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_dies_below_bottom() {
        let mut f = flake();
        f.y = 500.0 + f.size + 1.0;
        let mut surface = RecordingSurface::new(500.0, 500.0);
        assert_eq!(f.update_and_draw(FrameTime::new(0.0, 0.0), &mut surface), Liveness::Dead);
        assert!(surface.calls.is_empty());
    }
}
