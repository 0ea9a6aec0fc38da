//! Shooting stars streaking from an edge towards the centre.
//!
//! Motion is per frame rather than per second: the velocity is sized so the
//! trip to the centre takes 0.6-1.0 s at 60 fps, and `life` counts frames.

use rand::Rng;

use super::{Liveness, Spawn};
use crate::color::Rgba;
use crate::settings::EffectSettings;
use crate::surface::Surface;

/// Distance outside the surface that new stars start from
const SPAWN_BUFFER: f32 = 50.0;
/// Stars only enter from the sides within the upper part of the sky
const SKY_FRACTION: f32 = 0.7;
/// Distance outside the surface after which a star is dropped
const CULL_MARGIN: f32 = 300.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub tail_length: f32,
    pub life: f32,
    pub max_life: f32,
    pub brightness: f32,
    pub size: f32,
}

impl ShootingStar {
    pub fn spawn<R: Rng>(settings: &EffectSettings, _spawn: Spawn, (w, h): (f32, f32), rng: &mut R) -> Self {
        let sky_height = h * SKY_FRACTION;

        // 0 = top, 1 = left, 2 = right
        let (start_x, start_y) = match rng.random_range(0..3) {
            0 => (rng.random::<f32>() * w, -SPAWN_BUFFER),
            1 => (-SPAWN_BUFFER, rng.random::<f32>() * sky_height),
            _ => (w + SPAWN_BUFFER, rng.random::<f32>() * sky_height),
        };

        let dx = w / 2.0 - start_x;
        let dy = h / 2.0 - start_y;
        let distance = (dx * dx + dy * dy).sqrt().max(1.0);

        let duration = 0.6 + rng.random::<f32>() * 0.4;
        let pixels_per_frame = distance / (duration * 60.0);
        let speed_scale = settings.speed_scale();
        let life = (distance / pixels_per_frame).ceil() + 25.0;

        Self {
            x: start_x,
            y: start_y,
            vx: dx / distance * pixels_per_frame * speed_scale,
            vy: dy / distance * pixels_per_frame * speed_scale,
            tail_length: 60.0 + rng.random::<f32>() * 80.0,
            life,
            max_life: life,
            brightness: 0.8 + rng.random::<f32>() * 0.2,
            size: (1.0 + rng.random::<f32>()) * settings.size_scale(),
        }
    }

    pub fn update_and_draw(&mut self, surface: &mut dyn Surface) -> Liveness {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= 1.0;

        let (w, h) = surface.size();
        let off_surface = self.x < -CULL_MARGIN
            || self.x > w + CULL_MARGIN
            || self.y < -CULL_MARGIN
            || self.y > h + CULL_MARGIN;
        if self.life <= 0.0 || off_surface {
            return Liveness::Dead;
        }

        let alpha = self.life / self.max_life;
        let speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
        let tail = if speed > 0.0 {
            let tail_scale = self.tail_length / speed;
            (self.x - self.vx * tail_scale, self.y - self.vy * tail_scale)
        } else {
            (self.x, self.y)
        };

        surface.stroke_line(
            (self.x, self.y),
            tail,
            2.0 + alpha,
            Rgba::WHITE.with_alpha(alpha * self.brightness),
        );
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

    const SIZE: (f32, f32) = (1000.0, 800.0);

    fn settings() -> EffectSettings {
        EffectSettings::defaults_for(EffectKind::Stars)
    }

    #[test]
    fn test_spawns_on_top_left_or_right_edge() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let star = ShootingStar::spawn(&settings(), Spawn::Edge, SIZE, &mut rng);
            let on_top = star.y == -SPAWN_BUFFER;
            let on_side = (star.x == -SPAWN_BUFFER || star.x == SIZE.0 + SPAWN_BUFFER)
                && star.y >= 0.0
                && star.y <= SIZE.1 * SKY_FRACTION;
            assert!(on_top || on_side, "unexpected start {:?}", (star.x, star.y));
        }
    }

    #[test]
    fn test_heads_for_centre_within_travel_window() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let star = ShootingStar::spawn(&settings(), Spawn::Edge, SIZE, &mut rng);
            let dx = SIZE.0 / 2.0 - star.x;
            let dy = SIZE.1 / 2.0 - star.y;
            assert!(star.vx * dx + star.vy * dy > 0.0);

            // At speed scale 1.0 the trip is 36-60 frames
            let distance = (dx * dx + dy * dy).sqrt();
            let speed = (star.vx * star.vx + star.vy * star.vy).sqrt();
            let frames = distance / speed;
            assert!(frames >= 35.9 && frames <= 60.1, "frames {}", frames);
            assert_eq!(star.life, star.max_life);
            assert!(star.life >= 61.0 && star.life <= 86.0);
        }
    }

    #[test]
    fn test_fades_with_life_and_expires() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut surface = RecordingSurface::new(SIZE.0, SIZE.1);
        let mut star = ShootingStar::spawn(&settings(), Spawn::Edge, SIZE, &mut rng);
        star.vx = 0.0;
        star.vy = 0.0;
        star.x = 100.0;
        star.y = 100.0;
        star.max_life = 4.0;
        star.life = 4.0;

        assert_eq!(star.update_and_draw(&mut surface), Liveness::Alive);
        assert_eq!(star.update_and_draw(&mut surface), Liveness::Alive);
        assert_eq!(star.update_and_draw(&mut surface), Liveness::Alive);
        assert_eq!(star.update_and_draw(&mut surface), Liveness::Dead);
        assert_eq!(surface.lines().len(), 3);
    }

    #[test]
    fn test_culled_outside_margin() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut surface = RecordingSurface::new(SIZE.0, SIZE.1);
        let mut star = ShootingStar::spawn(&settings(), Spawn::Edge, SIZE, &mut rng);
        star.x = SIZE.0 + CULL_MARGIN + 1.0;
        star.vx = 1.0;
        star.vy = 0.0;
        assert_eq!(star.update_and_draw(&mut surface), Liveness::Dead);
    }

    #[test]
    fn test_tail_points_back_along_velocity() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut surface = RecordingSurface::new(SIZE.0, SIZE.1);
        let mut star = ShootingStar::spawn(&settings(), Spawn::Edge, SIZE, &mut rng);
        star.x = 500.0;
        star.y = 400.0;
        star.vx = 3.0;
        star.vy = 4.0;
        star.tail_length = 100.0;

        star.update_and_draw(&mut surface);
        let (head, tail) = surface.lines()[0];
        assert_eq!(head, (503.0, 404.0));
        assert!((tail.0 - (503.0 - 60.0)).abs() < 1e-3);
        assert!((tail.1 - (404.0 - 80.0)).abs() < 1e-3);
    }
}
