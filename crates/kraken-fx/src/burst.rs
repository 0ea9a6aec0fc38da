//! One-shot radial burst played when a new track loads.

use rand::Rng;
use std::f32::consts::TAU;

use crate::color::Rgba;
use crate::surface::Surface;

/// Particles per burst
pub const BURST_COUNT: usize = 40;

/// Downward acceleration, px/s²
const GRAVITY: f32 = 80.0;
/// Horizontal velocity multiplier per frame
const DRAG: f32 = 0.98;

#[derive(Clone, Debug, PartialEq)]
pub struct BurstParticle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    /// Cyan range, degrees
    pub hue: f32,
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
}

impl BurstParticle {
    fn spawn<R: Rng>(x: f32, y: f32, rng: &mut R) -> Self {
        let angle = rng.random::<f32>() * TAU;
        let speed = rng.random::<f32>() * 200.0 + 80.0;
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            size: rng.random::<f32>() * 5.0 + 2.0,
            hue: 180.0 + rng.random::<f32>() * 40.0,
            life: 1.0,
            decay: rng.random::<f32>() * 0.015 + 0.01,
        }
    }
}

/// Owns every in-flight burst particle, independent of the ambient field
#[derive(Default)]
pub struct BurstEmitter {
    particles: Vec<BurstParticle>,
}

impl BurstEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Queue a fresh burst centred on `(x, y)`
    pub fn trigger<R: Rng>(&mut self, x: f32, y: f32, rng: &mut R) {
        self.particles.reserve(BURST_COUNT);
        for _ in 0..BURST_COUNT {
            self.particles.push(BurstParticle::spawn(x, y, rng));
        }
    }

    pub fn update_and_draw(&mut self, dt: f32, surface: &mut dyn Surface) {
        self.particles.retain_mut(|p| {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vy += GRAVITY * dt;
            p.vx *= DRAG;
            p.life -= p.decay;

            if p.life <= 0.0 {
                return false;
            }

            surface.fill_circle(p.x, p.y, p.size * p.life, Rgba::hsla(p.hue, 0.8, 0.6, p.life));
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_trigger_spawns_forty_at_centre() {
        let mut rng = StdRng::seed_from_u64(60);
        let mut emitter = BurstEmitter::new();
        emitter.trigger(400.0, 300.0, &mut rng);

        assert_eq!(emitter.len(), BURST_COUNT);
        for p in emitter.particles() {
            assert_eq!((p.x, p.y), (400.0, 300.0));
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            assert!(speed >= 79.9 && speed <= 280.1);
            assert!(p.hue >= 180.0 && p.hue <= 220.0);
            assert!(p.decay >= 0.01 && p.decay <= 0.025);
        }
    }

    #[test]
    fn test_gravity_and_drag() {
        let mut rng = StdRng::seed_from_u64(61);
        let mut emitter = BurstEmitter::new();
        emitter.trigger(0.0, 0.0, &mut rng);
        let before = emitter.particles()[0].clone();

        let mut surface = RecordingSurface::new(800.0, 600.0);
        emitter.update_and_draw(0.1, &mut surface);
        let after = &emitter.particles()[0];

        assert!((after.vy - (before.vy + GRAVITY * 0.1)).abs() < 1e-3);
        assert!((after.vx - before.vx * DRAG).abs() < 1e-3);
        assert!((after.life - (1.0 - before.decay)).abs() < 1e-6);
    }

    #[test]
    fn test_radius_and_alpha_follow_life() {
        let mut rng = StdRng::seed_from_u64(62);
        let mut emitter = BurstEmitter::new();
        emitter.trigger(100.0, 100.0, &mut rng);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        emitter.update_and_draw(1.0 / 60.0, &mut surface);

        let circles = surface.circles();
        assert_eq!(circles.len(), BURST_COUNT);
        for (p, c) in emitter.particles().iter().zip(&circles) {
            assert!((c.2 - p.size * p.life).abs() < 1e-4);
        }
    }

    #[test]
    fn test_burst_drains_to_empty() {
        let mut rng = StdRng::seed_from_u64(63);
        let mut emitter = BurstEmitter::new();
        emitter.trigger(100.0, 100.0, &mut rng);
        emitter.trigger(200.0, 100.0, &mut rng);
        assert_eq!(emitter.len(), BURST_COUNT * 2);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        // Slowest decay is 0.01 per frame
        for _ in 0..101 {
            emitter.update_and_draw(1.0 / 60.0, &mut surface);
        }
        assert!(emitter.is_empty());
    }
}
