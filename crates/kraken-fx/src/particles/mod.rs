//! Ambient particle effects.
//!
//! Each effect lives in its own module with a factory and a per-frame
//! update+draw rule. [`Particle`] ties them together as one sum type and
//! [`AmbientField`] owns the live population for the active effect.

mod bubble;
mod dust;
mod ember;
mod firefly;
mod rain;
mod shooting_star;
mod snow;

pub use bubble::Bubble;
pub use dust::DustMote;
pub use ember::Ember;
pub use firefly::Firefly;
pub use rain::RainDrop;
pub use shooting_star::ShootingStar;
pub use snow::Snowflake;

use rand::Rng;

use crate::settings::{EffectKind, EffectSettings};
use crate::surface::Surface;

/// Per-frame star spawn chance at quantity 50. The quantity slider scales it
/// linearly, so even at 100 a new star appears on well under 1% of frames.
pub const STAR_SPAWN_RATE: f64 = 0.003;

/// Timing for one animation frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Running animation clock in seconds
    pub elapsed: f32,
}

impl FrameTime {
    pub fn new(dt: f32, elapsed: f32) -> Self {
        Self { dt, elapsed }
    }
}

/// Outcome of a particle's update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

/// Where a new particle appears
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    /// Anywhere on the surface; used for the initial population so the
    /// first frames don't show a wave entering from one edge
    Scattered,
    /// At the effect's natural entry edge
    Edge,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Particle {
    Bubble(Bubble),
    Rain(RainDrop),
    Star(ShootingStar),
    Ember(Ember),
    Dust(DustMote),
    Snow(Snowflake),
    Firefly(Firefly),
}

impl Particle {
    /// Create a particle for `kind`; `None` has no particles
    pub fn spawn<R: Rng>(
        kind: EffectKind,
        settings: &EffectSettings,
        spawn: Spawn,
        size: (f32, f32),
        rng: &mut R,
    ) -> Option<Self> {
        let particle = match kind {
            EffectKind::None => return None,
            EffectKind::Bubbles => Particle::Bubble(Bubble::spawn(settings, spawn, size, rng)),
            EffectKind::Rain => Particle::Rain(RainDrop::spawn(settings, spawn, size, rng)),
            EffectKind::Stars => Particle::Star(ShootingStar::spawn(settings, spawn, size, rng)),
            EffectKind::Embers => Particle::Ember(Ember::spawn(settings, spawn, size, rng)),
            EffectKind::Dust => Particle::Dust(DustMote::spawn(settings, size, rng)),
            EffectKind::Snow => Particle::Snow(Snowflake::spawn(settings, spawn, size, rng)),
            EffectKind::Fireflies => Particle::Firefly(Firefly::spawn(settings, size, rng)),
        };
        Some(particle)
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Particle::Bubble(_) => EffectKind::Bubbles,
            Particle::Rain(_) => EffectKind::Rain,
            Particle::Star(_) => EffectKind::Stars,
            Particle::Ember(_) => EffectKind::Embers,
            Particle::Dust(_) => EffectKind::Dust,
            Particle::Snow(_) => EffectKind::Snow,
            Particle::Firefly(_) => EffectKind::Fireflies,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        match self {
            Particle::Bubble(p) => (p.x, p.y),
            Particle::Rain(p) => (p.x, p.y),
            Particle::Star(p) => (p.x, p.y),
            Particle::Ember(p) => (p.x, p.y),
            Particle::Dust(p) => (p.x, p.y),
            Particle::Snow(p) => (p.x, p.y),
            Particle::Firefly(p) => (p.x, p.y),
        }
    }

    /// Advance one frame and draw if still alive
    pub fn update_and_draw<R: Rng>(&mut self, time: FrameTime, surface: &mut dyn Surface, rng: &mut R) -> Liveness {
        match self {
            Particle::Bubble(p) => p.update_and_draw(time, surface),
            Particle::Rain(p) => p.update_and_draw(time, surface),
            Particle::Star(p) => p.update_and_draw(surface),
            Particle::Ember(p) => p.update_and_draw(time, surface),
            Particle::Dust(p) => p.update_and_draw(time, surface),
            Particle::Snow(p) => p.update_and_draw(time, surface),
            Particle::Firefly(p) => p.update_and_draw(time, surface, rng),
        }
    }
}

/// Population held constant for steady-state effects, `None` otherwise
pub fn population_target(kind: EffectKind, settings: &EffectSettings) -> Option<usize> {
    kind.is_steady_state().then_some(settings.quantity as usize)
}

/// Owns the live particles of the active ambient effect
pub struct AmbientField {
    kind: EffectKind,
    settings: EffectSettings,
    particles: Vec<Particle>,
    /// Scratch liveness flags, one per particle, reused across frames
    liveness: Vec<Liveness>,
}

impl Default for AmbientField {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbientField {
    pub fn new() -> Self {
        Self {
            kind: EffectKind::None,
            settings: EffectSettings::defaults_for(EffectKind::None),
            particles: Vec::new(),
            liveness: Vec::new(),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn settings(&self) -> EffectSettings {
        self.settings
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Replace the population with a fresh one for `kind`.
    ///
    /// Steady-state effects start fully populated and scattered. Stars start
    /// empty and appear one at a time.
    pub fn reset<R: Rng>(&mut self, kind: EffectKind, settings: EffectSettings, size: (f32, f32), rng: &mut R) {
        self.kind = kind;
        self.settings = settings;
        self.particles.clear();

        if let Some(target) = population_target(kind, &settings) {
            self.particles.reserve(target);
            for _ in 0..target {
                if let Some(p) = Particle::spawn(kind, &settings, Spawn::Scattered, size, rng) {
                    self.particles.push(p);
                }
            }
        }
    }

    /// Advance and draw every particle, then replace or drop the dead ones
    pub fn step<R: Rng>(&mut self, time: FrameTime, surface: &mut dyn Surface, rng: &mut R) {
        if self.kind == EffectKind::None {
            return;
        }

        // Pass 1: update + draw, recording liveness
        self.liveness.clear();
        for particle in self.particles.iter_mut() {
            self.liveness.push(particle.update_and_draw(time, surface, rng));
        }

        // Pass 2: maintain the population against the current surface size
        let size = surface.size();
        match population_target(self.kind, &self.settings) {
            Some(target) => self.replenish(target, size, rng),
            None => self.thin_and_spawn_stars(size, rng),
        }
    }

    fn replenish<R: Rng>(&mut self, target: usize, size: (f32, f32), rng: &mut R) {
        let (kind, settings) = (self.kind, self.settings);

        for (slot, live) in self.particles.iter_mut().zip(&self.liveness) {
            if *live == Liveness::Dead {
                if let Some(fresh) = Particle::spawn(kind, &settings, Spawn::Edge, size, rng) {
                    *slot = fresh;
                }
            }
        }

        self.particles.truncate(target);
        while self.particles.len() < target {
            match Particle::spawn(kind, &settings, Spawn::Edge, size, rng) {
                Some(p) => self.particles.push(p),
                None => break,
            }
        }
    }

    fn thin_and_spawn_stars<R: Rng>(&mut self, size: (f32, f32), rng: &mut R) {
        let mut flags = self.liveness.iter();
        self.particles
            .retain(|_| flags.next().copied().unwrap_or(Liveness::Alive) == Liveness::Alive);

        let chance = (STAR_SPAWN_RATE * self.settings.quantity as f64 / 50.0).clamp(0.0, 1.0);
        if rng.random_bool(chance) {
            if let Some(star) = Particle::spawn(self.kind, &self.settings, Spawn::Edge, size, rng) {
                self.particles.push(star);
            }
        }
    }
}
