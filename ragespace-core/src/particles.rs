//! The particle engine.
//!
//! A transient set of decaying motion particles, spawned in bursts at the
//! hit point and stepped once per animation frame by the host. Nothing here
//! is persisted and nothing here draws; the TUI reads the live set each
//! frame and maps `life` to a color fade.
//!
//! Coordinates are the rage-room world space (y grows downward, like the
//! original canvas), so gravity is a positive vertical acceleration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Downward acceleration added to `vy` each frame.
pub const GRAVITY: f64 = 0.3;

/// Life lost per frame; a particle lives for 1/LIFE_DECAY frames.
pub const LIFE_DECAY: f64 = 0.02;

/// Half-width of the uniform velocity distribution for a burst.
const SPREAD: f64 = 5.0;

/// One decaying motion particle.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Remaining life in (0, 1]; drives the render fade.
    pub life: f64,
}

/// Owns all live particles and the RNG that scatters burst velocities.
#[derive(Debug)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleEngine {
    pub fn new() -> Self {
        Self { particles: Vec::new(), rng: StdRng::from_entropy() }
    }

    /// Deterministic engine for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self { particles: Vec::new(), rng: StdRng::seed_from_u64(seed) }
    }

    /// Spawns `burst_size` particles at `(x, y)` with randomized outward
    /// velocity, each starting at full life.
    pub fn spawn_burst(&mut self, x: f64, y: f64, burst_size: usize) {
        for _ in 0..burst_size {
            let vx = self.rng.gen_range(-SPREAD..=SPREAD);
            let vy = self.rng.gen_range(-SPREAD..=SPREAD);
            self.particles.push(Particle { x, y, vx, vy, life: 1.0 });
        }
    }

    /// Advances every particle by one frame and drops the expired ones.
    ///
    /// Position integrates velocity, gravity pulls `vy` down, and life
    /// decays by a fixed rate. A particle whose life reaches zero is
    /// removed in the same step, so the live set never contains a dead
    /// particle for the renderer to see.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += GRAVITY;
            p.life -= LIFE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// The live set, in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drops every live particle. Called when the rage room resets.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_spawns_requested_count_at_point() {
        let mut engine = ParticleEngine::with_seed(7);
        engine.spawn_burst(120.0, 80.0, 6);
        assert_eq!(engine.len(), 6);
        for p in engine.particles() {
            assert_eq!((p.x, p.y), (120.0, 80.0));
            assert!((-SPREAD..=SPREAD).contains(&p.vx));
            assert!((-SPREAD..=SPREAD).contains(&p.vy));
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn life_strictly_decreases_each_step() {
        let mut engine = ParticleEngine::with_seed(7);
        engine.spawn_burst(0.0, 0.0, 3);
        let mut previous = 1.0f64;
        for _ in 0..10 {
            engine.step();
            let life = engine.particles()[0].life;
            assert!(life < previous);
            previous = life;
        }
    }

    #[test]
    fn gravity_accelerates_downward() {
        let mut engine = ParticleEngine::with_seed(7);
        engine.spawn_burst(0.0, 0.0, 1);
        let vy0 = engine.particles()[0].vy;
        engine.step();
        let vy1 = engine.particles()[0].vy;
        assert!((vy1 - (vy0 + GRAVITY)).abs() < f64::EPSILON);
    }

    #[test]
    fn particles_expire_when_life_runs_out_and_never_linger() {
        let mut engine = ParticleEngine::with_seed(7);
        engine.spawn_burst(0.0, 0.0, 4);
        // life 1.0 at 0.02/frame: alive through step 49, gone within the
        // next two steps (the margin absorbs accumulated rounding).
        for _ in 0..49 {
            engine.step();
            assert_eq!(engine.len(), 4);
            assert!(engine.particles().iter().all(|p| p.life > 0.0));
        }
        engine.step();
        engine.step();
        assert!(engine.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let mut engine = ParticleEngine::with_seed(7);
        engine.spawn_burst(5.0, 5.0, 8);
        engine.clear();
        assert!(engine.is_empty());
        engine.step(); // harmless on an empty set
    }
}
