//! Glyph particles that spill from the pointer and fall away.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const TRAIL_GLYPHS: &str = "01アイウエオカキクケコ<>{}[];=+-*/&@#$";
pub const SPAWN_INTERVAL_MS: f64 = 50.0;
pub const MAX_PARTICLES: usize = 50;
const GRAVITY: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    pub max_life: f64,
    pub ch: char,
}

impl Particle {
    pub fn alpha(&self) -> f64 {
        self.life * 0.8
    }

    pub fn font_size(&self) -> f64 {
        12.0 + (1.0 - self.life) * 8.0
    }

    pub fn glow(&self) -> f64 {
        10.0 * self.life
    }
}

#[derive(Debug)]
pub struct Trail {
    pointer: Option<(f64, f64)>,
    particles: Vec<Particle>,
    glyphs: Vec<char>,
    last_spawn: f64,
    rng: SmallRng,
    stopped: bool,
}

impl Trail {
    pub fn new(seed: u64) -> Self {
        Self {
            pointer: None,
            particles: Vec::new(),
            glyphs: TRAIL_GLYPHS.chars().collect(),
            last_spawn: 0.0,
            rng: SmallRng::seed_from_u64(seed),
            stopped: false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn move_pointer(&mut self, x: f64, y: f64) {
        if !self.stopped {
            self.pointer = Some((x, y));
        }
    }

    /// Spawns at most one particle per [`SPAWN_INTERVAL_MS`] at the pointer,
    /// then moves and ages every particle, dropping the expired ones.
    /// Returns `false` once the trail was stopped.
    pub fn frame(&mut self, time_ms: f64) -> bool {
        if self.stopped {
            return false;
        }
        if time_ms - self.last_spawn > SPAWN_INTERVAL_MS {
            self.spawn();
            self.last_spawn = time_ms;
        }
        self.particles.retain_mut(|particle| {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.vy += GRAVITY;
            particle.life -= 1.0 / particle.max_life;
            particle.life > 0.0
        });
        true
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.pointer = None;
    }

    fn spawn(&mut self) {
        let Some((x, y)) = self.pointer else {
            return;
        };
        let rng = &mut self.rng;
        let particle = Particle {
            x,
            y,
            vx: (rng.random::<f64>() - 0.5) * 2.0,
            vy: (rng.random::<f64>() - 0.5) * 2.0 - 1.0,
            life: 1.0,
            max_life: 30.0 + rng.random::<f64>() * 30.0,
            ch: self.glyphs[rng.random_range(0..self.glyphs.len())],
        };
        self.particles.push(particle);
        if self.particles.len() > MAX_PARTICLES {
            self.particles.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nothing_spawns_before_the_pointer_moves() {
        let mut trail = Trail::new(1);
        for frame in 1..20 {
            trail.frame(frame as f64 * 60.0);
        }
        assert!(trail.particles().is_empty());
    }

    #[test]
    fn spawns_at_the_pointer_at_most_every_interval() {
        let mut trail = Trail::new(2);
        trail.move_pointer(100.0, 200.0);
        trail.frame(51.0);
        assert_eq!(trail.particles().len(), 1);
        trail.frame(60.0);
        assert_eq!(trail.particles().len(), 1);
        trail.frame(120.0);
        assert_eq!(trail.particles().len(), 2);
    }

    #[test]
    fn particles_fall_fade_and_expire() {
        let mut trail = Trail::new(3);
        trail.move_pointer(10.0, 10.0);
        trail.frame(51.0);
        let first = trail.particles()[0];
        assert!(first.life < 1.0);
        assert!(first.font_size() > 12.0);

        trail.pointer = None;
        for frame in 0..80 {
            trail.frame(100.0 + frame as f64);
        }
        assert!(trail.particles().is_empty());
    }

    #[test]
    fn particle_count_is_capped() {
        let mut trail = Trail::new(4);
        trail.move_pointer(5.0, 5.0);
        for frame in 1..=200 {
            trail.frame(frame as f64 * 51.0);
            assert!(trail.particles().len() <= MAX_PARTICLES);
        }
    }

    #[test]
    fn stopped_trail_ignores_frames_and_pointer() {
        let mut trail = Trail::new(5);
        trail.move_pointer(5.0, 5.0);
        trail.frame(51.0);
        let before = trail.particles().to_vec();
        trail.stop();
        trail.move_pointer(50.0, 50.0);
        assert!(!trail.frame(500.0));
        assert_eq!(trail.particles(), before.as_slice());
    }
}
