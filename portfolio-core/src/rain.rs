//! Falling-character rain for the page background.
//!
//! The host calls [`Rain::frame`] from its animation-frame callback with the
//! frame timestamp and paints whatever comes back. Frames closer together than
//! [`FRAME_INTERVAL_MS`] are skipped.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const GLYPHS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン0123456789ABCDEF<>{}[]();:=+-*/&#@$";
pub const FONT_SIZE: f64 = 14.0;
pub const FRAME_INTERVAL_MS: f64 = 50.0;
/// Alpha of the black wash painted over the previous frame.
pub const FADE_ALPHA: f64 = 0.05;

const RESET_CHANCE: f64 = 0.025;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tone {
    Head,
    Bright,
    Dim { alpha: f64 },
}

impl Tone {
    pub fn css(self) -> String {
        match self {
            Tone::Head => "#ffffff".to_string(),
            Tone::Bright => "#88ff88".to_string(),
            Tone::Dim { alpha } => format!("rgba(74, 222, 128, {alpha:.2})"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub x: f64,
    pub y: f64,
    pub ch: char,
    pub tone: Tone,
}

#[derive(Debug)]
pub struct Rain {
    width: f64,
    height: f64,
    glyphs: Vec<char>,
    drops: Vec<f64>,
    last_frame: f64,
    rng: SmallRng,
    stopped: bool,
}

impl Rain {
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        let mut rain = Self {
            width: 0.0,
            height: 0.0,
            glyphs: GLYPHS.chars().collect(),
            drops: Vec::new(),
            last_frame: 0.0,
            rng: SmallRng::seed_from_u64(seed),
            stopped: false,
        };
        rain.resize(width, height);
        rain
    }

    /// Re-lays the columns for a new viewport; every drop restarts above the
    /// top edge.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.stopped {
            return;
        }
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let columns = (self.width / FONT_SIZE).floor() as usize;
        let rng = &mut self.rng;
        self.drops = (0..columns).map(|_| rng.random_range(-50.0..0.0)).collect();
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[f64] {
        &self.drops
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Advances every column by one row. Returns the glyphs to paint, or
    /// `None` when the frame is throttled or the rain was stopped.
    pub fn frame(&mut self, time_ms: f64) -> Option<Vec<Glyph>> {
        if self.stopped || time_ms - self.last_frame < FRAME_INTERVAL_MS {
            return None;
        }
        self.last_frame = time_ms;

        let mut painted = Vec::with_capacity(self.drops.len());
        for (column, drop) in self.drops.iter_mut().enumerate() {
            let ch = self.glyphs[self.rng.random_range(0..self.glyphs.len())];
            let x = column as f64 * FONT_SIZE;
            let y = *drop * FONT_SIZE;
            let brightness: f64 = self.rng.random();
            let tone = if brightness > 0.95 {
                Tone::Head
            } else if brightness > 0.8 {
                Tone::Bright
            } else {
                Tone::Dim {
                    alpha: 0.3 + self.rng.random::<f64>() * 0.4,
                }
            };
            painted.push(Glyph { x, y, ch, tone });

            if y > self.height && self.rng.random_bool(RESET_CHANCE) {
                *drop = 0.0;
            }
            *drop += 1.0;
        }
        Some(painted)
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }
}
