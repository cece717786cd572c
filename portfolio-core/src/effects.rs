//! Scripted multi-step console output.
//!
//! An effect fills a progress bar in random increments, logging a stage line
//! each time a threshold is crossed. The console drives it with its own timers
//! and appends [`Effect::summary`] once the bar is full and the settle delay
//! has elapsed.

use rand::{Rng, RngCore};
use std::ops::RangeInclusive;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Intrusion,
}

struct Script {
    banner: &'static str,
    stages: &'static [(u32, &'static str)],
    summary: &'static [&'static str],
    increment: RangeInclusive<u32>,
    tick: Duration,
    settle: Duration,
}

const INTRUSION: Script = Script {
    banner: "⚠️  INITIATING HACK SEQUENCE...",
    stages: &[
        (10, "Bypassing firewall..."),
        (30, "Injecting payload..."),
        (50, "Accessing mainframe..."),
        (70, "Decrypting data..."),
        (90, "Almost there..."),
    ],
    summary: &[
        "ACCESS GRANTED ✓",
        "",
        "Just kidding! This is just a portfolio 😄",
        "But thanks for exploring!",
    ],
    increment: 5..=20,
    tick: Duration::from_millis(150),
    settle: Duration::from_millis(300),
};

impl EffectKind {
    fn script(self) -> &'static Script {
        match self {
            EffectKind::Intrusion => &INTRUSION,
        }
    }

    pub fn start(self) -> Effect {
        Effect {
            kind: self,
            progress: 0,
            next_stage: 0,
            transcript: vec![self.script().banner.to_string(), String::new()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Effect {
    kind: EffectKind,
    progress: u32,
    next_stage: usize,
    transcript: Vec<String>,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn is_filled(&self) -> bool {
        self.progress >= 100
    }

    pub fn tick_interval(&self) -> Duration {
        self.kind.script().tick
    }

    pub fn settle_delay(&self) -> Duration {
        self.kind.script().settle
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// `[█████░░░░░░░░░░░░░░░]  25%`
    pub fn progress_bar(&self) -> String {
        let filled = (self.progress / 5) as usize;
        format!(
            "[{}{}] {:>3}%",
            "█".repeat(filled),
            "░".repeat(20 - filled),
            self.progress
        )
    }

    /// One step of the script. Returns `true` once the bar is full.
    pub fn advance(&mut self, rng: &mut dyn RngCore) -> bool {
        if self.is_filled() {
            return true;
        }
        let script = self.kind.script();
        let increment = rng.random_range(script.increment.clone());
        self.progress = (self.progress + increment).min(100);

        while let Some(&(threshold, message)) = script.stages.get(self.next_stage) {
            if threshold > self.progress {
                break;
            }
            self.transcript
                .push(format!("{} {threshold}% - {message}", stage_bar(threshold)));
            self.next_stage += 1;
        }
        if self.is_filled() {
            self.transcript.push(format!("{} 100%", stage_bar(100)));
        }
        self.is_filled()
    }

    pub fn summary(&self) -> String {
        let mut lines = self.transcript.clone();
        lines.push(String::new());
        lines.extend(self.kind.script().summary.iter().map(|line| line.to_string()));
        lines.join("\n")
    }
}

fn stage_bar(percent: u32) -> String {
    let filled = (percent / 10) as usize;
    format!("[{}{}]", "■".repeat(filled), "□".repeat(10 - filled))
}
