//! Staged reveal of a page section once it scrolls into view.
//!
//! Every section runs the same sequence: a loading bar fills in random
//! increments, a short pause, then items appear one at a time, then the
//! section reports completion. Sections differ only in their [`RevealConfig`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::profile::Profile;
use crate::timers::Timers;

pub const BOOT_LINES: &[&str] = &[
    "BIOS v2.4.1 initializing...",
    "Memory test: 16384 KB OK",
    "CPU: Intel Core i9 @ 3.6GHz",
    "Detecting drives...",
    "Loading ArtemOS v1.0.0...",
    "Initializing neural interface...",
    "Connecting to mainframe...",
    "STATUS: ALL SYSTEMS OPERATIONAL",
    "",
    "Welcome, User.",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemDelay {
    Fixed(Duration),
    /// `base` plus up to `spread` extra, drawn per item.
    Jitter { base: Duration, spread: Duration },
}

impl ItemDelay {
    fn sample(self, rng: &mut SmallRng) -> Duration {
        match self {
            ItemDelay::Fixed(delay) => delay,
            ItemDelay::Jitter { base, spread } => {
                let extra = rng.random_range(0..=spread.as_millis() as u64);
                base + Duration::from_millis(extra)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealConfig {
    pub item_count: usize,
    pub progress_interval: Duration,
    /// Percent added per loading tick.
    pub increment: RangeInclusive<u32>,
    pub settle_delay: Duration,
    pub item_delay: ItemDelay,
    pub finish_delay: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    About,
    Skills,
    Experience,
    Projects,
    Contact,
}

impl SectionKind {
    pub fn preset(self, profile: &Profile) -> RevealConfig {
        let ms = Duration::from_millis;
        match self {
            SectionKind::About => RevealConfig {
                item_count: profile.capabilities.len() + profile.stats.len(),
                progress_interval: ms(80),
                increment: 10..=30,
                settle_delay: ms(200),
                item_delay: ItemDelay::Fixed(ms(300)),
                finish_delay: ms(300),
            },
            SectionKind::Skills => RevealConfig {
                item_count: profile.skills.len(),
                progress_interval: ms(60),
                increment: 15..=35,
                settle_delay: ms(150),
                item_delay: ItemDelay::Jitter {
                    base: ms(50),
                    spread: ms(30),
                },
                finish_delay: ms(300),
            },
            SectionKind::Experience => RevealConfig {
                item_count: profile.roles.len(),
                progress_interval: ms(80),
                increment: 10..=30,
                settle_delay: ms(200),
                item_delay: ItemDelay::Fixed(ms(200)),
                finish_delay: ms(500),
            },
            SectionKind::Projects => RevealConfig {
                item_count: profile.projects.len(),
                progress_interval: ms(80),
                increment: 10..=30,
                settle_delay: ms(200),
                item_delay: ItemDelay::Fixed(ms(150)),
                finish_delay: ms(300),
            },
            SectionKind::Contact => RevealConfig {
                item_count: profile.channels.len(),
                progress_interval: ms(60),
                increment: 20..=40,
                settle_delay: ms(200),
                item_delay: ItemDelay::Fixed(ms(100)),
                finish_delay: ms(300),
            },
        }
    }
}

/// The power-on sequence shown before the hero: a warm-up, then one boot
/// line every 150ms, then a pause before handing over.
pub fn boot_preset() -> RevealConfig {
    RevealConfig {
        item_count: BOOT_LINES.len(),
        progress_interval: Duration::from_millis(1500),
        increment: 100..=100,
        settle_delay: Duration::ZERO,
        item_delay: ItemDelay::Fixed(Duration::from_millis(150)),
        finish_delay: Duration::from_millis(1500),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Initializing { progress: u32 },
    Revealing { shown: usize },
    Complete,
}

impl RevealPhase {
    pub fn status(self) -> &'static str {
        match self {
            RevealPhase::Idle => "IDLE",
            RevealPhase::Initializing { .. } => "LOADING",
            RevealPhase::Revealing { .. } => "READING",
            RevealPhase::Complete => "COMPLETE",
        }
    }

    pub fn shown(self, item_count: usize) -> usize {
        match self {
            RevealPhase::Idle | RevealPhase::Initializing { .. } => 0,
            RevealPhase::Revealing { shown } => shown,
            RevealPhase::Complete => item_count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Progress(u32),
    ItemRevealed(usize),
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Load,
    Settle,
    Reveal,
    Finish,
}

#[derive(Debug)]
pub struct RevealSequencer {
    config: RevealConfig,
    phase: RevealPhase,
    timers: Timers<Step>,
    rng: SmallRng,
    triggered: bool,
    torn_down: bool,
}

impl RevealSequencer {
    pub fn new(config: RevealConfig, seed: u64) -> Self {
        Self {
            config,
            phase: RevealPhase::Idle,
            timers: Timers::new(),
            rng: SmallRng::seed_from_u64(seed),
            triggered: false,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn shown(&self) -> usize {
        self.phase.shown(self.config.item_count)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RevealPhase::Complete
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Starts the sequence the first time the section becomes visible.
    /// Later calls never re-arm it.
    pub fn mark_visible(&mut self) -> bool {
        if self.torn_down || self.triggered {
            return false;
        }
        self.triggered = true;
        self.phase = RevealPhase::Initializing { progress: 0 };
        self.timers
            .schedule(self.config.progress_interval, Step::Load);
        true
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }
        let until = self.timers.now() + elapsed;
        while let Some(step) = self.timers.pop_due(until) {
            self.run(step, &mut events);
        }
        self.timers.settle(until);
        events
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.timers.shutdown();
    }

    fn run(&mut self, step: Step, events: &mut Vec<RevealEvent>) {
        match (step, self.phase) {
            (Step::Load, RevealPhase::Initializing { progress }) => {
                let increment = self.rng.random_range(self.config.increment.clone());
                let progress = (progress + increment).min(100);
                self.phase = RevealPhase::Initializing { progress };
                events.push(RevealEvent::Progress(progress));
                if progress >= 100 {
                    self.timers.schedule(self.config.settle_delay, Step::Settle);
                } else {
                    self.timers
                        .schedule(self.config.progress_interval, Step::Load);
                }
            }
            (Step::Settle, RevealPhase::Initializing { .. }) => {
                self.phase = RevealPhase::Revealing { shown: 0 };
                self.schedule_next_item();
            }
            (Step::Reveal, RevealPhase::Revealing { shown }) => {
                self.phase = RevealPhase::Revealing { shown: shown + 1 };
                events.push(RevealEvent::ItemRevealed(shown));
                self.schedule_next_item();
            }
            (Step::Finish, RevealPhase::Revealing { .. }) => {
                self.phase = RevealPhase::Complete;
                events.push(RevealEvent::Completed);
            }
            (step, phase) => {
                tracing::debug!(?step, ?phase, "reveal: stale step ignored");
            }
        }
    }

    fn schedule_next_item(&mut self) {
        if self.shown() < self.config.item_count {
            let delay = self.config.item_delay.sample(&mut self.rng);
            self.timers.schedule(delay, Step::Reveal);
        } else {
            self.timers.schedule(self.config.finish_delay, Step::Finish);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PROFILE;
    use pretty_assertions::assert_eq;

    fn run_to_end(sequencer: &mut RevealSequencer) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        for _ in 0..1000 {
            events.extend(sequencer.advance(Duration::from_millis(20)));
            if sequencer.is_complete() {
                break;
            }
        }
        events
    }

    #[test]
    fn stays_idle_until_visible() {
        let mut sequencer = RevealSequencer::new(SectionKind::About.preset(&PROFILE), 1);
        assert!(sequencer.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(sequencer.phase(), RevealPhase::Idle);
    }

    #[test]
    fn about_reveals_every_item_in_order_then_completes() {
        let mut sequencer = RevealSequencer::new(SectionKind::About.preset(&PROFILE), 4);
        assert!(sequencer.mark_visible());
        let events = run_to_end(&mut sequencer);

        let progress: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                RevealEvent::Progress(value) => Some(*value),
                _ => None,
            })
            .collect();
        assert!(progress.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(progress.last(), Some(&100));

        let revealed: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                RevealEvent::ItemRevealed(index) => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(revealed, (0..8).collect::<Vec<_>>());
        assert_eq!(events.last(), Some(&RevealEvent::Completed));
        assert_eq!(sequencer.phase().status(), "COMPLETE");
        assert_eq!(sequencer.shown(), 8);
    }

    #[test]
    fn visibility_trigger_never_rearms() {
        let mut sequencer = RevealSequencer::new(SectionKind::Contact.preset(&PROFILE), 2);
        assert!(sequencer.mark_visible());
        run_to_end(&mut sequencer);
        assert!(!sequencer.mark_visible());
        assert!(sequencer.advance(Duration::from_secs(5)).is_empty());
        assert!(sequencer.is_complete());
    }

    #[test]
    fn boot_preset_shows_lines_every_150ms() {
        let mut sequencer = RevealSequencer::new(boot_preset(), 0);
        sequencer.mark_visible();
        assert_eq!(
            sequencer.advance(Duration::from_millis(1500)),
            vec![RevealEvent::Progress(100)]
        );
        assert_eq!(
            sequencer.advance(Duration::from_millis(150)),
            vec![RevealEvent::ItemRevealed(0)]
        );
        assert_eq!(sequencer.shown(), 1);
    }

    #[test]
    fn teardown_freezes_the_sequence() {
        let mut sequencer = RevealSequencer::new(SectionKind::Skills.preset(&PROFILE), 8);
        sequencer.mark_visible();
        sequencer.advance(Duration::from_millis(60));
        let phase = sequencer.phase();
        sequencer.teardown();
        assert!(sequencer.advance(Duration::from_secs(30)).is_empty());
        assert_eq!(sequencer.phase(), phase);
        assert_eq!(sequencer.pending_timers(), 0);
    }

    #[test]
    fn empty_section_completes_after_loading() {
        let mut config = SectionKind::Projects.preset(&PROFILE);
        config.item_count = 0;
        let mut sequencer = RevealSequencer::new(config, 3);
        sequencer.mark_visible();
        let events = run_to_end(&mut sequencer);
        assert!(!events.iter().any(|event| matches!(event, RevealEvent::ItemRevealed(_))));
        assert_eq!(events.last(), Some(&RevealEvent::Completed));
    }
}
