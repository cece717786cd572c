use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;
use time::OffsetDateTime;

use crate::commands::{CommandTable, Env, Reserved, Resolution, normalize, not_found_message};
use crate::effects::Effect;
use crate::timers::Timers;

pub const WELCOME_MESSAGE: &str =
    "Welcome to ArtemOS Terminal v2.0\nType \"help\" for available commands.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleState {
    Closed,
    Idle,
    Effect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollbackLine {
    pub id: u64,
    pub command: String,
    pub output: String,
    pub is_error: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    ArrowUp,
    ArrowDown,
    Tab,
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submitted {
    Ignored,
    Appended,
    Cleared,
    Closed,
    EffectStarted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleTimer {
    EffectTick,
    EffectFinish,
}

#[derive(Clone, Debug)]
struct RunningEffect {
    command: String,
    effect: Effect,
}

/// Submitted commands, newest last, with an optional recall cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn push(&mut self, raw: String) {
        self.entries.push(raw);
        self.cursor = None;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Steps towards the oldest entry, stopping there.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let index = self
            .cursor
            .unwrap_or(self.entries.len())
            .saturating_sub(1);
        self.cursor = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    /// Steps towards the newest entry. Stepping past it, or stepping while
    /// not browsing, yields `Some("")` and leaves browsing off.
    pub fn newer(&mut self) -> Option<&str> {
        let Some(current) = self.cursor else {
            return Some("");
        };
        let next = current + 1;
        if next >= self.entries.len() {
            self.cursor = None;
            return Some("");
        }
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }
}

/// The command-line overlay: scrollback, input line, recall, completion and
/// special effects. Rendering and key capture live in the frontend; every
/// transition lives here.
#[derive(Debug)]
pub struct Console {
    table: CommandTable,
    state: ConsoleState,
    input: String,
    scrollback: Vec<ScrollbackLine>,
    history: CommandHistory,
    running: Option<RunningEffect>,
    timers: Timers<ConsoleTimer>,
    rng: SmallRng,
    next_id: u64,
    welcomed: bool,
    scroll_generation: u64,
    torn_down: bool,
}

impl Console {
    pub fn new(table: CommandTable, seed: u64) -> Self {
        Self {
            table,
            state: ConsoleState::Closed,
            input: String::new(),
            scrollback: Vec::new(),
            history: CommandHistory::default(),
            running: None,
            timers: Timers::new(),
            rng: SmallRng::seed_from_u64(seed),
            next_id: 0,
            welcomed: false,
            scroll_generation: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ConsoleState::Closed
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn scrollback(&self) -> &[ScrollbackLine] {
        &self.scrollback
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn active_effect(&self) -> Option<&Effect> {
        self.running.as_ref().map(|running| &running.effect)
    }

    /// Bumped once per submission and once when an effect lands its output;
    /// the view scrolls to the bottom whenever it changes.
    pub fn scroll_generation(&self) -> u64 {
        self.scroll_generation
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn open(&mut self) {
        if self.torn_down || self.state != ConsoleState::Closed {
            return;
        }
        tracing::debug!("console: open");
        self.state = ConsoleState::Idle;
        if !self.welcomed {
            self.welcomed = true;
            self.push_line(String::new(), WELCOME_MESSAGE.to_string(), false);
        }
    }

    pub fn close(&mut self) {
        if self.torn_down || self.state == ConsoleState::Closed {
            return;
        }
        tracing::debug!("console: close");
        if self.running.take().is_some() {
            self.timers.cancel_all();
        }
        self.state = ConsoleState::Closed;
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        if self.torn_down || self.state != ConsoleState::Idle {
            return;
        }
        self.input = value.into();
    }

    /// Handles a key the input field captured. Returns `true` when the key
    /// was consumed and the host should suppress its default action.
    pub fn key(&mut self, key: Key, now: OffsetDateTime) -> bool {
        if self.torn_down {
            return false;
        }
        match key {
            Key::Escape => {
                self.close();
                true
            }
            _ if self.state != ConsoleState::Idle => false,
            Key::Enter => {
                self.submit(now);
                true
            }
            Key::ArrowUp => {
                if let Some(value) = self.history.older() {
                    self.input = value.to_string();
                }
                true
            }
            Key::ArrowDown => {
                if let Some(value) = self.history.newer() {
                    self.input = value.to_string();
                }
                true
            }
            Key::Tab => {
                if let Some(name) = self.table.complete(&self.input) {
                    self.input = name.to_string();
                }
                true
            }
        }
    }

    pub fn submit(&mut self, now: OffsetDateTime) -> Submitted {
        if self.torn_down || self.state != ConsoleState::Idle {
            return Submitted::Ignored;
        }
        let raw = std::mem::take(&mut self.input);
        let command = normalize(&raw);
        if command.is_empty() {
            return Submitted::Ignored;
        }

        self.history.push(raw.clone());
        self.scroll_generation += 1;

        match Reserved::parse(&command) {
            Some(Reserved::Clear) => {
                self.scrollback.clear();
                return Submitted::Cleared;
            }
            Some(Reserved::Exit) => {
                self.close();
                return Submitted::Closed;
            }
            None => {}
        }

        let mut env = Env {
            now,
            rng: &mut self.rng,
        };
        match self.table.resolve(&command, &mut env) {
            Resolution::Text(output) => {
                self.push_line(raw, output, false);
                Submitted::Appended
            }
            Resolution::NotFound => {
                self.push_line(raw, not_found_message(&command), true);
                Submitted::Appended
            }
            Resolution::Effect(kind) => {
                tracing::debug!(?kind, "console: effect started");
                let effect = kind.start();
                self.timers
                    .schedule(effect.tick_interval(), ConsoleTimer::EffectTick);
                self.running = Some(RunningEffect {
                    command: raw,
                    effect,
                });
                self.state = ConsoleState::Effect;
                Submitted::EffectStarted
            }
        }
    }

    /// Feeds elapsed wall time to the console's timers. Returns `true` when
    /// anything visible changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.torn_down {
            return false;
        }
        let until = self.timers.now() + elapsed;
        let mut changed = false;
        while let Some(timer) = self.timers.pop_due(until) {
            changed |= self.fire(timer);
        }
        self.timers.settle(until);
        changed
    }

    /// Releases the console for good: pending timers are dropped and every
    /// later call is a no-op.
    pub fn teardown(&mut self) {
        tracing::debug!("console: teardown");
        self.torn_down = true;
        self.timers.shutdown();
    }

    fn fire(&mut self, timer: ConsoleTimer) -> bool {
        match timer {
            ConsoleTimer::EffectTick => {
                let Some(running) = self.running.as_mut() else {
                    return false;
                };
                let next = if running.effect.advance(&mut self.rng) {
                    (running.effect.settle_delay(), ConsoleTimer::EffectFinish)
                } else {
                    (running.effect.tick_interval(), ConsoleTimer::EffectTick)
                };
                self.timers.schedule(next.0, next.1);
                true
            }
            ConsoleTimer::EffectFinish => {
                let Some(running) = self.running.take() else {
                    return false;
                };
                tracing::debug!("console: effect finished");
                self.push_line(running.command, running.effect.summary(), false);
                self.state = ConsoleState::Idle;
                self.scroll_generation += 1;
                true
            }
        }
    }

    fn push_line(&mut self, command: String, output: String, is_error: bool) {
        self.next_id += 1;
        self.scrollback.push(ScrollbackLine {
            id: self.next_id,
            command,
            output,
            is_error,
        });
    }
}
