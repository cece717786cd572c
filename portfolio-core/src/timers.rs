//! Owned timer queue driven by a virtual clock.
//!
//! Widgets never touch the host's `setTimeout`/`setInterval` directly. Each one
//! owns a `Timers<E>` and the host only feeds it elapsed time through
//! [`Timers::pop_due`] / [`Timers::settle`]. Shutting the queue down drops every
//! pending event, so nothing scheduled before teardown can fire after it.

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Timers<E> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), E>,
    shut_down: bool,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
            shut_down: false,
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Schedules `event` to fire `after` from the current virtual time.
    /// After shutdown the event is discarded and `None` is returned.
    pub fn schedule(&mut self, after: Duration, event: E) -> Option<TimerId> {
        if self.shut_down {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((self.now + after, seq), event);
        Some(TimerId(seq))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|(_, seq), _| *seq != id.0);
        self.queue.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    /// Pops the earliest event due at or before `until`, moving the clock to
    /// its deadline. Events scheduled while handling it are visible to the
    /// next call, so chained timers inside one window fire in order.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        if self.shut_down {
            return None;
        }
        let key = *self.queue.keys().next()?;
        if key.0 > until {
            return None;
        }
        self.now = self.now.max(key.0);
        self.queue.remove(&key)
    }

    /// Moves the clock forward to `until` once every due event was handled.
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }

    pub fn shutdown(&mut self) {
        self.shut_down = true;
        self.queue.clear();
    }
}
