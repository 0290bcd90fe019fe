// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Time source abstraction.
//!
//! The tracker never reads the system clock directly; it goes through the
//! [`Clock`] trait so elapsed-time computation is deterministic under test.
//! [`SystemClock`] is the production implementation, [`ManualClock`] the
//! programmable fake.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// A source of the current instant.
///
/// Implementations must be side-effect free and infallible. Two `now` calls
/// ordered in real time must yield a non-negative difference.
pub trait Clock: Send {
    /// The current point in time.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A programmable clock for deterministic tests.
///
/// Holds a current instant that can be set or advanced, plus an optional
/// queue of instants consumed by successive [`Clock::now`] calls. When the
/// queue is empty, `now` keeps returning the current instant.
#[derive(Debug, Default)]
pub struct ManualClock {
    inner: Mutex<ManualState>,
}

#[derive(Debug, Default)]
struct ManualState {
    current: DateTime<Utc>,
    queued: VecDeque<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock pinned to the Unix epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        let clock = Self::new();
        clock.set(start);
        clock
    }

    /// Create a clock that yields the given instants in order, then keeps
    /// returning the last one.
    pub fn with_sequence(instants: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let clock = Self::new();
        clock.inner.lock().unwrap().queued = instants.into_iter().collect();
        clock
    }

    /// Pin the clock to `instant`, clearing any queued sequence.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut state = self.inner.lock().unwrap();
        state.current = instant;
        state.queued.clear();
    }

    /// Advance the current instant by whole milliseconds.
    pub fn advance_ms(&self, millis: i64) {
        let mut state = self.inner.lock().unwrap();
        state.current = state.current + chrono::Duration::milliseconds(millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut state = self.inner.lock().unwrap();
        if let Some(next) = state.queued.pop_front() {
            state.current = next;
        }
        state.current
    }
}

/// Instant `millis` milliseconds after the Unix epoch.
///
/// Convenience for building test sequences.
pub fn millis_after_epoch(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::milliseconds(millis)
}
