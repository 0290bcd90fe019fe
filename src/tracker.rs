// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The lifecycle-latency tracker.
//!
//! A [`LatencyTracker`] observes work items moving through
//! issued -> {accepted | rejected} and reports, through instruments obtained
//! from an injected [`Registry`], the number of items still in flight and
//! the distribution of elapsed time from issuance to each terminal outcome.
//!
//! The tracker never decides lifecycle transitions itself; the owning engine
//! calls [`issued`](LatencyTracker::issued) once per item and later exactly
//! one of [`accepted`](LatencyTracker::accepted) /
//! [`rejected`](LatencyTracker::rejected).
//!
//! # Caller discipline
//!
//! All entry points take `&mut self`, so the borrow checker enforces the
//! single-caller contract: concurrent use requires the caller to wrap the
//! tracker in its own `Mutex`. For a single item, `issued` must happen
//! before its terminal call in program order.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::TrackerError;
use crate::id::ItemId;
use crate::registry::{Gauge, LatencyRecorder, Registry};

/// Instrument name for the in-flight gauge (first registered).
pub const PROCESSING_NAME: &str = "processing";
/// Instrument name for the accepted-latency distribution.
pub const ACCEPTED_NAME: &str = "accepted";
/// Instrument name for the rejected-latency distribution.
pub const REJECTED_NAME: &str = "rejected";

const PROCESSING_HELP: &str = "Number of currently processing items";
const ACCEPTED_HELP: &str =
    "Latency of accepting from the time the item was issued in milliseconds";
const REJECTED_HELP: &str =
    "Latency of rejecting from the time the item was issued in milliseconds";

#[derive(Clone, Copy)]
enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Tracks in-flight work items and their issuance-to-outcome latency.
///
/// Construction registers all three instruments with the given registry in a
/// fixed order (in-flight gauge, accepted latency, rejected latency) and
/// fails fast on the first registration error, so a half-registered tracker
/// never exists.
pub struct LatencyTracker<C: Clock = SystemClock> {
    clock: C,
    pending: HashMap<ItemId, DateTime<Utc>>,
    in_flight: Box<dyn Gauge>,
    lat_accepted: Box<dyn LatencyRecorder>,
    lat_rejected: Box<dyn LatencyRecorder>,
}

impl<C: Clock> fmt::Debug for LatencyTracker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatencyTracker")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl LatencyTracker<SystemClock> {
    /// Register a tracker using the wall clock.
    ///
    /// Instrument names are scoped under `namespace` (e.g. namespace `snow`
    /// yields `snow_processing`) to avoid collisions with other components
    /// sharing the registry.
    pub fn new(registry: &dyn Registry, namespace: &str) -> Result<Self, TrackerError> {
        Self::register(registry, namespace, SystemClock)
    }
}

impl<C: Clock> LatencyTracker<C> {
    /// Register a tracker with an explicit clock.
    pub fn register(
        registry: &dyn Registry,
        namespace: &str,
        clock: C,
    ) -> Result<Self, TrackerError> {
        let in_flight = registry
            .register_gauge(&scoped(namespace, PROCESSING_NAME), PROCESSING_HELP)
            .map_err(|source| TrackerError::Registration {
                instrument: PROCESSING_NAME,
                source,
            })?;
        let lat_accepted = registry
            .register_latency(&scoped(namespace, ACCEPTED_NAME), ACCEPTED_HELP)
            .map_err(|source| TrackerError::Registration {
                instrument: ACCEPTED_NAME,
                source,
            })?;
        let lat_rejected = registry
            .register_latency(&scoped(namespace, REJECTED_NAME), REJECTED_HELP)
            .map_err(|source| TrackerError::Registration {
                instrument: REJECTED_NAME,
                source,
            })?;

        debug!(namespace, "latency tracker registered");

        Ok(Self {
            clock,
            pending: HashMap::new(),
            in_flight,
            lat_accepted,
            lat_rejected,
        })
    }

    /// Mark an item as issued: it is now in flight.
    ///
    /// Re-issuing an id before its terminal call overwrites the start time,
    /// so a later outcome measures from the most recent issuance. The gauge
    /// is not clamped; unmatched terminal calls can drive it negative.
    pub fn issued(&mut self, id: ItemId) {
        let now = self.clock.now();
        if self.pending.insert(id, now).is_some() {
            debug!(id = %id, "re-issued while pending; start time overwritten");
        }
        self.in_flight.inc();
        trace!(id = %id, "item issued");
    }

    /// Mark an item as accepted and record its issuance-to-accept latency.
    pub fn accepted(&mut self, id: ItemId) {
        self.complete(id, Outcome::Accepted);
    }

    /// Mark an item as rejected and record its issuance-to-reject latency.
    pub fn rejected(&mut self, id: ItemId) {
        self.complete(id, Outcome::Rejected);
    }

    /// The tracker's time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of items currently in flight according to the pending set.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether `id` is currently in flight.
    pub fn is_pending(&self, id: &ItemId) -> bool {
        self.pending.contains_key(id)
    }

    fn complete(&mut self, id: ItemId, outcome: Outcome) {
        let now = self.clock.now();
        let start = match self.pending.remove(&id) {
            Some(start) => start,
            None => {
                // No matching issuance. Kept observable rather than fatal:
                // the sample measures from the epoch and is near-useless, so
                // flag it loudly for the caller to fix.
                warn!(
                    id = %id,
                    outcome = outcome.as_str(),
                    "terminal call for item with no pending issuance"
                );
                DateTime::<Utc>::UNIX_EPOCH
            }
        };
        let elapsed_ms = (now - start).num_milliseconds();

        match outcome {
            Outcome::Accepted => self.lat_accepted.observe(elapsed_ms as f64),
            Outcome::Rejected => self.lat_rejected.observe(elapsed_ms as f64),
        }
        self.in_flight.dec();

        trace!(
            id = %id,
            outcome = outcome.as_str(),
            elapsed_ms,
            "item completed"
        );
    }
}

fn scoped(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", namespace, name)
    }
}
