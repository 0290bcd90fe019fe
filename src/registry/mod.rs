// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pluggable metrics registry abstraction.
//!
//! The tracker only ever talks to the narrow capability traits defined here:
//! a [`Registry`] hands out instruments by name, a [`Gauge`] counts up and
//! down, and a [`LatencyRecorder`] accumulates elapsed-time samples. The
//! concrete metrics backend is swappable without touching tracker logic.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryRegistry`] - in-process instruments readable back by name,
//!   useful for tests and for embedders that export metrics themselves.
//! - [`PrometheusRegistry`] - an adapter over [`prometheus::Registry`]
//!   (behind the `prometheus` feature, on by default).
//!
//! Registries are injected instances, never process-wide statics: create one
//! per process (or per test) and pass it to every component that registers
//! instruments into it.

mod memory;
#[cfg(feature = "prometheus")]
mod prometheus_backend;

pub use memory::MemoryRegistry;
#[cfg(feature = "prometheus")]
pub use prometheus_backend::PrometheusRegistry;

use std::fmt;

use crate::error::RegistryError;

/// An up/down counter holding a live level.
pub trait Gauge: Send + Sync {
    /// Raise the level by one.
    fn inc(&self);

    /// Lower the level by one.
    fn dec(&self);

    /// The current level.
    fn value(&self) -> i64;
}

impl fmt::Debug for dyn Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge").finish_non_exhaustive()
    }
}

/// A recorder of elapsed-time samples, in milliseconds.
///
/// How samples are aggregated (exact list, histogram buckets, sketches) is a
/// backend concern; the tracker only pushes values in.
pub trait LatencyRecorder: Send + Sync {
    /// Record one sample.
    fn observe(&self, millis: f64);
}

impl fmt::Debug for dyn LatencyRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatencyRecorder").finish_non_exhaustive()
    }
}

/// A metrics registry that instruments are registered into by name.
///
/// Names are unique across the whole registry regardless of instrument kind;
/// registering a name twice fails with [`RegistryError::DuplicateName`].
/// Registration is the only fallible operation - the instruments themselves
/// never fail to update.
#[cfg_attr(test, mockall::automock)]
pub trait Registry {
    /// Register an up/down counter under `name`.
    fn register_gauge(&self, name: &str, help: &str) -> Result<Box<dyn Gauge>, RegistryError>;

    /// Register a latency distribution under `name`.
    fn register_latency(
        &self,
        name: &str,
        help: &str,
    ) -> Result<Box<dyn LatencyRecorder>, RegistryError>;
}
