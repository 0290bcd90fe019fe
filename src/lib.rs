// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Inflight - lifecycle-latency tracking for in-flight work items.
//!
//! An external engine (a consensus loop, a job scheduler) tells the tracker
//! when an item identified by a content hash is *issued* and later whether
//! it was *accepted* or *rejected*. The tracker reports, through instruments
//! registered with an injected metrics registry:
//!
//! - the current number of items in flight (an up/down gauge), and
//! - distributions of elapsed milliseconds from issuance to each terminal
//!   outcome.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`id`] - fixed-size content identifiers ([`ItemId`])
//! - [`clock`] - injectable time source ([`Clock`], [`SystemClock`], [`ManualClock`])
//! - [`registry`] - narrow registry/instrument traits plus the in-memory and
//!   Prometheus backends
//! - [`tracker`] - the [`LatencyTracker`] orchestrating component
//! - [`error`] - error types and result aliases
//! - [`logging`] - subscriber setup helper for embedding applications
//!
//! # Example
//!
//! ```rust
//! use inflight::{ItemId, LatencyTracker, MemoryRegistry};
//!
//! let registry = MemoryRegistry::new();
//! let mut tracker = LatencyTracker::new(&registry, "snow")?;
//!
//! let id = ItemId::digest(b"block 42");
//! tracker.issued(id);
//! // ... the engine processes the item ...
//! tracker.accepted(id);
//!
//! assert_eq!(registry.gauge_value("snow_processing"), Some(0));
//! # Ok::<(), inflight::TrackerError>(())
//! ```

pub mod clock;
pub mod error;
pub mod id;
pub mod logging;
pub mod registry;
pub mod tracker;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{IdError, RegistryError, Result, TrackerError};
pub use id::ItemId;
pub use logging::{init_logging, LogConfig, LogGuard};
pub use registry::{Gauge, LatencyRecorder, MemoryRegistry, Registry};
#[cfg(feature = "prometheus")]
pub use registry::PrometheusRegistry;
pub use tracker::LatencyTracker;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
