// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests for the lifecycle-latency tracker against both registry
//! backends.

use inflight::clock::millis_after_epoch;
use inflight::{ItemId, LatencyTracker, ManualClock, MemoryRegistry, TrackerError};

fn id(label: &str) -> ItemId {
    ItemId::digest(label.as_bytes())
}

// ============================================================================
// Lifecycle against the in-memory backend
// ============================================================================

#[test]
fn test_full_lifecycle_bookkeeping() {
    let registry = MemoryRegistry::new();
    let clock = ManualClock::new();
    let mut tracker = LatencyTracker::register(&registry, "engine", clock).unwrap();

    let a = id("block-a");
    let b = id("block-b");
    let c = id("block-c");

    tracker.issued(a);
    tracker.issued(b);
    tracker.issued(c);
    assert_eq!(tracker.pending_len(), 3);
    assert_eq!(registry.gauge_value("engine_processing"), Some(3));

    tracker.accepted(a);
    tracker.rejected(b);
    assert_eq!(tracker.pending_len(), 1);
    assert!(tracker.is_pending(&c));
    assert_eq!(registry.gauge_value("engine_processing"), Some(1));

    tracker.accepted(c);
    assert_eq!(tracker.pending_len(), 0);
    assert_eq!(registry.gauge_value("engine_processing"), Some(0));

    assert_eq!(registry.samples("engine_accepted").unwrap().len(), 2);
    assert_eq!(registry.samples("engine_rejected").unwrap().len(), 1);
}

#[test]
fn test_latencies_are_exact_whole_milliseconds() {
    let registry = MemoryRegistry::new();
    let clock = ManualClock::with_sequence([
        millis_after_epoch(1_000), // issued(a)
        millis_after_epoch(1_033), // accepted(a)
        millis_after_epoch(1_033), // issued(b)
        millis_after_epoch(2_500), // rejected(b)
    ]);
    let mut tracker = LatencyTracker::register(&registry, "engine", clock).unwrap();

    tracker.issued(id("a"));
    tracker.accepted(id("a"));
    tracker.issued(id("b"));
    tracker.rejected(id("b"));

    assert_eq!(registry.samples("engine_accepted"), Some(vec![33.0]));
    assert_eq!(registry.samples("engine_rejected"), Some(vec![1_467.0]));
}

#[test]
fn test_interleaved_items_measure_independently() {
    let registry = MemoryRegistry::new();
    let clock = ManualClock::new();
    let mut tracker = LatencyTracker::register(&registry, "engine", clock).unwrap();

    tracker.issued(id("slow"));
    tracker.clock().advance_ms(10);
    tracker.issued(id("fast"));
    tracker.clock().advance_ms(5);
    tracker.accepted(id("fast"));
    tracker.clock().advance_ms(85);
    tracker.accepted(id("slow"));

    assert_eq!(registry.samples("engine_accepted"), Some(vec![5.0, 100.0]));
}

#[test]
fn test_unissued_terminal_is_not_an_error() {
    let registry = MemoryRegistry::new();
    let clock = ManualClock::starting_at(millis_after_epoch(42));
    let mut tracker = LatencyTracker::register(&registry, "engine", clock).unwrap();

    tracker.rejected(id("ghost"));

    // Documented behavior: the observation measures from the epoch and the
    // gauge goes negative. No panic, no residual pending state.
    assert_eq!(registry.samples("engine_rejected"), Some(vec![42.0]));
    assert_eq!(registry.gauge_value("engine_processing"), Some(-1));
    assert_eq!(tracker.pending_len(), 0);
}

// ============================================================================
// Registration failure modes
// ============================================================================

#[test]
fn test_same_namespace_twice_fails_on_first_instrument() {
    let registry = MemoryRegistry::new();
    let _first = LatencyTracker::new(&registry, "engine").unwrap();

    let err = LatencyTracker::new(&registry, "engine").unwrap_err();
    match err {
        TrackerError::Registration { instrument, source } => {
            assert_eq!(instrument, "processing");
            assert!(source.is_duplicate());
        }
    }
}

#[test]
fn test_failed_registration_leaves_no_extra_instruments() {
    let registry = MemoryRegistry::new();
    let _first = LatencyTracker::new(&registry, "engine").unwrap();
    let before = registry.instrument_names();

    let _ = LatencyTracker::new(&registry, "engine").unwrap_err();

    // Fail-fast: the second attempt registered nothing at all.
    assert_eq!(registry.instrument_names(), before);
}

// ============================================================================
// Prometheus backend
// ============================================================================

#[cfg(feature = "prometheus")]
mod prometheus_backend {
    use super::*;
    use inflight::PrometheusRegistry;

    #[test]
    fn test_lifecycle_reflected_in_gathered_families() {
        let registry = PrometheusRegistry::new();
        let clock = ManualClock::new();
        let mut tracker = LatencyTracker::register(&registry, "snow", clock).unwrap();

        tracker.issued(id("x"));
        tracker.clock().advance_ms(50);
        tracker.accepted(id("x"));

        let families = registry.inner().gather();
        let gauge = families
            .iter()
            .find(|f| f.get_name() == "snow_processing")
            .unwrap();
        assert_eq!(gauge.get_metric()[0].get_gauge().get_value(), 0.0);

        let accepted = families
            .iter()
            .find(|f| f.get_name() == "snow_accepted")
            .unwrap();
        let histogram = accepted.get_metric()[0].get_histogram();
        assert_eq!(histogram.get_sample_count(), 1);
        assert!((histogram.get_sample_sum() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_namespace_fails_distinctly() {
        let registry = PrometheusRegistry::new();
        let _first = LatencyTracker::new(&registry, "snow").unwrap();

        let err = LatencyTracker::new(&registry, "snow").unwrap_err();
        match err {
            TrackerError::Registration { instrument, source } => {
                assert_eq!(instrument, "processing");
                assert!(source.is_duplicate());
            }
        }
    }

    #[test]
    fn test_shared_process_registry_with_other_components() {
        // The tracker must tolerate being one of many components registering
        // into the same process-wide registry.
        let shared = prometheus::Registry::new();
        let other = prometheus::IntGauge::new("other_component_up", "help").unwrap();
        shared.register(Box::new(other)).unwrap();

        let registry = PrometheusRegistry::with_inner(shared);
        let _tracker = LatencyTracker::new(&registry, "snow").unwrap();

        assert_eq!(registry.inner().gather().len(), 4);
    }
}
