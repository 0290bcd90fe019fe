// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Prometheus registry backend.
//!
//! Adapts a [`prometheus::Registry`] to the crate's [`Registry`] trait:
//! gauges become [`IntGauge`]s and latency recorders become millisecond
//! [`Histogram`]s. The embedding process owns exposition - gather from
//! [`PrometheusRegistry::inner`] and encode with [`prometheus::TextEncoder`]
//! wherever its scrape endpoint lives.

use prometheus::{Histogram, HistogramOpts, IntGauge};

use crate::error::RegistryError;
use crate::registry::{Gauge, LatencyRecorder, Registry};

/// Histogram bucket ladder for latency observations, in milliseconds.
pub const LATENCY_BUCKETS_MS: [f64; 10] = [
    1.0, 10.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0,
];

/// A [`Registry`] backed by a [`prometheus::Registry`].
#[derive(Default)]
pub struct PrometheusRegistry {
    inner: prometheus::Registry,
}

impl PrometheusRegistry {
    /// Create a backend over a fresh [`prometheus::Registry`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing registry, e.g. one shared with other subsystems.
    pub fn with_inner(inner: prometheus::Registry) -> Self {
        Self { inner }
    }

    /// The underlying registry, for gathering and encoding.
    pub fn inner(&self) -> &prometheus::Registry {
        &self.inner
    }
}

fn map_err(name: &str, err: prometheus::Error) -> RegistryError {
    match err {
        prometheus::Error::AlreadyReg => RegistryError::DuplicateName(name.to_string()),
        other => RegistryError::Backend(other.to_string()),
    }
}

impl Registry for PrometheusRegistry {
    fn register_gauge(&self, name: &str, help: &str) -> Result<Box<dyn Gauge>, RegistryError> {
        let gauge = IntGauge::new(name, help).map_err(|e| map_err(name, e))?;
        self.inner
            .register(Box::new(gauge.clone()))
            .map_err(|e| map_err(name, e))?;
        Ok(Box::new(PromGauge(gauge)))
    }

    fn register_latency(
        &self,
        name: &str,
        help: &str,
    ) -> Result<Box<dyn LatencyRecorder>, RegistryError> {
        let opts = HistogramOpts::new(name, help).buckets(LATENCY_BUCKETS_MS.to_vec());
        let histogram = Histogram::with_opts(opts).map_err(|e| map_err(name, e))?;
        self.inner
            .register(Box::new(histogram.clone()))
            .map_err(|e| map_err(name, e))?;
        Ok(Box::new(PromRecorder(histogram)))
    }
}

struct PromGauge(IntGauge);

impl Gauge for PromGauge {
    fn inc(&self) {
        self.0.inc();
    }

    fn dec(&self) {
        self.0.dec();
    }

    fn value(&self) -> i64 {
        self.0.get()
    }
}

struct PromRecorder(Histogram);

impl LatencyRecorder for PromRecorder {
    fn observe(&self, millis: f64) {
        self.0.observe(millis);
    }
}
