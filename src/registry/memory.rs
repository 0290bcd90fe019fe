// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory registry backend.
//!
//! Instruments are plain atomics and mutex-guarded sample lists, readable
//! back by name. Suitable for tests (exact observations, no bucketing) and
//! for embedders that want to export metrics with their own machinery.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::RegistryError;
use crate::registry::{Gauge, LatencyRecorder, Registry};

/// An in-process [`Registry`] with readable instruments.
#[derive(Default)]
pub struct MemoryRegistry {
    gauges: RwLock<HashMap<String, Arc<AtomicI64>>>,
    latencies: RwLock<HashMap<String, Arc<Mutex<Vec<f64>>>>>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of the named gauge, if registered.
    pub fn gauge_value(&self, name: &str) -> Option<i64> {
        self.gauges
            .read()
            .unwrap()
            .get(name)
            .map(|g| g.load(Ordering::Relaxed))
    }

    /// All samples recorded by the named latency instrument, in order.
    pub fn samples(&self, name: &str) -> Option<Vec<f64>> {
        self.latencies
            .read()
            .unwrap()
            .get(name)
            .map(|s| s.lock().unwrap().clone())
    }

    /// Names of every registered instrument, sorted.
    pub fn instrument_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .gauges
            .read()
            .unwrap()
            .keys()
            .chain(self.latencies.read().unwrap().keys())
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn check_free(&self, name: &str) -> Result<(), RegistryError> {
        if self.gauges.read().unwrap().contains_key(name)
            || self.latencies.read().unwrap().contains_key(name)
        {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

impl Registry for MemoryRegistry {
    fn register_gauge(&self, name: &str, _help: &str) -> Result<Box<dyn Gauge>, RegistryError> {
        self.check_free(name)?;
        let cell = Arc::new(AtomicI64::new(0));
        self.gauges
            .write()
            .unwrap()
            .insert(name.to_string(), Arc::clone(&cell));
        Ok(Box::new(MemoryGauge { cell }))
    }

    fn register_latency(
        &self,
        name: &str,
        _help: &str,
    ) -> Result<Box<dyn LatencyRecorder>, RegistryError> {
        self.check_free(name)?;
        let samples = Arc::new(Mutex::new(Vec::new()));
        self.latencies
            .write()
            .unwrap()
            .insert(name.to_string(), Arc::clone(&samples));
        Ok(Box::new(MemoryRecorder { samples }))
    }
}

struct MemoryGauge {
    cell: Arc<AtomicI64>,
}

impl Gauge for MemoryGauge {
    fn inc(&self) {
        self.cell.fetch_add(1, Ordering::Relaxed);
    }

    fn dec(&self) {
        self.cell.fetch_sub(1, Ordering::Relaxed);
    }

    fn value(&self) -> i64 {
        self.cell.load(Ordering::Relaxed)
    }
}

struct MemoryRecorder {
    samples: Arc<Mutex<Vec<f64>>>,
}

impl LatencyRecorder for MemoryRecorder {
    fn observe(&self, millis: f64) {
        self.samples.lock().unwrap().push(millis);
    }
}
