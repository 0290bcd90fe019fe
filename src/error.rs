// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the inflight tracker.
//!
//! This module provides strongly-typed errors for the registry and tracker
//! layers, using `thiserror` for ergonomic error definitions and `anyhow`
//! for error propagation in embedding applications.

use thiserror::Error;

/// Errors raised by a metrics registry during instrument registration.
///
/// Registration is the only fallible interaction with a registry; once an
/// instrument is handed out, updates to it cannot fail.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An instrument with this name is already registered.
    ///
    /// Registries are typically process-wide, so two components picking the
    /// same namespace collide here rather than silently sharing a series.
    #[error("instrument name already registered: {0}")]
    DuplicateName(String),

    /// The backend rejected the registration for some other reason
    /// (malformed name, backend-specific constraint).
    #[error("registry backend error: {0}")]
    Backend(String),
}

impl RegistryError {
    /// Check whether this error is a name collision.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName(_))
    }
}

/// Errors that can occur while constructing a [`LatencyTracker`].
///
/// [`LatencyTracker`]: crate::tracker::LatencyTracker
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Registering one of the tracker's instruments failed.
    ///
    /// `instrument` names which of the three registrations failed; no
    /// further instruments are attempted after the first failure, and no
    /// tracker is constructed.
    #[error("failed to register {instrument} instrument: {source}")]
    Registration {
        instrument: &'static str,
        #[source]
        source: RegistryError,
    },
}

impl TrackerError {
    /// The name of the instrument whose registration failed.
    pub fn instrument(&self) -> &'static str {
        match self {
            Self::Registration { instrument, .. } => instrument,
        }
    }
}

/// Errors that can occur when parsing an [`ItemId`] from text.
///
/// [`ItemId`]: crate::id::ItemId
#[derive(Error, Debug)]
pub enum IdError {
    #[error("invalid hex in identifier: {0}")]
    InvalidHex(String),

    #[error("identifier must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_is_duplicate() {
        assert!(RegistryError::DuplicateName("x_processing".to_string()).is_duplicate());
        assert!(!RegistryError::Backend("oom".to_string()).is_duplicate());
    }

    #[test]
    fn test_tracker_error_instrument() {
        let err = TrackerError::Registration {
            instrument: "processing",
            source: RegistryError::DuplicateName("snow_processing".to_string()),
        };
        assert_eq!(err.instrument(), "processing");
    }

    #[test]
    fn test_error_display_names_instrument() {
        let err = TrackerError::Registration {
            instrument: "accepted",
            source: RegistryError::Backend("boom".to_string()),
        };
        let display = format!("{}", err);
        assert!(display.contains("accepted"));
    }

    #[test]
    fn test_id_error_display() {
        let err = IdError::InvalidLength {
            expected: 32,
            actual: 16,
        };
        let display = format!("{}", err);
        assert!(display.contains("32"));
        assert!(display.contains("16"));
    }
}
