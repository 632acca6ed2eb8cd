//! Error types for the uiflow automation engine.
//!
//! The taxonomy separates driver-level faults ([`DriverError`]), flow-level
//! step failures ([`UiFlowError`]), and best-effort artifact capture
//! failures ([`ArtifactError`]). Artifact errors never propagate past the
//! recorder; session-level faults are caught at the orchestrator boundary
//! and recorded as outcomes instead of escaping.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a UI driver backend.
#[derive(Debug, Error)]
pub enum DriverError {
    /// An expected control did not become actionable within the timeout.
    #[error("control {selector} not actionable within {timeout:?}")]
    ResolutionTimeout {
        /// Diagnostic rendering of the selector that failed to resolve.
        selector: String,
        /// The bounded wait that elapsed.
        timeout: Duration,
    },

    /// Navigation to a target location failed.
    #[error("navigation to '{url}' failed: {detail}")]
    Navigation {
        /// The target URL.
        url: String,
        /// Backend-reported detail.
        detail: String,
    },

    /// The driver instance was already released.
    #[error("driver instance already released")]
    Released,

    /// Any other backend-specific fault.
    #[error("driver backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl DriverError {
    /// Returns true if this error is a control-resolution timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ResolutionTimeout { .. })
    }
}

/// Errors produced while executing a workflow step or login session.
#[derive(Debug, Error)]
pub enum UiFlowError {
    /// A dynamically populated candidate list was empty after the wait.
    #[error("no candidates matched {selector} after waiting")]
    EmptyCandidateSet {
        /// Diagnostic rendering of the selector that matched nothing.
        selector: String,
    },

    /// A virtual-keyboard key could not be resolved or activated.
    #[error("virtual key '{key}' could not be activated: {source}")]
    KeyNotActivated {
        /// The character whose key control failed.
        key: char,
        /// The underlying driver fault.
        #[source]
        source: DriverError,
    },

    /// A driver-level fault during a step or session.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl UiFlowError {
    /// Returns true if the failure was a bounded-wait timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Driver(err) => err.is_timeout(),
            Self::KeyNotActivated { source, .. } => source.is_timeout(),
            Self::EmptyCandidateSet { .. } => false,
        }
    }
}

/// Errors raised while capturing or storing an artifact.
///
/// These are instrumentation failures: the recorder logs and swallows
/// them, so they never gate workflow success.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The driver failed to capture a snapshot.
    #[error("snapshot capture failed: {0}")]
    Capture(#[source] DriverError),

    /// The sink rejected the artifact.
    #[error("artifact store failed for '{name}': {detail}")]
    Store {
        /// The artifact name that could not be stored.
        name: String,
        /// Sink-reported detail.
        detail: String,
    },

    /// Filesystem error from the sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
