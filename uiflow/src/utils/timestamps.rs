//! Timestamp helpers.

use chrono::{DateTime, Utc};

/// A UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Returns the current UTC time formatted for artifact names.
///
/// The format is `YYYYMMDD_HHMMSS`, the component expected by artifact
/// consumers that parse `{runId}_{stepLabel}_{timestamp}` filenames.
#[must_use]
pub fn artifact_timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Returns the current UTC time as an ISO 8601 formatted string.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}
