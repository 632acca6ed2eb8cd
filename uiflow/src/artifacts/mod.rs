//! Checkpoint artifact capture.
//!
//! Artifacts are best-effort instrumentation: the recorder snapshots the
//! driven UI at checkpoints and hands the bytes to a sink, swallowing and
//! logging every failure. Capture is never a gating condition for
//! workflow success.

use crate::driver::UiDriver;
use crate::errors::ArtifactError;
use crate::utils::artifact_timestamp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of one captured artifact.
///
/// Renders as `{runId}_{stepLabel}_{timestamp}` — the convention existing
/// artifact consumers parse, so it must not change shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactName {
    /// The run the artifact belongs to.
    pub run_id: String,
    /// The checkpoint step label.
    pub step_label: String,
    /// Capture timestamp, `YYYYMMDD_HHMMSS`.
    pub timestamp: String,
}

impl ArtifactName {
    /// Builds a name for a checkpoint captured now.
    #[must_use]
    pub fn new(run_id: impl Into<String>, step_label: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            step_label: step_label.into(),
            timestamp: artifact_timestamp(),
        }
    }

    /// Returns the `{runId}_{stepLabel}_{timestamp}` file stem.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.run_id, self.step_label, self.timestamp)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// Where captured artifact bytes go.
///
/// The sink is a shared append-only target; no ordering is required
/// across sessions writing into it.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores one artifact under its name.
    async fn store(&self, name: &ArtifactName, bytes: &[u8]) -> Result<(), ArtifactError>;
}

/// Writes artifacts as `.png` files into a directory.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    directory: PathBuf,
}

impl FsArtifactSink {
    /// Creates a sink writing into `directory` (created on first store).
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the sink directory.
    #[must_use]
    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }
}

#[async_trait]
impl ArtifactSink for FsArtifactSink {
    async fn store(&self, name: &ArtifactName, bytes: &[u8]) -> Result<(), ArtifactError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(format!("{}.png", name.file_stem()));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), "artifact stored");
        Ok(())
    }
}

/// Keeps artifacts in memory for tests.
#[derive(Debug, Default)]
pub struct MemoryArtifactSink {
    stored: parking_lot::Mutex<Vec<(ArtifactName, Vec<u8>)>>,
}

impl MemoryArtifactSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names of all stored artifacts, in store order.
    #[must_use]
    pub fn names(&self) -> Vec<ArtifactName> {
        self.stored.lock().iter().map(|(n, _)| n.clone()).collect()
    }

    /// Returns the step labels of all stored artifacts, in store order.
    #[must_use]
    pub fn step_labels(&self) -> Vec<String> {
        self.stored
            .lock()
            .iter()
            .map(|(n, _)| n.step_label.clone())
            .collect()
    }

    /// Returns the number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stored.lock().len()
    }

    /// Returns whether the sink is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stored.lock().is_empty()
    }
}

#[async_trait]
impl ArtifactSink for MemoryArtifactSink {
    async fn store(&self, name: &ArtifactName, bytes: &[u8]) -> Result<(), ArtifactError> {
        self.stored.lock().push((name.clone(), bytes.to_vec()));
        Ok(())
    }
}

/// Captures named, timestamped snapshots at workflow checkpoints.
#[derive(Clone)]
pub struct ArtifactRecorder {
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl fmt::Debug for ArtifactRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactRecorder")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl ArtifactRecorder {
    /// Creates a recorder writing into the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn ArtifactSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Creates a disabled recorder; every capture is a no-op.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Returns whether capture is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Captures a checkpoint snapshot.
    ///
    /// Never fails the caller: snapshot or store errors are logged and
    /// swallowed. The returned bool reports whether an artifact was
    /// actually stored and exists for instrumentation only.
    pub async fn capture(&self, driver: &dyn UiDriver, run_id: &str, step_label: &str) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };

        let name = ArtifactName::new(run_id, step_label);
        match self.capture_inner(driver, sink.as_ref(), &name).await {
            Ok(()) => {
                debug!(artifact = %name, "checkpoint captured");
                true
            }
            Err(err) => {
                warn!(artifact = %name, error = %err, "checkpoint capture failed");
                false
            }
        }
    }

    async fn capture_inner(
        &self,
        driver: &dyn UiDriver,
        sink: &dyn ArtifactSink,
        name: &ArtifactName,
    ) -> Result<(), ArtifactError> {
        let bytes = driver
            .capture_snapshot()
            .await
            .map_err(ArtifactError::Capture)?;
        sink.store(name, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDriver;
    use mockall::mock;

    mock! {
        Sink {}

        #[async_trait]
        impl ArtifactSink for Sink {
            async fn store(&self, name: &ArtifactName, bytes: &[u8]) -> Result<(), ArtifactError>;
        }
    }

    #[test]
    fn name_renders_run_step_timestamp() {
        let name = ArtifactName::new("id001", "user_type_selected");
        let stem = name.file_stem();
        let parts: Vec<&str> = stem.splitn(3, '_').collect();
        assert_eq!(parts[0], "id001");
        assert!(stem.starts_with("id001_user_type_selected_"));
        assert_eq!(name.timestamp.len(), 15);
    }

    #[tokio::test]
    async fn disabled_recorder_is_noop() {
        let driver = ScriptedDriver::new();
        let recorder = ArtifactRecorder::disabled();
        assert!(!recorder.is_enabled());
        assert!(!recorder.capture(&driver, "id001", "service_selected").await);
        assert!(driver.actions().is_empty());
    }

    #[tokio::test]
    async fn capture_stores_snapshot_bytes() {
        let driver = ScriptedDriver::new();
        let sink = Arc::new(MemoryArtifactSink::new());
        let recorder = ArtifactRecorder::new(sink.clone());

        assert!(recorder.capture(&driver, "id002", "time_selected").await);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.step_labels(), vec!["time_selected".to_string()]);
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() {
        let driver = ScriptedDriver::new();
        let mut sink = MockSink::new();
        sink.expect_store()
            .times(1)
            .returning(|name, _| {
                Err(ArtifactError::Store {
                    name: name.file_stem(),
                    detail: "disk full".to_string(),
                })
            });

        let recorder = ArtifactRecorder::new(Arc::new(sink));
        // Returns false but must not propagate the sink error.
        assert!(!recorder.capture(&driver, "id003", "form_completed").await);
    }

    #[tokio::test]
    async fn snapshot_failure_is_swallowed() {
        let driver = ScriptedDriver::new();
        driver.fail_snapshots();
        let sink = Arc::new(MemoryArtifactSink::new());
        let recorder = ArtifactRecorder::new(sink.clone());

        assert!(!recorder.capture(&driver, "id004", "final_success").await);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn fs_sink_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsArtifactSink::new(dir.path().join("reports"));
        let name = ArtifactName::new("id005", "final_success");

        sink.store(&name, b"png-bytes").await.unwrap();

        let path = dir
            .path()
            .join("reports")
            .join(format!("{}.png", name.file_stem()));
        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }
}
