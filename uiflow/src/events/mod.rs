//! Step-level event emission.
//!
//! The engine and orchestrator report progress through an [`EventSink`]
//! so harnesses can observe runs without parsing logs. Emission is
//! best-effort: a sink must never fail or panic into the caller.
//!
//! Event vocabulary: `step.started`, `step.completed`, `step.failed`,
//! `run.completed`, `run.aborted`, `session.started`,
//! `session.completed`, `session.failed`, `session.released`.

use async_trait::async_trait;
use tracing::info;

/// Receives progress events from the engine and orchestrator.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>);

    /// Emits an event without blocking. Must never fail the caller;
    /// sink-internal errors are logged and suppressed.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// Discards all events. The default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}

    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// Logs every event through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventSink;

impl LoggingEventSink {
    fn log_event(event_type: &str, data: &Option<serde_json::Value>) {
        info!(
            event_type = %event_type,
            event_data = ?data,
            "Event: {}", event_type
        );
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        Self::log_event(event_type, &data);
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        Self::log_event(event_type, &data);
    }
}

/// Collects events in memory for test assertions.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<(String, Option<serde_json::Value>)>>,
}

impl CollectingEventSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.read().clone()
    }

    /// Returns only the event types, in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.read().iter().map(|(t, _)| t.clone()).collect()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collecting_sink_preserves_order() {
        let sink = CollectingEventSink::new();
        sink.try_emit("step.started", Some(serde_json::json!({"step": "select_user_type"})));
        sink.emit("step.completed", None).await;

        assert_eq!(
            sink.event_types(),
            vec!["step.started".to_string(), "step.completed".to_string()]
        );
        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn noop_sink_discards() {
        let sink = NoOpEventSink;
        sink.emit("run.completed", None).await;
        sink.try_emit("run.aborted", None);
    }
}
