//! Multi-account login orchestration.
//!
//! The orchestrator runs one login session per credential, each against
//! its own isolated driver instance, strictly in input order. A failure
//! in one session is caught at the session boundary, recorded in its
//! outcome, and never aborts the batch. Acquired drivers stay open after
//! the batch (interactive hand-off) until the caller invokes
//! [`SessionOrchestrator::release_all`].

use crate::config::SelectorMap;
use crate::driver::{DriverFactory, Selector, UiDriver};
use crate::errors::UiFlowError;
use crate::events::{EventSink, NoOpEventSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Login credentials for one session. Immutable input.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The organization/company the account belongs to.
    pub organization: String,
    /// The account identity (login name).
    pub identity: String,
    /// The account secret.
    pub secret: String,
}

impl Credential {
    /// Creates a credential.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

// The secret never appears in logs or debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("organization", &self.organization)
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result of one orchestrated login session. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Correlation id for this session.
    pub session_id: Uuid,
    /// The credential the session ran for.
    pub credential: Credential,
    /// Whether the session reached the submit click.
    pub succeeded: bool,
    /// The causing detail when the session failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// Runs independent login sessions and aggregates their outcomes.
pub struct SessionOrchestrator {
    factory: Arc<dyn DriverFactory>,
    selectors: SelectorMap,
    wait_timeout: Duration,
    events: Arc<dyn EventSink>,
    held: Vec<Arc<dyn UiDriver>>,
}

impl fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("wait_timeout", &self.wait_timeout)
            .field("held_sessions", &self.held.len())
            .finish_non_exhaustive()
    }
}

impl SessionOrchestrator {
    /// Creates an orchestrator acquiring drivers from `factory`.
    #[must_use]
    pub fn new(factory: Arc<dyn DriverFactory>) -> Self {
        Self {
            factory,
            selectors: SelectorMap::default(),
            wait_timeout: Duration::from_secs(15),
            events: Arc::new(NoOpEventSink),
            held: Vec::new(),
        }
    }

    /// Replaces the selector mapping.
    #[must_use]
    pub fn with_selectors(mut self, selectors: SelectorMap) -> Self {
        self.selectors = selectors;
        self
    }

    /// Sets the per-action wait timeout.
    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Runs one login session per credential, in input order.
    ///
    /// Outcomes are returned in the same order. Every acquired driver is
    /// held open afterwards until [`SessionOrchestrator::release_all`].
    pub async fn run_all(
        &mut self,
        target: &str,
        credentials: &[Credential],
    ) -> Vec<SessionOutcome> {
        let mut outcomes = Vec::with_capacity(credentials.len());

        for (index, credential) in credentials.iter().enumerate() {
            let session_id = Uuid::new_v4();
            info!(
                session = %session_id,
                index,
                identity = %credential.identity,
                "starting login session"
            );
            self.events.try_emit(
                "session.started",
                Some(serde_json::json!({
                    "session": session_id.to_string(),
                    "identity": credential.identity,
                })),
            );

            match self.run_session(target, credential).await {
                Ok(()) => {
                    self.events.try_emit(
                        "session.completed",
                        Some(serde_json::json!({ "session": session_id.to_string() })),
                    );
                    outcomes.push(SessionOutcome {
                        session_id,
                        credential: credential.clone(),
                        succeeded: true,
                        error_detail: None,
                    });
                }
                Err(err) => {
                    let detail = err.to_string();
                    warn!(
                        session = %session_id,
                        identity = %credential.identity,
                        error = %detail,
                        "login session failed"
                    );
                    self.events.try_emit(
                        "session.failed",
                        Some(serde_json::json!({
                            "session": session_id.to_string(),
                            "error": detail,
                        })),
                    );
                    outcomes.push(SessionOutcome {
                        session_id,
                        credential: credential.clone(),
                        succeeded: false,
                        error_detail: Some(detail),
                    });
                }
            }
        }

        outcomes
    }

    async fn run_session(
        &mut self,
        target: &str,
        credential: &Credential,
    ) -> Result<(), UiFlowError> {
        let driver = self.factory.acquire().await?;
        // Held before any interaction: a session that fails mid-way still
        // leaves its browsing context open for inspection.
        self.held.push(Arc::clone(&driver));

        driver.navigate(target).await?;

        self.fill_field(
            driver.as_ref(),
            &self.selectors.login_organization,
            &credential.organization,
        )
        .await?;
        self.fill_field(
            driver.as_ref(),
            &self.selectors.login_identity,
            &credential.identity,
        )
        .await?;
        self.fill_field(
            driver.as_ref(),
            &self.selectors.login_secret,
            &credential.secret,
        )
        .await?;

        let submit = driver
            .find_actionable(&self.selectors.login_submit, self.wait_timeout)
            .await?;
        driver.click(&submit).await?;
        Ok(())
    }

    async fn fill_field(
        &self,
        driver: &dyn UiDriver,
        selector: &Selector,
        value: &str,
    ) -> Result<(), UiFlowError> {
        let handle = driver.find_actionable(selector, self.wait_timeout).await?;
        driver.set_value(&handle, value).await?;
        Ok(())
    }

    /// Returns how many driver instances are currently held open.
    #[must_use]
    pub fn held_sessions(&self) -> usize {
        self.held.len()
    }

    /// Releases every held driver instance.
    ///
    /// Individual release failures are logged and tolerated; the loop
    /// always drains the full set.
    pub async fn release_all(&mut self) {
        for driver in self.held.drain(..) {
            if let Err(err) = driver.release().await {
                warn!(error = %err, "driver release failed");
            } else {
                self.events.try_emit("session.released", None);
            }
        }
    }
}
