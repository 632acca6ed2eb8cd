//! Run-scoped state: identifiers, step names, outcomes, and the report.

use crate::config::{ScenarioVariant, ServiceVariant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque run counter, rendered as the artifact-name prefix (`id001`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    /// Creates a run id from a counter value.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id{:03}", self.0)
    }
}

/// The fixed, ordered steps of the registration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Navigate to the target and pick the user type for the scenario.
    SelectUserType,
    /// Pick the service for the configured variant.
    SelectService,
    /// Pick the first available time slot.
    SelectTimeSlot,
    /// Type the generated code, placeholder name, and email.
    FillFormData,
}

impl StepName {
    /// The steps in execution order.
    pub const ORDERED: [Self; 4] = [
        Self::SelectUserType,
        Self::SelectService,
        Self::SelectTimeSlot,
        Self::FillFormData,
    ];

    /// The artifact label captured at this step's checkpoint.
    #[must_use]
    pub fn artifact_label(&self) -> &'static str {
        match self {
            Self::SelectUserType => "user_type_selected",
            Self::SelectService => "service_selected",
            Self::SelectTimeSlot => "time_selected",
            Self::FillFormData => "form_completed",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectUserType => write!(f, "select_user_type"),
            Self::SelectService => write!(f, "select_service"),
            Self::SelectTimeSlot => write!(f, "select_time_slot"),
            Self::FillFormData => write!(f, "fill_form_data"),
        }
    }
}

/// Terminal and in-flight run states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// The run is executing steps.
    Running,
    /// Every step succeeded.
    Completed,
    /// A step failed; later steps never ran.
    Aborted,
}

impl RunState {
    /// Returns true for `Completed` and `Aborted`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Which step this outcome belongs to.
    pub step: StepName,
    /// Whether the step succeeded.
    pub succeeded: bool,
    /// Failure detail when the step failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Mutable state of one workflow run.
///
/// Owned exclusively by the engine executing the run; only the engine
/// appends outcomes, and the context is consumed into a [`RunReport`]
/// when the run reaches a terminal state.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: RunId,
    scenario: ScenarioVariant,
    service: ServiceVariant,
    history: Vec<StepOutcome>,
}

impl RunContext {
    /// Creates the context for a fresh run.
    #[must_use]
    pub fn new(run_id: RunId, scenario: ScenarioVariant, service: ServiceVariant) -> Self {
        Self {
            run_id,
            scenario,
            service,
            history: Vec::new(),
        }
    }

    /// Returns the run id.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the scenario variant for this run.
    #[must_use]
    pub fn scenario(&self) -> ScenarioVariant {
        self.scenario
    }

    /// Returns the service variant for this run.
    #[must_use]
    pub fn service(&self) -> ServiceVariant {
        self.service
    }

    /// Returns the step history recorded so far.
    #[must_use]
    pub fn history(&self) -> &[StepOutcome] {
        &self.history
    }

    /// Records a successful step.
    pub fn record_success(&mut self, step: StepName) {
        self.history.push(StepOutcome {
            step,
            succeeded: true,
            error: None,
        });
    }

    /// Records a failed step.
    pub fn record_failure(&mut self, step: StepName, error: impl Into<String>) {
        self.history.push(StepOutcome {
            step,
            succeeded: false,
            error: Some(error.into()),
        });
    }

    /// Consumes the context into the run's final report.
    #[must_use]
    pub fn into_report(self, state: RunState, error: Option<String>) -> RunReport {
        RunReport {
            run_id: self.run_id,
            state,
            steps: self.history,
            error,
        }
    }
}

/// The terminal outcome of one workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// The run this report belongs to.
    pub run_id: RunId,
    /// Terminal state of the run.
    pub state: RunState,
    /// Per-step outcomes, in execution order.
    pub steps: Vec<StepOutcome>,
    /// The failure that aborted the run, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    /// Returns true if the run completed every step.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn run_id_renders_zero_padded() {
        assert_eq!(RunId::new(1).to_string(), "id001");
        assert_eq!(RunId::new(42).to_string(), "id042");
        assert_eq!(RunId::new(1234).to_string(), "id1234");
    }

    #[test]
    fn ordered_steps_and_labels() {
        let labels: Vec<_> = StepName::ORDERED
            .iter()
            .map(StepName::artifact_label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "user_type_selected",
                "service_selected",
                "time_selected",
                "form_completed",
            ]
        );
    }

    #[test]
    fn context_folds_into_report() {
        let mut ctx = RunContext::new(
            RunId::new(3),
            ScenarioVariant::Premium,
            ServiceVariant::TypeB,
        );
        ctx.record_success(StepName::SelectUserType);
        ctx.record_failure(StepName::SelectService, "control not actionable");

        let report = ctx.into_report(RunState::Aborted, Some("control not actionable".into()));
        assert!(!report.succeeded());
        assert!(report.state.is_terminal());
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[1].step, StepName::SelectService);
        assert!(!report.steps[1].succeeded);
    }
}
