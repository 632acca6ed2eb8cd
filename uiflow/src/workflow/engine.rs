//! Sequencing of the fixed registration steps, fail-fast.

use super::{RunContext, RunId, RunReport, RunState, StepName};
use crate::artifacts::{ArtifactRecorder, FsArtifactSink};
use crate::codegen::IdentifierGenerator;
use crate::config::EngineConfig;
use crate::driver::{Selector, UiDriver};
use crate::errors::UiFlowError;
use crate::events::{EventSink, NoOpEventSink};
use crate::keyboard::VirtualKeyboard;
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info};

/// Artifact label for the final checkpoint after all steps succeed.
const FINAL_LABEL: &str = "final_success";

/// Executes the registration workflow against one driver instance.
///
/// Steps run strictly in order; the first failure transitions the run to
/// [`RunState::Aborted`] and the remaining steps never execute. There is
/// no engine-level retry — any retrying lives inside the driver's own
/// bounded waits. Internal faults never escape [`WorkflowEngine::run`];
/// they are logged and folded into the returned report.
pub struct WorkflowEngine {
    driver: Arc<dyn UiDriver>,
    config: EngineConfig,
    recorder: ArtifactRecorder,
    generator: IdentifierGenerator,
    keyboard: VirtualKeyboard,
    events: Arc<dyn EventSink>,
    runs_started: u64,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("driver", &self.driver)
            .field("config", &self.config)
            .field("recorder", &self.recorder)
            .field("runs_started", &self.runs_started)
            .finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    /// Creates an engine over a driver with the given configuration.
    ///
    /// When capture is enabled the recorder writes into the configured
    /// directory through a filesystem sink; use
    /// [`WorkflowEngine::with_recorder`] to substitute another sink.
    #[must_use]
    pub fn new(driver: Arc<dyn UiDriver>, config: EngineConfig) -> Self {
        let recorder = if config.capture.enabled {
            ArtifactRecorder::new(Arc::new(FsArtifactSink::new(config.capture.directory.clone())))
        } else {
            ArtifactRecorder::disabled()
        };
        let keyboard = VirtualKeyboard::new(
            Arc::clone(&driver),
            config.selectors.clone(),
            config.wait_timeout,
        )
        .with_pause(config.keystroke_pause.0, config.keystroke_pause.1);

        Self {
            driver,
            config,
            recorder,
            generator: IdentifierGenerator::new(),
            keyboard,
            events: Arc::new(NoOpEventSink),
            runs_started: 0,
        }
    }

    /// Replaces the artifact recorder.
    #[must_use]
    pub fn with_recorder(mut self, recorder: ArtifactRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    /// Replaces the identifier generator (e.g. seeded, or sharing a
    /// registry across engines).
    #[must_use]
    pub fn with_generator(mut self, generator: IdentifierGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Executes one full run of the registration workflow.
    pub async fn run(&mut self) -> RunReport {
        self.runs_started += 1;
        let run_id = RunId::new(self.runs_started);
        let mut ctx = RunContext::new(run_id, self.config.scenario, self.config.service);

        info!(
            run = %run_id,
            scenario = %self.config.scenario,
            service = %self.config.service,
            "starting registration run"
        );

        for step in StepName::ORDERED {
            self.events.try_emit(
                "step.started",
                Some(serde_json::json!({ "run": run_id.to_string(), "step": step.to_string() })),
            );

            match self.execute_step(step, run_id).await {
                Ok(()) => {
                    ctx.record_success(step);
                    self.events.try_emit(
                        "step.completed",
                        Some(serde_json::json!({
                            "run": run_id.to_string(),
                            "step": step.to_string(),
                        })),
                    );
                }
                Err(err) => {
                    error!(run = %run_id, step = %step, error = %err, "step failed, aborting run");
                    let detail = err.to_string();
                    ctx.record_failure(step, detail.clone());
                    self.events.try_emit(
                        "step.failed",
                        Some(serde_json::json!({
                            "run": run_id.to_string(),
                            "step": step.to_string(),
                            "error": detail,
                        })),
                    );
                    self.events.try_emit(
                        "run.aborted",
                        Some(serde_json::json!({ "run": run_id.to_string() })),
                    );
                    return ctx.into_report(RunState::Aborted, Some(detail));
                }
            }
        }

        self.checkpoint(run_id, FINAL_LABEL).await;
        info!(run = %run_id, "registration run completed");
        self.events.try_emit(
            "run.completed",
            Some(serde_json::json!({ "run": run_id.to_string() })),
        );
        ctx.into_report(RunState::Completed, None)
    }

    async fn execute_step(&self, step: StepName, run_id: RunId) -> Result<(), UiFlowError> {
        match step {
            StepName::SelectUserType => self.select_user_type(run_id).await,
            StepName::SelectService => self.select_service(run_id).await,
            StepName::SelectTimeSlot => self.select_time_slot(run_id).await,
            StepName::FillFormData => self.fill_form_data(run_id).await,
        }
    }

    async fn select_user_type(&self, run_id: RunId) -> Result<(), UiFlowError> {
        self.driver.navigate(&self.config.base_url).await?;
        let selector = self.config.selectors.user_type(self.config.scenario);
        self.click_when_actionable(selector).await?;
        self.checkpoint(run_id, StepName::SelectUserType.artifact_label())
            .await;
        Ok(())
    }

    async fn select_service(&self, run_id: RunId) -> Result<(), UiFlowError> {
        let selector = self.config.selectors.service(self.config.service);
        self.click_when_actionable(selector).await?;
        self.checkpoint(run_id, StepName::SelectService.artifact_label())
            .await;
        Ok(())
    }

    async fn select_time_slot(&self, run_id: RunId) -> Result<(), UiFlowError> {
        let selector = &self.config.selectors.time_slot;
        let slots = self
            .driver
            .list_matching(selector, self.config.wait_timeout)
            .await?;

        // Always the first available slot; no ranking or preference.
        let Some(first) = slots.first() else {
            return Err(UiFlowError::EmptyCandidateSet {
                selector: selector.to_string(),
            });
        };
        self.driver.click(first).await?;
        info!(run = %run_id, slot = %first.raw(), "time slot selected");
        self.checkpoint(run_id, StepName::SelectTimeSlot.artifact_label())
            .await;
        Ok(())
    }

    async fn fill_form_data(&self, run_id: RunId) -> Result<(), UiFlowError> {
        let code = self.generator.next_code();
        info!(run = %run_id, code = %code, "entering generated identifier");
        self.keyboard.type_text(code.as_str()).await?;
        self.press_proceed().await?;

        let name = placeholder_name();
        self.keyboard.type_text(&name).await?;
        self.press_proceed().await?;

        self.keyboard
            .type_text(&self.config.placeholder_email)
            .await?;
        self.press_proceed().await?;

        self.checkpoint(run_id, StepName::FillFormData.artifact_label())
            .await;
        Ok(())
    }

    async fn press_proceed(&self) -> Result<(), UiFlowError> {
        self.click_when_actionable(&self.config.selectors.proceed)
            .await
    }

    async fn click_when_actionable(&self, selector: &Selector) -> Result<(), UiFlowError> {
        let handle = self
            .driver
            .find_actionable(selector, self.config.wait_timeout)
            .await?;
        self.driver.click(&handle).await?;
        Ok(())
    }

    async fn checkpoint(&self, run_id: RunId, label: &str) {
        self.recorder
            .capture(self.driver.as_ref(), &run_id.to_string(), label)
            .await;
    }
}

/// Two random uppercase letters separated by a space.
fn placeholder_name() -> String {
    let mut rng = rand::thread_rng();
    let first = char::from(b'A' + rng.gen_range(0..26));
    let second = char::from(b'A' + rng.gen_range(0..26));
    format!("{first} {second}")
}
