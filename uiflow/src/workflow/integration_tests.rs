//! End-to-end scenario tests over scripted drivers.

#[cfg(test)]
mod tests {
    use crate::artifacts::{ArtifactRecorder, MemoryArtifactSink};
    use crate::codegen::IdentifierGenerator;
    use crate::config::{EngineConfig, ScenarioVariant, ServiceVariant};
    use crate::driver::UiDriver;
    use crate::testing::{DriverAction, ScriptedDriver};
    use crate::workflow::{StepName, WorkflowEngine};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    fn premium_config() -> EngineConfig {
        EngineConfig::new("https://demo-queue-system.io")
            .with_scenario(ScenarioVariant::Premium)
            .with_service(ServiceVariant::TypeB)
            .with_wait_timeout(Duration::from_millis(50))
            .with_keystroke_pause(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn premium_type_b_run_end_to_end() {
        let driver = Arc::new(ScriptedDriver::new());
        driver.set_match_count("time-slot-btn", 3);
        let sink = Arc::new(MemoryArtifactSink::new());

        let dyn_driver: Arc<dyn UiDriver> = driver.clone();
        let mut engine = WorkflowEngine::new(dyn_driver, premium_config())
            .with_generator(IdentifierGenerator::from_seed(11))
            .with_recorder(ArtifactRecorder::new(sink.clone()));

        let report = engine.run().await;
        assert!(report.succeeded());
        assert_eq!(
            report.steps.iter().map(|o| o.step).collect::<Vec<_>>(),
            StepName::ORDERED.to_vec()
        );

        let actions = driver.actions();

        // Navigation happened first.
        assert_eq!(
            actions[0],
            DriverAction::Navigate("https://demo-queue-system.io".to_string())
        );

        // The clicks walk the flow: premium user, beta service, first of
        // the three slots, then the form entry (keys interleaved with the
        // proceed control).
        let clicks = driver.clicked();
        assert_eq!(clicks[0], "label~'PREMIUM_USER'");
        assert_eq!(clicks[1], "label~'SERVICE_BETA'");
        assert_eq!(clicks[2], ".time-slot-btn[0]");
        assert_eq!(
            clicks.iter().filter(|t| *t == "label~'NEXT'").count(),
            3,
            "one proceed per form sub-entry"
        );

        // Exactly five artifacts, in checkpoint order.
        assert_eq!(
            sink.step_labels(),
            vec![
                "user_type_selected",
                "service_selected",
                "time_selected",
                "form_completed",
                "final_success",
            ]
        );
    }

    #[tokio::test]
    async fn form_entry_types_code_name_and_email() {
        let driver = Arc::new(ScriptedDriver::new());
        let dyn_driver: Arc<dyn UiDriver> = driver.clone();
        let mut engine = WorkflowEngine::new(dyn_driver, premium_config())
            .with_generator(IdentifierGenerator::from_seed(5));

        let report = engine.run().await;
        assert!(report.succeeded());

        // 8 code keys + 3 name keys + 16 email keys, all via key/spacebar
        // controls; the email's '@' and '.' are ordinary key labels.
        let key_clicks: Vec<String> = driver
            .clicked()
            .into_iter()
            .filter(|t| t.starts_with("key='") || t.contains("spacebar"))
            .collect();
        assert_eq!(key_clicks.len(), 8 + 3 + 16);
        assert!(key_clicks.contains(&"key='@'".to_string()));
        assert!(key_clicks.contains(&".spacebar-class".to_string()));
    }

    #[tokio::test]
    async fn keyboard_timeout_mid_form_aborts_the_run() {
        let driver = Arc::new(ScriptedDriver::new());
        // The email's '@' key never resolves; the earlier sub-entries
        // succeed, so the abort happens inside FillFormData.
        driver.fail_matching("key='@'");
        let dyn_driver: Arc<dyn UiDriver> = driver.clone();
        let mut engine = WorkflowEngine::new(dyn_driver, premium_config())
            .with_generator(IdentifierGenerator::from_seed(5));

        let report = engine.run().await;
        assert!(!report.succeeded());
        let last = report.steps.last().unwrap();
        assert_eq!(last.step, StepName::FillFormData);
        assert!(last.error.as_deref().unwrap().contains("virtual key '@'"));
    }
}
