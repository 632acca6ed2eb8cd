//! Configuration surface for the engine and orchestrator.

use crate::driver::Selector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Which registration scenario a run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioVariant {
    /// The standard user flow.
    Standard,
    /// The premium user flow.
    Premium,
}

impl Default for ScenarioVariant {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for ScenarioVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

/// Which service the registration flow selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceVariant {
    /// The first explicitly mapped service.
    TypeA,
    /// The second explicitly mapped service.
    TypeB,
    /// Any other service; selection falls back to the default label.
    Other,
}

impl Default for ServiceVariant {
    fn default() -> Self {
        Self::TypeA
    }
}

impl fmt::Display for ServiceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeA => write!(f, "type_a"),
            Self::TypeB => write!(f, "type_b"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Maps logical step and field names to concrete selectors.
///
/// The defaults carry the selector contract the target UI satisfies;
/// overriding a field isolates a markup change to configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorMap {
    /// User-type button for the standard scenario.
    pub user_type_standard: Selector,
    /// User-type button for the premium scenario.
    pub user_type_premium: Selector,
    /// Service button for [`ServiceVariant::TypeA`].
    pub service_type_a: Selector,
    /// Service button for [`ServiceVariant::TypeB`].
    pub service_type_b: Selector,
    /// Fallback service button for unmapped variants.
    pub service_fallback: Selector,
    /// The universal proceed control between form sub-entries.
    pub proceed: Selector,
    /// The virtual-keyboard spacebar control.
    pub spacebar: Selector,
    /// The dynamically populated available-slot buttons.
    pub time_slot: Selector,
    /// Login form: organization field.
    pub login_organization: Selector,
    /// Login form: identity field.
    pub login_identity: Selector,
    /// Login form: secret field.
    pub login_secret: Selector,
    /// Login form: submit control.
    pub login_submit: Selector,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            user_type_standard: Selector::LabelContains("STANDARD_USER".into()),
            user_type_premium: Selector::LabelContains("PREMIUM_USER".into()),
            service_type_a: Selector::LabelContains("SERVICE_ALPHA".into()),
            service_type_b: Selector::LabelContains("SERVICE_BETA".into()),
            service_fallback: Selector::LabelContains("DEFAULT_SERVICE".into()),
            proceed: Selector::LabelContains("NEXT".into()),
            spacebar: Selector::CssClass("spacebar-class".into()),
            time_slot: Selector::CssClass("time-slot-btn".into()),
            login_organization: Selector::FieldId("Company".into()),
            login_identity: Selector::FieldId("Login".into()),
            login_secret: Selector::FieldId("Password".into()),
            login_submit: Selector::SubmitWithClass("btn-primary".into()),
        }
    }
}

impl SelectorMap {
    /// Returns the user-type selector for a scenario variant.
    #[must_use]
    pub fn user_type(&self, scenario: ScenarioVariant) -> &Selector {
        match scenario {
            ScenarioVariant::Standard => &self.user_type_standard,
            ScenarioVariant::Premium => &self.user_type_premium,
        }
    }

    /// Returns the service selector for a variant, falling back to the
    /// default label for anything not explicitly mapped.
    #[must_use]
    pub fn service(&self, service: ServiceVariant) -> &Selector {
        match service {
            ServiceVariant::TypeA => &self.service_type_a,
            ServiceVariant::TypeB => &self.service_type_b,
            ServiceVariant::Other => &self.service_fallback,
        }
    }

    /// Returns the virtual-keyboard selector for one character.
    ///
    /// Space maps to the dedicated spacebar control; every other
    /// character maps to a key whose label matches it case-insensitively.
    #[must_use]
    pub fn key(&self, ch: char) -> Selector {
        if ch == ' ' {
            self.spacebar.clone()
        } else {
            Selector::KeyLabel(ch)
        }
    }
}

/// Artifact capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Whether checkpoint artifacts are captured at all.
    pub enabled: bool,
    /// Directory the filesystem sink writes into.
    pub directory: PathBuf,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("test_reports"),
        }
    }
}

/// Full configuration for one workflow engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target location the run navigates to first.
    pub base_url: String,
    /// Which registration scenario to exercise.
    pub scenario: ScenarioVariant,
    /// Which service to select.
    pub service: ServiceVariant,
    /// Checkpoint artifact capture.
    pub capture: CaptureSettings,
    /// Bounded wait applied to every control resolution.
    pub wait_timeout: Duration,
    /// Inter-keystroke pause interval for the virtual keyboard.
    pub keystroke_pause: (Duration, Duration),
    /// Placeholder email typed into the final form sub-entry.
    pub placeholder_email: String,
    /// Logical-name-to-selector mapping.
    pub selectors: SelectorMap,
}

impl EngineConfig {
    /// Default bounded wait for control actionability.
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Creates a configuration for a target location with defaults.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            scenario: ScenarioVariant::default(),
            service: ServiceVariant::default(),
            capture: CaptureSettings::default(),
            wait_timeout: Self::DEFAULT_WAIT_TIMEOUT,
            keystroke_pause: (Duration::from_millis(100), Duration::from_millis(300)),
            placeholder_email: "test@example.com".to_string(),
            selectors: SelectorMap::default(),
        }
    }

    /// Sets the scenario variant.
    #[must_use]
    pub fn with_scenario(mut self, scenario: ScenarioVariant) -> Self {
        self.scenario = scenario;
        self
    }

    /// Sets the service variant.
    #[must_use]
    pub fn with_service(mut self, service: ServiceVariant) -> Self {
        self.service = service;
        self
    }

    /// Enables artifact capture into the given directory.
    #[must_use]
    pub fn with_capture(mut self, directory: impl Into<PathBuf>) -> Self {
        self.capture = CaptureSettings {
            enabled: true,
            directory: directory.into(),
        };
        self
    }

    /// Sets the per-action wait timeout.
    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Sets the inter-keystroke pause interval.
    #[must_use]
    pub fn with_keystroke_pause(mut self, min: Duration, max: Duration) -> Self {
        self.keystroke_pause = (min, max);
        self
    }

    /// Sets the placeholder email for the final form sub-entry.
    #[must_use]
    pub fn with_placeholder_email(mut self, email: impl Into<String>) -> Self {
        self.placeholder_email = email.into();
        self
    }

    /// Replaces the selector mapping.
    #[must_use]
    pub fn with_selectors(mut self, selectors: SelectorMap) -> Self {
        self.selectors = selectors;
        self
    }
}
