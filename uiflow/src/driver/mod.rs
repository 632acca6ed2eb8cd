//! The UI driver contract consumed by the engine.
//!
//! The engine never talks to a browser directly; it drives an abstract
//! [`UiDriver`] that a backend (WebDriver, CDP, a scripted test double)
//! implements. Selectors are data, not inline strings, so markup changes
//! stay isolated to configuration.

use crate::errors::DriverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How a control is located in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// A button whose visible label contains the given text.
    LabelContains(String),

    /// A virtual-keyboard key whose visible label case-insensitively
    /// equals the given character.
    KeyLabel(char),

    /// Any control carrying the given CSS class.
    CssClass(String),

    /// A `type=submit` control whose class list contains the given token.
    SubmitWithClass(String),

    /// A form field addressed by element id.
    FieldId(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelContains(text) => write!(f, "label~'{text}'"),
            Self::KeyLabel(ch) => write!(f, "key='{ch}'"),
            Self::CssClass(class) => write!(f, ".{class}"),
            Self::SubmitWithClass(class) => write!(f, "[type=submit].{class}"),
            Self::FieldId(id) => write!(f, "#{id}"),
        }
    }
}

/// An opaque handle to a located control.
///
/// The `raw` value is backend-defined (an element reference, a node id);
/// the engine only ever passes handles back to the driver that issued
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlHandle {
    raw: String,
}

impl ControlHandle {
    /// Creates a handle from a backend-defined reference.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the backend-defined reference.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// The driver primitives the engine needs from a UI backend.
///
/// All waits are bounded: `find_actionable` and `list_matching` block the
/// calling flow until the control(s) become actionable or the timeout
/// elapses, returning [`DriverError::ResolutionTimeout`] on expiry.
#[async_trait]
pub trait UiDriver: Send + Sync + fmt::Debug {
    /// Navigates the driven context to the given URL.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Waits for a control matching `selector` to become actionable.
    async fn find_actionable(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<ControlHandle, DriverError>;

    /// Clicks a previously located control.
    async fn click(&self, handle: &ControlHandle) -> Result<(), DriverError>;

    /// Replaces the value of a previously located field.
    async fn set_value(&self, handle: &ControlHandle, text: &str) -> Result<(), DriverError>;

    /// Captures a visual snapshot of the current state.
    async fn capture_snapshot(&self) -> Result<Vec<u8>, DriverError>;

    /// Returns all controls matching `selector`, waiting up to `timeout`
    /// for the set to populate. An empty result is not an error at this
    /// level; callers decide whether zero candidates is a failure.
    async fn list_matching(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<Vec<ControlHandle>, DriverError>;

    /// Releases the driver instance and its browsing context.
    async fn release(&self) -> Result<(), DriverError>;
}

/// Produces isolated [`UiDriver`] instances.
///
/// Each `acquire` call yields a fresh browsing context sharing no
/// cookies or storage with any other, so concurrent sessions cannot
/// observe each other.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Acquires a new isolated driver instance.
    async fn acquire(&self) -> Result<Arc<dyn UiDriver>, DriverError>;
}
