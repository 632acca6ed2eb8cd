//! # Uiflow
//!
//! A workflow automation engine for exercising multi-step UI flows in
//! QA/load-style testing, built around two flows:
//!
//! - **Registration runs**: a fixed sequence of steps (user type,
//!   service, time slot, form entry) executed fail-fast against one
//!   driver instance, with checkpoint artifacts along the way.
//! - **Login sessions**: N independent credential-based sessions against
//!   isolated driver instances, with per-session failure isolation.
//!
//! The crate never talks to a browser itself; it consumes the
//! [`driver::UiDriver`] contract a backend implements, and the
//! [`testing`] module ships scripted doubles for exercising flows
//! without a UI.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uiflow::prelude::*;
//! use std::sync::Arc;
//!
//! let config = EngineConfig::new("https://demo-queue-system.io")
//!     .with_scenario(ScenarioVariant::Premium)
//!     .with_service(ServiceVariant::TypeB)
//!     .with_capture("./test_results");
//!
//! let mut engine = WorkflowEngine::new(driver, config);
//! let report = engine.run().await;
//! assert!(report.succeeded());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod artifacts;
pub mod codegen;
pub mod config;
pub mod driver;
pub mod errors;
pub mod events;
pub mod keyboard;
pub mod observability;
pub mod session;
pub mod testing;
pub mod utils;
pub mod workflow;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::artifacts::{
        ArtifactName, ArtifactRecorder, ArtifactSink, FsArtifactSink, MemoryArtifactSink,
    };
    pub use crate::codegen::{CodeRegistry, GeneratedCode, IdentifierGenerator};
    pub use crate::config::{
        CaptureSettings, EngineConfig, ScenarioVariant, SelectorMap, ServiceVariant,
    };
    pub use crate::driver::{ControlHandle, DriverFactory, Selector, UiDriver};
    pub use crate::errors::{ArtifactError, DriverError, UiFlowError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::keyboard::VirtualKeyboard;
    pub use crate::session::{Credential, SessionOrchestrator, SessionOutcome};
    pub use crate::workflow::{
        RunContext, RunId, RunReport, RunState, StepName, StepOutcome, WorkflowEngine,
    };
}
