//! The multi-step registration workflow engine.

mod context;
mod engine;

#[cfg(test)]
mod integration_tests;

pub use context::{RunContext, RunId, RunReport, RunState, StepName, StepOutcome};
pub use engine::WorkflowEngine;
