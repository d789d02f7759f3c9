//! # pulse-orchestrator
//!
//! Execution orchestrator for PlantPulse: the sole entry point tying the
//! tool registry, the response cache and the data layer together.

pub mod orchestrator;
pub mod result;

pub use orchestrator::Orchestrator;
pub use result::StructuredResult;
