//! # pulse-tool
//!
//! Tool system for PlantPulse providing:
//! - Tool trait and registry
//! - Builtin query handlers (asset lookup, production status, downtime, shifts)

pub mod builtin;
pub mod registry;
pub mod r#trait;

pub use r#trait::{Tool, ToolContext, ToolDef, ToolDefBuilder, ToolOutput, ToolParameters};
pub use registry::ToolRegistry;

// Re-export builtin tools
pub use builtin::{
    AssetLookupTool, DowntimeEventsTool, ProductionStatusTool, ShiftScheduleTool,
};
