//! Builtin query handlers
//!
//! Each tool is strictly read-only against the data layer and returns a
//! `ToolOutput` citing every data result it touched.

pub mod asset_lookup;
pub mod downtime_events;
pub mod production_status;
pub mod shift_schedule;

pub use asset_lookup::AssetLookupTool;
pub use downtime_events::DowntimeEventsTool;
pub use production_status::ProductionStatusTool;
pub use shift_schedule::ShiftScheduleTool;
