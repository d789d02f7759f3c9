//! Tool Registry - manages available tools
//!
//! Registration is explicit and happens at startup. A duplicate name is a
//! hard error there - silently dropping a tool would be worse than failing
//! the process.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use pulse_foundation::{Error, Result};

use crate::{Tool, ToolDef};

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Registration order, for stable listing
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: vec![],
        }
    }

    /// Create a registry with all builtin tools registered
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        registry.discover()?;
        Ok(registry)
    }

    /// Register a tool. Fails on a duplicate name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name();
        if self.tools.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }

        debug!(tool = %name, "registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Register every builtin handler not yet present.
    ///
    /// Idempotent: running it again registers nothing and returns 0.
    pub fn discover(&mut self) -> Result<usize> {
        let builtins: Vec<Arc<dyn Tool>> = vec![
            Arc::new(crate::builtin::asset_lookup::AssetLookupTool::new()),
            Arc::new(crate::builtin::production_status::ProductionStatusTool::new()),
            Arc::new(crate::builtin::downtime_events::DowntimeEventsTool::new()),
            Arc::new(crate::builtin::shift_schedule::ShiftScheduleTool::new()),
        ];

        let mut added = 0;
        for tool in builtins {
            if !self.contains(&tool.name()) {
                self.register(tool)?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Get a tool by name. Never fabricates a handler.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool definitions, in registration order
    pub fn list(&self) -> Vec<ToolDef> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    /// All tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Clear all registrations. Test/bootstrap only.
    pub fn reset(&mut self) {
        self.tools.clear();
        self.order.clear();
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_builtins_registers_handlers() {
        let registry = ToolRegistry::with_builtins().unwrap();
        assert!(registry.contains("asset_lookup"));
        assert!(registry.contains("production_status"));
        assert!(registry.contains("downtime_events"));
        assert!(registry.contains("shift_schedule"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = ToolRegistry::with_builtins().unwrap();
        let err = registry
            .register(Arc::new(
                crate::builtin::asset_lookup::AssetLookupTool::new(),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTool(name) if name == "asset_lookup"));
    }

    #[test]
    fn discover_is_idempotent() {
        let mut registry = ToolRegistry::new();
        let first = registry.discover().unwrap();
        let len = registry.len();

        let second = registry.discover().unwrap();
        assert!(first > 0);
        assert_eq!(second, 0);
        assert_eq!(registry.len(), len);
    }

    #[test]
    fn list_preserves_registration_order() {
        let registry = ToolRegistry::with_builtins().unwrap();
        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "asset_lookup",
                "production_status",
                "downtime_events",
                "shift_schedule"
            ]
        );
    }

    #[test]
    fn unknown_tool_is_none() {
        let registry = ToolRegistry::with_builtins().unwrap();
        assert!(registry.get("foobar").is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut registry = ToolRegistry::with_builtins().unwrap();
        registry.reset();
        assert!(registry.is_empty());

        // A fresh discover works again after reset
        assert!(registry.discover().unwrap() > 0);
    }
}
