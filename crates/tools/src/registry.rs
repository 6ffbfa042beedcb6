//! Tool registry for managing available tools.

use crate::types::{Tool, ToolDefinition};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Registry of available tools, ordered by name.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    enabled: HashSet<String>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            enabled: HashSet::new(),
        }
    }

    /// Register a tool (enabled by default).
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name.clone(), tool);
        self.enabled.insert(name);
    }

    /// Enable a tool by name.
    pub fn enable(&mut self, name: &str) {
        if self.tools.contains_key(name) {
            self.enabled.insert(name.to_string());
        }
    }

    /// Disable a tool by name.
    pub fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    /// Check if a tool is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Get definitions for all enabled tools, sorted by name.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .filter(|(name, _)| self.enabled.contains(*name))
            .map(|(_, tool)| tool.definition())
            .collect()
    }

    /// Get a tool by name (only if enabled).
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        if self.enabled.contains(name) {
            self.tools.get(name).cloned()
        } else {
            None
        }
    }

    /// List all registered tool names.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// List enabled tool names.
    pub fn list_enabled(&self) -> Vec<&str> {
        self.tools
            .keys()
            .filter(|name| self.enabled.contains(*name))
            .map(|s| s.as_str())
            .collect()
    }

    /// Number of enabled tools.
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
