//! In-memory tool registry.

use crate::tools::{
    domain::ToolDefinition,
    ports::{ToolRegistry, ToolRegistryError, ToolRegistryResult},
};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory tool registry keyed by tool name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolRegistry {
    tools: Arc<RwLock<BTreeMap<String, ToolDefinition>>>,
}

impl InMemoryToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the given tools.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::DuplicateTool`] when two tools share a
    /// name.
    pub fn with_tools(tools: impl IntoIterator<Item = ToolDefinition>) -> ToolRegistryResult<Self> {
        let registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Registers a tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::DuplicateTool`] when a tool with the same
    /// name is already registered.
    pub fn register(&self, tool: ToolDefinition) -> ToolRegistryResult<()> {
        let mut tools = self.tools.write().map_err(|err| {
            ToolRegistryError::storage(std::io::Error::other(err.to_string()))
        })?;

        if tools.contains_key(tool.name()) {
            return Err(ToolRegistryError::DuplicateTool(tool.name().to_owned()));
        }

        tools.insert(tool.name().to_owned(), tool);
        Ok(())
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn find_by_name(&self, name: &str) -> ToolRegistryResult<Option<ToolDefinition>> {
        let tools = self.tools.read().map_err(|err| {
            ToolRegistryError::storage(std::io::Error::other(err.to_string()))
        })?;
        Ok(tools.get(name).cloned())
    }

    fn list(&self) -> ToolRegistryResult<Vec<ToolDefinition>> {
        let tools = self.tools.read().map_err(|err| {
            ToolRegistryError::storage(std::io::Error::other(err.to_string()))
        })?;
        Ok(tools.values().cloned().collect())
    }
}
