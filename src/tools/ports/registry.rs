//! Lookup port for registered tools.

use crate::tools::domain::ToolDefinition;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tool registry operations.
pub type ToolRegistryResult<T> = Result<T, ToolRegistryError>;

/// Lookup contract for tool definitions.
pub trait ToolRegistry: Send + Sync {
    /// Finds a tool by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError`] when the backing store cannot be read.
    fn find_by_name(&self, name: &str) -> ToolRegistryResult<Option<ToolDefinition>>;

    /// Returns every registered tool, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError`] when the backing store cannot be read.
    fn list(&self) -> ToolRegistryResult<Vec<ToolDefinition>>;
}

/// Errors returned by tool registry implementations.
#[derive(Debug, Clone, Error)]
pub enum ToolRegistryError {
    /// A tool with the same name is already registered.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Backing store failure.
    #[error("tool registry storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ToolRegistryError {
    /// Wraps a backing store failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
