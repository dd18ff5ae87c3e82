//! Execution port consumed by agent turns.

use super::ToolRegistryError;
use crate::tools::domain::{ToolCall, ToolOutcome};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Result type for tool execution.
pub type ToolExecutorResult<T> = Result<T, ToolError>;

/// Runs tool calls requested by a model.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Executes one tool call.
    ///
    /// Problems the model can fix (unknown tool, malformed or invalid
    /// arguments, a failing tool body) are reported as an error
    /// [`ToolOutcome`], not as `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the tools themselves cannot be reached.
    async fn execute(&self, call: &ToolCall) -> ToolExecutorResult<ToolOutcome>;

    /// Returns the function descriptors of every available tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the tools cannot be listed.
    fn describe_tools(&self) -> ToolExecutorResult<Vec<Value>>;
}

/// Infrastructure failures while executing tools.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// The registry could not be read.
    #[error(transparent)]
    Registry(#[from] ToolRegistryError),
}
