//! Error types for tool domain validation.

use thiserror::Error;

/// Errors returned while constructing tool domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolDomainError {
    /// The tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// The tool description is empty after trimming.
    #[error("tool description must not be empty")]
    EmptyToolDescription,

    /// The tool call identifier is empty after trimming.
    #[error("tool call identifier must not be empty")]
    EmptyCallId,

    /// Tool arguments are not valid JSON.
    #[error("tool arguments are not valid JSON: {0}")]
    MalformedArguments(String),

    /// Tool arguments are valid JSON but not an object.
    #[error("tool arguments must be a JSON object, got {0}")]
    ArgumentsNotObject(String),
}
