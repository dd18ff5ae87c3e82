//! Domain model for function tools and their executions.

mod call;
mod definition;
mod error;
mod outcome;

pub use call::{ToolCall, ToolCallId};
pub use definition::ToolDefinition;
pub use error::ToolDomainError;
pub use outcome::{ToolExecutionRecord, ToolExecutionStatus, ToolOutcome};
