//! Application services for tool execution.

mod execution;

pub use execution::ToolExecutionService;
