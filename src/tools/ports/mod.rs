//! Port contracts for tool lookup and execution.

mod executor;
mod registry;

pub use executor::{ToolError, ToolExecutor, ToolExecutorResult};
pub use registry::{ToolRegistry, ToolRegistryError, ToolRegistryResult};
