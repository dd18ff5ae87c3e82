//! Function tool definitions.

use super::ToolDomainError;
use crate::depends::services::Injected;
use serde_json::{Value, json};

/// A named, described function whose arguments are validated on every call.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    name: String,
    description: String,
    function: Injected,
}

impl ToolDefinition {
    /// Creates a tool definition.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError`] when name or description is empty after
    /// trimming.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        function: Injected,
    ) -> Result<Self, ToolDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolDomainError::EmptyToolName);
        }

        let normalized_description = description.into().trim().to_owned();
        if normalized_description.is_empty() {
            return Err(ToolDomainError::EmptyToolDescription);
        }

        Ok(Self {
            name: normalized_name,
            description: normalized_description,
            function,
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the injected function.
    #[must_use]
    pub const fn function(&self) -> &Injected {
        &self.function
    }

    /// Returns the JSON Schema of the keyword arguments the tool accepts.
    #[must_use]
    pub fn parameters_schema(&self) -> Value {
        self.function.schema().parameters_json_schema()
    }

    /// Returns the function descriptor advertised to a model.
    #[must_use]
    pub fn descriptor(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters_schema(),
        })
    }
}
