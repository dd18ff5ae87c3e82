//! Tool calls requested by a model.

use super::ToolDomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Identifier correlating a tool call with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCallId(String);

impl ToolCallId {
    /// Creates an identifier from a provider-supplied value.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError::EmptyCallId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ToolDomainError::EmptyCallId);
        }
        Ok(Self(normalized))
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("call-{}", Uuid::new_v4()))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ToolCallId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolCallId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A model's request to run one tool.
///
/// `arguments` is the raw JSON text produced by the model; it is only parsed
/// when the call is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    id: ToolCallId,
    name: String,
    arguments: String,
}

impl ToolCall {
    /// Creates a tool call.
    #[must_use]
    pub fn new(id: ToolCallId, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Creates a tool call with a generated identifier.
    #[must_use]
    pub fn generated(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::new(ToolCallId::generate(), name, arguments)
    }

    /// Returns the call identifier.
    #[must_use]
    pub const fn id(&self) -> &ToolCallId {
        &self.id
    }

    /// Returns the requested tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw argument text.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Parses the argument text into a keyword mapping.
    ///
    /// Blank text is read as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError::MalformedArguments`] for invalid JSON and
    /// [`ToolDomainError::ArgumentsNotObject`] for JSON that is not an
    /// object.
    pub fn parse_arguments(&self) -> Result<Map<String, Value>, ToolDomainError> {
        if self.arguments.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&self.arguments) {
            Ok(Value::Object(keyword)) => Ok(keyword),
            Ok(other) => Err(ToolDomainError::ArgumentsNotObject(json_kind(&other).to_owned())),
            Err(err) => Err(ToolDomainError::MalformedArguments(err.to_string())),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
