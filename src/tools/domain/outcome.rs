//! Results of executing tool calls.

use super::{ToolCall, ToolCallId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a tool call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolExecutionStatus {
    /// The tool ran and its result passed validation.
    Succeeded,
    /// The call was rejected before the tool ran: unknown tool, malformed
    /// arguments, or arguments that failed binding or validation.
    Rejected,
    /// The tool ran and failed, or its result failed validation.
    Failed,
}

impl ToolExecutionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ToolExecutionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Audit record of one tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionRecord {
    call_id: ToolCallId,
    tool_name: String,
    status: ToolExecutionStatus,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl ToolExecutionRecord {
    /// Creates an execution record.
    #[must_use]
    pub fn new(
        call: &ToolCall,
        status: ToolExecutionStatus,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            call_id: call.id().clone(),
            tool_name: call.name().to_owned(),
            status,
            started_at,
            finished_at,
        }
    }

    /// Returns the call identifier.
    #[must_use]
    pub const fn call_id(&self) -> &ToolCallId {
        &self.call_id
    }

    /// Returns the requested tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the final status.
    #[must_use]
    pub const fn status(&self) -> ToolExecutionStatus {
        self.status
    }

    /// Returns when execution started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when execution finished.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}

/// Outcome of one tool call, ready to be returned to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    content: String,
    is_error: bool,
    record: ToolExecutionRecord,
}

impl ToolOutcome {
    /// Creates an outcome from its content and execution record.
    ///
    /// The outcome is an error unless the record status is
    /// [`ToolExecutionStatus::Succeeded`].
    #[must_use]
    pub fn new(content: impl Into<String>, record: ToolExecutionRecord) -> Self {
        Self {
            content: content.into(),
            is_error: record.status() != ToolExecutionStatus::Succeeded,
            record,
        }
    }

    /// Returns the call identifier.
    #[must_use]
    pub const fn call_id(&self) -> &ToolCallId {
        self.record.call_id()
    }

    /// Returns the requested tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        self.record.tool_name()
    }

    /// Returns the result text, or the error message on failure.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns `true` when the call did not succeed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// Returns the execution record.
    #[must_use]
    pub const fn record(&self) -> &ToolExecutionRecord {
        &self.record
    }
}
