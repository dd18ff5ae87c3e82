//! Service executing model-requested tool calls through injected functions.

use crate::depends::{domain::CallArgs, domain::InjectError};
use crate::tools::{
    domain::{ToolCall, ToolDefinition, ToolExecutionRecord, ToolExecutionStatus, ToolOutcome},
    ports::{ToolExecutor, ToolExecutorResult, ToolRegistry},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// Tool execution service backed by a [`ToolRegistry`].
///
/// Arguments are passed to the tool as keyword arguments. Streaming tools are
/// drained and their items returned as a JSON array.
#[derive(Clone)]
pub struct ToolExecutionService<R, C>
where
    R: ToolRegistry,
    C: Clock + Send + Sync,
{
    registry: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ToolExecutionService<R, C>
where
    R: ToolRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a new execution service.
    #[must_use]
    pub const fn new(registry: Arc<R>, clock: Arc<C>) -> Self {
        Self { registry, clock }
    }

    async fn run(
        call: &ToolCall,
        tool: &ToolDefinition,
    ) -> Result<Value, (ToolExecutionStatus, String)> {
        let keyword = call
            .parse_arguments()
            .map_err(|err| (ToolExecutionStatus::Rejected, err.to_string()))?;
        let invocation = tool
            .function()
            .invoke(CallArgs::from_keyword(keyword))
            .map_err(|err| classify(&err))?;
        invocation.into_value().await.map_err(|err| classify(&err))
    }

    fn finish(
        &self,
        call: &ToolCall,
        status: ToolExecutionStatus,
        content: String,
        started_at: DateTime<Utc>,
    ) -> ToolOutcome {
        if status != ToolExecutionStatus::Succeeded {
            tracing::debug!(
                tool = call.name(),
                call_id = %call.id(),
                %status,
                reason = content.as_str(),
                "tool call did not succeed"
            );
        }
        let record = ToolExecutionRecord::new(call, status, started_at, self.clock.utc());
        ToolOutcome::new(content, record)
    }
}

#[async_trait]
impl<R, C> ToolExecutor for ToolExecutionService<R, C>
where
    R: ToolRegistry,
    C: Clock + Send + Sync,
{
    async fn execute(&self, call: &ToolCall) -> ToolExecutorResult<ToolOutcome> {
        let started_at = self.clock.utc();
        let Some(tool) = self.registry.find_by_name(call.name())? else {
            let message = format!("unknown tool '{}'", call.name());
            return Ok(self.finish(call, ToolExecutionStatus::Rejected, message, started_at));
        };

        let outcome = match Self::run(call, &tool).await {
            Ok(value) => {
                self.finish(call, ToolExecutionStatus::Succeeded, render(value), started_at)
            }
            Err((status, message)) => self.finish(call, status, message, started_at),
        };
        Ok(outcome)
    }

    fn describe_tools(&self) -> ToolExecutorResult<Vec<Value>> {
        Ok(self
            .registry
            .list()?
            .iter()
            .map(ToolDefinition::descriptor)
            .collect())
    }
}

/// Errors raised before the body ran are the model's to fix; the rest are
/// failures of the tool itself.
fn classify(err: &InjectError) -> (ToolExecutionStatus, String) {
    let status = match err {
        InjectError::Bind(_) => ToolExecutionStatus::Rejected,
        InjectError::Validation(validation) if !validation.is_return_value() => {
            ToolExecutionStatus::Rejected
        }
        InjectError::Validation(_)
        | InjectError::Invocation(_)
        | InjectError::NatureMismatch { .. } => ToolExecutionStatus::Failed,
    };
    (status, err.to_string())
}

fn render(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
