//! Tool Executor
//!
//! Validates one tool-call request against its schema and runs it,
//! isolating faults: lookup, validation, and execution failures all
//! degrade to failure results so sibling requests from the same model
//! response still run and report.

use std::sync::Arc;

use crate::error::AssistantError;
use crate::tool::{ToolRegistry, ToolResult};
use crate::turn::ToolCallRequest;

/// Executes tool-call requests against the registry
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry backing this executor
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one request: look up, validate, execute.
    ///
    /// Infallible from the caller's point of view; every fault becomes
    /// a failure result so each request yields exactly one result.
    pub async fn run(&self, call: &ToolCallRequest) -> ToolResult {
        let Some(tool) = self.registry.get(&call.name) else {
            tracing::warn!(tool = %call.name, call_id = %call.id, "Unknown tool requested");
            let fault = AssistantError::ToolNotFound(call.name.clone());
            return ToolResult::failure(&call.name, &call.id, fault.user_message());
        };

        let violations = tool.schema().validate(&call.arguments);
        if !violations.is_empty() {
            let listing: Vec<String> = violations.iter().map(ToString::to_string).collect();
            tracing::warn!(
                tool = %call.name,
                call_id = %call.id,
                violations = violations.len(),
                "Tool arguments failed validation"
            );
            let fault = AssistantError::ToolValidation(listing.join("; "));
            return ToolResult::failure(&call.name, &call.id, fault.user_message());
        }

        match tool.execute(&call.arguments).await {
            Ok(output) => ToolResult::success(&call.name, &call.id, output),
            Err(e) => {
                tracing::error!(tool = %call.name, call_id = %call.id, error = %e, "Tool execution failed");
                let fault = match e {
                    e @ AssistantError::ToolExecution(_) => e,
                    other => AssistantError::ToolExecution(other.to_string()),
                };
                ToolResult::failure(&call.name, &call.id, fault.user_message())
            }
        }
    }
}
