//! Error Types

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Assistant error types
#[derive(Error, Debug)]
pub enum AssistantError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Tool not found in registry
    #[error("unknown tool: {0}")]
    ToolNotFound(String),

    /// Tool arguments failed schema validation
    #[error("invalid arguments: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AssistantError {
    /// Render the fault the way the chat user sees it.
    ///
    /// Tool faults keep their diagnostic text so the model and the
    /// user can see which call failed and why; everything else is a
    /// model-side fault and degrades to the fixed apology.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::ToolNotFound(name) => format!("unknown tool: {name}"),
            AssistantError::ToolValidation(msg) => format!("invalid arguments: {msg}"),
            AssistantError::ToolExecution(msg) => format!("Error: {msg}"),
            _ => crate::orchestrator::APOLOGY_REPLY.into(),
        }
    }
}
