//! LLM Provider Abstraction
//!
//! Common interface for language-model backends. The provider is
//! stateless between calls: the full trimmed history and the tool
//! schemas are passed explicitly every time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tool::ToolSchema;
use crate::turn::{ToolCallRequest, Turn};

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_top_p() -> f32 {
    0.9
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from one model call: reply content plus zero or more
/// proposed tool calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text (may be empty when only tool calls are proposed)
    pub content: String,

    /// Structured actions the model wants executed
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// Whether the model proposed any actions
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Strategy trait for LLM providers.
///
/// Implement this trait to add support for new model backends; the
/// orchestrator works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from the conversation history with the
    /// given tools bound for function calling
    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.model, "gpt-4o-mini");
        assert_eq!(opts.temperature, 0.7);
        assert_eq!(opts.max_tokens, 2048);
    }

    #[test]
    fn test_completion_tool_call_flag() {
        let completion = Completion {
            content: "done".into(),
            tool_calls: Vec::new(),
            model: "gpt-4o-mini".into(),
            usage: None,
        };
        assert!(!completion.has_tool_calls());
    }
}
