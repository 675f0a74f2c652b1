//! # assistant-runtime
//!
//! Concrete model providers for the assistant core.
//!
//! ## Providers
//!
//! - **OpenAI** (default): any OpenAI-compatible chat-completions
//!   endpoint with function calling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use assistant_runtime::OpenAiProvider;
//!
//! let provider = Arc::new(OpenAiProvider::from_env()?);
//! let orchestrator = Orchestrator::with_defaults(provider, registry);
//! ```

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use assistant_core::{
    AssistantError, Completion, GenerationOptions, LlmProvider, Orchestrator, Result, Tool,
    ToolRegistry, Turn,
};
