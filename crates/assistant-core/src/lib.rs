//! # assistant-core
//!
//! Conversational tool-orchestration core: turns one inbound message
//! into zero or more validated tool calls, executes them, and folds
//! the results back into a reply while preserving per-conversation
//! memory.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Orchestrator                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ SessionStore │  │ ToolExecutor │  │   LlmProvider     │  │
//! │  │ (per-chat    │──│ (registry +  │──│   (Strategy)      │  │
//! │  │  history)    │  │  validation) │  │                   │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping model backends without
//! changing orchestration logic; tools plug in through the `Tool`
//! trait and a fixed startup registry.

pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod provider;
pub mod session;
pub mod tool;
pub mod turn;

pub use error::{AssistantError, Result};
pub use executor::ToolExecutor;
pub use orchestrator::{
    Inbound, Orchestrator, OrchestratorConfig, Reply, APOLOGY_REPLY, EMPTY_COMPLETION_REPLY,
};
pub use provider::{Completion, GenerationOptions, LlmProvider, TokenUsage};
pub use session::{Session, SessionId, SessionStore};
pub use tool::{ParameterSchema, Tool, ToolRegistry, ToolResult, ToolSchema, Violation};
pub use turn::{History, Role, ToolCallRequest, Turn};
