//! Application State

use std::sync::Arc;

use assistant_core::{LlmProvider, Orchestrator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The turn orchestrator (owns sessions, tools, provider wiring)
    pub orchestrator: Arc<Orchestrator>,

    /// LLM provider handle, kept for health reporting
    pub provider: Arc<dyn LlmProvider>,
}
