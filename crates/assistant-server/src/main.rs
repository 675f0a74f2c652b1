//! Assistant HTTP Server
//!
//! Axum-based adapter wiring the orchestration core to the outside:
//! provider from environment, in-memory task store, the task tools
//! registered once at startup.

mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assistant_core::{GenerationOptions, LlmProvider, Orchestrator, OrchestratorConfig};
use assistant_runtime::OpenAiProvider;
use task_manager::{task_registry, InMemoryTaskStore, TaskStore};

use crate::handlers::{chat_handler, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider = Arc::new(OpenAiProvider::from_env()?);

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to model endpoint"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Model endpoint not reachable - replies will degrade");
        }
    }

    // Initialize the task store and its tools
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    let registry = Arc::new(task_registry(store));

    tracing::info!("Registered {} tools:", registry.len());
    for name in registry.names() {
        tracing::info!("  • {}", name);
    }

    let config = OrchestratorConfig {
        generation: GenerationOptions {
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            ..Default::default()
        },
        model_timeout: Some(Duration::from_secs(60)),
        ..Default::default()
    };

    let orchestrator = Arc::new(Orchestrator::new(provider.clone(), registry, config));

    let state = AppState {
        orchestrator,
        provider,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 assistant-server running on http://{}", addr);
    tracing::info!("  GET  /health    - Health check");
    tracing::info!("  POST /api/chat  - Send a message");

    axum::serve(listener, app).await?;

    Ok(())
}
