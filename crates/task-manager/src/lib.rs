//! # task-manager
//!
//! Task domain for the assistant: the task model with its closed
//! enumerations, the `TaskStore` persistence contract, and the two
//! registry tools (`createTasks`, `searchTasks`) the orchestrator
//! exposes to the model.

pub mod error;
pub mod model;
pub mod store;
pub mod tools;

pub use error::{Result, TaskError};
pub use model::{Assignee, Task, TaskDraft, TaskFilter, TaskStatus, TaskType};
pub use store::{InMemoryTaskStore, TaskStore};
pub use tools::{CreateTasksTool, SearchTasksTool};

use std::sync::Arc;

use assistant_core::ToolRegistry;

/// Build the registry with the task tools bound to the given store
pub fn task_registry(store: Arc<dyn TaskStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CreateTasksTool::new(store.clone()));
    registry.register(SearchTasksTool::new(store));
    registry
}
