//! Create-Tasks Tool
//!
//! Persists a batch of tasks proposed by the model.

use std::sync::Arc;

use assistant_core::{ParameterSchema, Result as CoreResult, Tool, ToolSchema};
use async_trait::async_trait;

use super::task_object_schema;
use crate::model::TaskDraft;
use crate::store::TaskStore;

/// Tool for creating new tasks in the store
pub struct CreateTasksTool {
    store: Arc<dyn TaskStore>,
}

impl CreateTasksTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CreateTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "createTasks".into(),
            description: "Создаёт новые задачи и сохраняет их в БД".into(),
            parameters: vec![
                ParameterSchema::new("tasks", "array", "Список задач для создания")
                    .required()
                    .with_min_items(1)
                    .with_items(task_object_schema()),
            ],
        }
    }

    async fn execute(&self, arguments: &serde_json::Value) -> CoreResult<String> {
        let drafts: Vec<TaskDraft> =
            serde_json::from_value(arguments["tasks"].clone()).map_err(|e| {
                assistant_core::AssistantError::ToolExecution(format!(
                    "malformed task payload: {e}"
                ))
            })?;

        let created = self.store.create(drafts).await?;
        tracing::info!(count = created.len(), "Created tasks");

        let listing: Vec<String> = created
            .iter()
            .map(|t| format!("{} - \"{}\"", t.code, t.title))
            .collect();

        Ok(format!("✅ Созданы задачи: {}", listing.join(", ")))
    }
}
