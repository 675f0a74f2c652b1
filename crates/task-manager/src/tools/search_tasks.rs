//! Search-Tasks Tool
//!
//! Finds stored tasks matching every supplied filter field; with no
//! fields supplied it lists everything.

use std::sync::Arc;

use assistant_core::{ParameterSchema, Result as CoreResult, Tool, ToolSchema};
use async_trait::async_trait;

use super::enum_values;
use crate::model::{Assignee, TaskFilter, TaskStatus, TaskType};
use crate::store::TaskStore;

/// Tool for searching tasks in the store
pub struct SearchTasksTool {
    store: Arc<dyn TaskStore>,
}

impl SearchTasksTool {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SearchTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "searchTasks".into(),
            description:
                "Ищет задачи в БД. Все поля фильтра необязательны; без фильтра возвращает все задачи"
                    .into(),
            parameters: vec![
                ParameterSchema::new("code", "string", "Кодовое название задачи"),
                ParameterSchema::new("title", "string", "Наименование задачи"),
                ParameterSchema::new("assignee", "string", "Исполнитель задачи")
                    .with_enum(enum_values(&Assignee::VALUES)),
                ParameterSchema::new("type", "string", "Тип задачи")
                    .with_enum(enum_values(&TaskType::VALUES)),
                ParameterSchema::new("status", "string", "Статус задачи")
                    .with_enum(enum_values(&TaskStatus::VALUES)),
            ],
        }
    }

    async fn execute(&self, arguments: &serde_json::Value) -> CoreResult<String> {
        let filter: TaskFilter = serde_json::from_value(arguments.clone()).map_err(|e| {
            assistant_core::AssistantError::ToolExecution(format!("malformed filter: {e}"))
        })?;

        let found = self.store.search(&filter).await?;
        tracing::debug!(count = found.len(), "Task search");

        if found.is_empty() {
            return Ok("Задачи не найдены".into());
        }

        let mut output = format!("Найдено задач: {}", found.len());
        for task in &found {
            output.push_str(&format!(
                "\n{} - \"{}\" [{}, {}, {}]",
                task.code, task.title, task.task_type, task.assignee, task.status
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDraft;
    use crate::store::InMemoryTaskStore;
    use serde_json::json;

    async fn seeded_tool() -> SearchTasksTool {
        let store = Arc::new(InMemoryTaskStore::new());
        store
            .create(vec![
                TaskDraft {
                    code: "T1".into(),
                    title: "Анализ".into(),
                    assignee: Assignee::Analyst,
                    task_type: TaskType::Story,
                    status: TaskStatus::Done,
                    description: "d".into(),
                    subtasks_codes: Vec::new(),
                },
                TaskDraft {
                    code: "T2".into(),
                    title: "Разработка".into(),
                    assignee: Assignee::Developer,
                    task_type: TaskType::Task,
                    status: TaskStatus::New,
                    description: "d".into(),
                    subtasks_codes: Vec::new(),
                },
            ])
            .await
            .unwrap();
        SearchTasksTool::new(store)
    }

    #[tokio::test]
    async fn test_empty_filter_lists_all() {
        let tool = seeded_tool().await;

        let output = tool.execute(&json!({})).await.unwrap();

        assert!(output.contains("Найдено задач: 2"));
        assert!(output.contains("T1"));
        assert!(output.contains("T2"));
    }

    #[tokio::test]
    async fn test_status_filter_narrows_results() {
        let tool = seeded_tool().await;

        let output = tool.execute(&json!({"status": "Завершен"})).await.unwrap();

        assert!(output.contains("T1"));
        assert!(!output.contains("T2"));
    }

    #[tokio::test]
    async fn test_no_match_reports_nothing_found() {
        let tool = seeded_tool().await;

        let output = tool.execute(&json!({"code": "T99"})).await.unwrap();
        assert_eq!(output, "Задачи не найдены");
    }
}
