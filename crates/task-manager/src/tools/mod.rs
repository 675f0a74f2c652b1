//! Registry Tools
//!
//! The fixed set of operations the orchestrator exposes to the model
//! for the task domain. Each tool holds the store collaborator behind
//! an `Arc` and maps validated arguments to a text payload.

mod create_tasks;
mod search_tasks;

pub use create_tasks::CreateTasksTool;
pub use search_tasks::SearchTasksTool;

use assistant_core::ParameterSchema;
use serde_json::json;

use crate::model::{Assignee, TaskStatus, TaskType};

fn enum_values(values: &[&str]) -> Vec<serde_json::Value> {
    values.iter().map(|v| json!(v)).collect()
}

/// Schema for one task object, shared by the tools
pub(crate) fn task_object_schema() -> ParameterSchema {
    ParameterSchema::new("task", "object", "Одна задача").with_properties(vec![
        ParameterSchema::new("code", "string", "Кодовое название задачи")
            .required()
            .with_min_length(1),
        ParameterSchema::new("title", "string", "Наименование задачи")
            .required()
            .with_min_length(1),
        ParameterSchema::new("assignee", "string", "Исполнитель задачи")
            .required()
            .with_enum(enum_values(&Assignee::VALUES)),
        ParameterSchema::new("type", "string", "Тип задачи")
            .required()
            .with_enum(enum_values(&TaskType::VALUES)),
        ParameterSchema::new("status", "string", "Статус задачи")
            .required()
            .with_enum(enum_values(&TaskStatus::VALUES)),
        ParameterSchema::new("description", "string", "Описание задачи со ссылками")
            .required()
            .with_min_length(1),
        ParameterSchema::new(
            "subtasks_codes",
            "array",
            "Список кодов задач, которые являются подзадачами текущей задачи",
        )
        .with_items(ParameterSchema::new("code", "string", "Код подзадачи")),
    ])
}
