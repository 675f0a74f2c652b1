//! Task Domain Models
//!
//! Tasks carry their user-facing field values in Russian (the closed
//! enumerations below) because that is what both the model and the
//! users of the original system speak; the wire format uses those
//! values verbatim via serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a task is assigned to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assignee {
    #[serde(rename = "Аналитик")]
    Analyst,
    #[serde(rename = "Разработчик")]
    Developer,
    #[serde(rename = "Тестировщик")]
    Tester,
}

impl Assignee {
    pub const VALUES: [&'static str; 3] = ["Аналитик", "Разработчик", "Тестировщик"];
}

impl std::fmt::Display for Assignee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assignee::Analyst => write!(f, "Аналитик"),
            Assignee::Developer => write!(f, "Разработчик"),
            Assignee::Tester => write!(f, "Тестировщик"),
        }
    }
}

/// Task granularity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Epic,
    Story,
    Task,
}

impl TaskType {
    pub const VALUES: [&'static str; 3] = ["Epic", "Story", "Task"];
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::Epic => write!(f, "Epic"),
            TaskType::Story => write!(f, "Story"),
            TaskType::Task => write!(f, "Task"),
        }
    }
}

/// Task lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Новый")]
    New,
    #[serde(rename = "В работе")]
    InProgress,
    #[serde(rename = "Завершен")]
    Done,
    #[serde(rename = "Отменен")]
    Cancelled,
}

impl TaskStatus {
    pub const VALUES: [&'static str; 4] = ["Новый", "В работе", "Завершен", "Отменен"];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::New => write!(f, "Новый"),
            TaskStatus::InProgress => write!(f, "В работе"),
            TaskStatus::Done => write!(f, "Завершен"),
            TaskStatus::Cancelled => write!(f, "Отменен"),
        }
    }
}

/// A task as proposed by the model, before the store assigns identity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Short per-conversation code (e.g. "T1")
    pub code: String,

    /// One-line summary
    pub title: String,

    /// Who works on it
    pub assignee: Assignee,

    /// Granularity
    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Lifecycle status
    pub status: TaskStatus,

    /// Full description, links included
    pub description: String,

    /// Codes of tasks that are subtasks of this one
    #[serde(default)]
    pub subtasks_codes: Vec<String>,
}

/// A stored task record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// Generated identifier
    pub id: Uuid,

    pub code: String,
    pub title: String,
    pub assignee: Assignee,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub description: String,
    #[serde(default)]
    pub subtasks_codes: Vec<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Materialize a draft: assign identity and creation time
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: draft.code,
            title: draft.title,
            assignee: draft.assignee,
            task_type: draft.task_type,
            status: draft.status,
            description: draft.description,
            subtasks_codes: draft.subtasks_codes,
            created_at: Utc::now(),
        }
    }
}

/// Partial-match filter: every supplied field must match; an empty
/// filter matches every task.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.title.is_none()
            && self.assignee.is_none()
            && self.task_type.is_none()
            && self.status.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.code.as_ref().is_none_or(|c| &task.code == c)
            && self.title.as_ref().is_none_or(|t| &task.title == t)
            && self.assignee.is_none_or(|a| task.assignee == a)
            && self.task_type.is_none_or(|t| task.task_type == t)
            && self.status.is_none_or(|s| task.status == s)
    }
}
