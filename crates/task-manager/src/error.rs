//! Error Types for the Task Domain

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskError>;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TaskError> for assistant_core::AssistantError {
    fn from(err: TaskError) -> Self {
        assistant_core::AssistantError::ToolExecution(err.to_string())
    }
}
