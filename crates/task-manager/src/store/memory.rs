//! In-Memory Task Store
//!
//! Process-lifetime storage behind an `RwLock`, insertion-ordered so
//! search results are deterministic. The default backend for tests
//! and single-process deployments.

use std::sync::RwLock;

use async_trait::async_trait;

use super::TaskStore;
use crate::error::Result;
use crate::model::{Task, TaskDraft, TaskFilter};

/// In-memory task store
pub struct InMemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, drafts: Vec<TaskDraft>) -> Result<Vec<Task>> {
        let created: Vec<Task> = drafts.into_iter().map(Task::from_draft).collect();

        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        tasks.extend(created.iter().cloned());
        tracing::debug!(count = created.len(), total = tasks.len(), "Tasks created");

        Ok(created)
    }

    async fn search(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
        Ok(tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignee, TaskStatus, TaskType};

    fn draft(code: &str, status: TaskStatus) -> TaskDraft {
        TaskDraft {
            code: code.into(),
            title: format!("Задача {code}"),
            assignee: Assignee::Developer,
            task_type: TaskType::Task,
            status,
            description: "описание".into(),
            subtasks_codes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = InMemoryTaskStore::new();

        let created = store
            .create(vec![draft("T1", TaskStatus::New), draft("T2", TaskStatus::New)])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_create_is_not_idempotent() {
        let store = InMemoryTaskStore::new();

        store.create(vec![draft("T1", TaskStatus::New)]).await.unwrap();
        store.create(vec![draft("T1", TaskStatus::New)]).await.unwrap();

        let all = store.search(&TaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_ne!(all[0].id, all[1].id);
    }

    #[tokio::test]
    async fn test_search_empty_filter_returns_all() {
        let store = InMemoryTaskStore::new();
        store
            .create(vec![
                draft("T1", TaskStatus::New),
                draft("T2", TaskStatus::Done),
                draft("T3", TaskStatus::Done),
            ])
            .await
            .unwrap();

        let all = store.search(&TaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        // Insertion order is preserved
        assert_eq!(all[0].code, "T1");
    }

    #[tokio::test]
    async fn test_search_by_status() {
        let store = InMemoryTaskStore::new();
        store
            .create(vec![
                draft("T1", TaskStatus::New),
                draft("T2", TaskStatus::Done),
            ])
            .await
            .unwrap();

        let done = store
            .search(&TaskFilter {
                status: Some(TaskStatus::Done),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].code, "T2");
    }

    #[tokio::test]
    async fn test_search_is_idempotent() {
        let store = InMemoryTaskStore::new();
        store.create(vec![draft("T1", TaskStatus::New)]).await.unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::New),
            ..Default::default()
        };
        let first = store.search(&filter).await.unwrap();
        let second = store.search(&filter).await.unwrap();

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
    }
}
