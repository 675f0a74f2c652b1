//! Task Store Contract
//!
//! The persistence collaborator holding task records. The core only
//! ever sees this contract; the on-disk format (or lack of one) is an
//! implementation concern of each store.

mod memory;

pub use memory::InMemoryTaskStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Task, TaskDraft, TaskFilter};

/// Task store trait (Strategy pattern)
///
/// Implement this for each backend: in-memory, SQLite, Postgres, etc.
/// Each call is assumed atomic; there are no cross-call transactions.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist drafts, assigning each a generated identifier.
    /// Deliberately not idempotent: submitting the same drafts twice
    /// creates two sets of records.
    async fn create(&self, drafts: Vec<TaskDraft>) -> Result<Vec<Task>>;

    /// Return every task matching all supplied filter fields; an empty
    /// filter returns all tasks.
    async fn search(&self, filter: &TaskFilter) -> Result<Vec<Task>>;
}
