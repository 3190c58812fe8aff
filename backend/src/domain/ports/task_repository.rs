//! Persistence port for task records.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use thiserror::Error;

use crate::domain::id::{TaskId, UserId};
use crate::domain::task::Task;

/// Errors surfaced by the task persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskRepositoryError {
    /// The targeted record no longer exists.
    #[error("task record is missing")]
    Missing,
    /// Storage-level failure bubbling up from the adapter.
    #[error("task storage failed: {message}")]
    Storage {
        /// Adapter-provided description.
        message: String,
    },
}

impl TaskRepositoryError {
    /// Helper for adapter storage failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Store operations over task records.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task.
    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Fetch a task by id.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Replace a stored task; fails with [`TaskRepositoryError::Missing`]
    /// when the record vanished.
    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Remove a task. Returns whether a record was deleted.
    async fn delete(&self, id: TaskId) -> Result<bool, TaskRepositoryError>;

    /// Tasks owned by `user`, newest first.
    async fn list_for_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<Task>, TaskRepositoryError>;
}
