//! Generic task-tracking record, unrelated to the donation flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{TaskId, UserId};

/// Validation errors for task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    /// Title was missing or blank.
    #[error("title is required")]
    MissingTitle,
    /// Description was missing or blank.
    #[error("description is required")]
    MissingDescription,
}

/// Task record, ownership-gated CRUD only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Owning user (weak back-reference).
    pub user: UserId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating or updating a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
}

impl TaskDraft {
    /// Validate required fields.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::MissingTitle);
        }
        if self.description.trim().is_empty() {
            return Err(TaskValidationError::MissingDescription);
        }
        Ok(())
    }
}

impl Task {
    /// Create a task owned by `user`.
    pub fn create(
        user: UserId,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        draft.validate()?;
        Ok(Self {
            id: TaskId::random(),
            user,
            title: draft.title,
            description: draft.description,
            deadline: draft.deadline,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields.
    pub fn apply_draft(
        &mut self,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<(), TaskValidationError> {
        draft.validate()?;
        self.title = draft.title;
        self.description = draft.description;
        self.deadline = draft.deadline;
        self.updated_at = now;
        Ok(())
    }
}
