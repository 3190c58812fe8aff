//! Task service: ownership-scoped CRUD.

use std::sync::Arc;

use chrono::Utc;
use pagination::{Page, PageRequest};

use super::error::Error;
use super::id::{TaskId, UserId};
use super::policy;
use super::ports::{TaskRepository, TaskRepositoryError};
use super::task::{Task, TaskDraft};

/// Driving service for task operations.
pub struct TasksService {
    tasks: Arc<dyn TaskRepository>,
}

impl TasksService {
    /// Create a service over the task store.
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    fn map_store_error(error: TaskRepositoryError) -> Error {
        match error {
            TaskRepositoryError::Missing => Error::not_found("task not found"),
            TaskRepositoryError::Storage { message } => {
                Error::internal(format!("task store failed: {message}"))
            }
        }
    }

    async fn fetch_owned(&self, id: TaskId, actor: UserId) -> Result<Task, Error> {
        let task = self
            .tasks
            .find_by_id(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("task not found"))?;
        policy::task_owned_by(&task, actor)?;
        Ok(task)
    }

    /// Create a task owned by `actor`.
    pub async fn create(&self, actor: UserId, draft: TaskDraft) -> Result<Task, Error> {
        let task = Task::create(actor, draft, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.tasks
            .insert(&task)
            .await
            .map_err(Self::map_store_error)?;
        Ok(task)
    }

    /// Fetch one owned task.
    pub async fn get(&self, id: TaskId, actor: UserId) -> Result<Task, Error> {
        self.fetch_owned(id, actor).await
    }

    /// The caller's tasks, newest first.
    pub async fn list(&self, actor: UserId, page: PageRequest) -> Result<Page<Task>, Error> {
        self.tasks
            .list_for_user(actor, page)
            .await
            .map_err(Self::map_store_error)
    }

    /// Replace the editable fields of an owned task.
    pub async fn edit(&self, id: TaskId, actor: UserId, draft: TaskDraft) -> Result<Task, Error> {
        let mut task = self.fetch_owned(id, actor).await?;
        task.apply_draft(draft, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.tasks
            .update(&task)
            .await
            .map_err(Self::map_store_error)?;
        Ok(task)
    }

    /// Delete an owned task.
    pub async fn delete(&self, id: TaskId, actor: UserId) -> Result<(), Error> {
        self.fetch_owned(id, actor).await?;
        let removed = self
            .tasks
            .delete(id)
            .await
            .map_err(Self::map_store_error)?;
        if !removed {
            return Err(Error::not_found("task not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::outbound::persistence::MemoryStore;
    use chrono::Duration;

    fn service() -> TasksService {
        TasksService::new(Arc::new(MemoryStore::new()) as Arc<dyn TaskRepository>)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: "pick up crates from the depot".into(),
            deadline: Utc::now() + Duration::days(3),
        }
    }

    #[actix_rt::test]
    async fn crud_round_trip_for_owner() {
        let svc = service();
        let owner = UserId::random();
        let task = svc.create(owner, draft("collect")).await.expect("create");

        let fetched = svc.get(task.id, owner).await.expect("get");
        assert_eq!(fetched.title, "collect");

        let edited = svc
            .edit(task.id, owner, draft("collect and sort"))
            .await
            .expect("edit");
        assert_eq!(edited.title, "collect and sort");

        svc.delete(task.id, owner).await.expect("delete");
        let err = svc.get(task.id, owner).await.expect_err("gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[actix_rt::test]
    async fn strangers_cannot_touch_tasks() {
        let svc = service();
        let owner = UserId::random();
        let task = svc.create(owner, draft("collect")).await.expect("create");

        let stranger = UserId::random();
        assert_eq!(
            svc.get(task.id, stranger).await.expect_err("get").code(),
            ErrorCode::Forbidden
        );
        assert_eq!(
            svc.delete(task.id, stranger)
                .await
                .expect_err("delete")
                .code(),
            ErrorCode::Forbidden
        );
    }

    #[actix_rt::test]
    async fn listing_is_scoped_to_owner() {
        let svc = service();
        let owner = UserId::random();
        svc.create(owner, draft("a")).await.expect("create");
        svc.create(UserId::random(), draft("b")).await.expect("create");

        let page = svc
            .list(owner, PageRequest::new(None, None).expect("page"))
            .await
            .expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "a");
    }
}
