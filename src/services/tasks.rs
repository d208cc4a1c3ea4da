use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskDetail, TaskInput, TaskPatch};
use crate::store::TaskStore;

/// Task persistence service used by the task routes.
///
/// Lookups by id take the raw path segment. A segment that is not a UUID is
/// rejected with `AppError::BadRequest` before the store is queried, while a
/// well-formed id with no matching task yields `Ok(None)`; the routes turn
/// the latter into a 404.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.store.list().await?)
    }

    pub async fn find_all_with_user(&self) -> Result<Vec<TaskDetail>, AppError> {
        Ok(self.store.list_with_owner().await?)
    }

    pub async fn find_by_id(&self, raw_id: &str) -> Result<Option<Task>, AppError> {
        let id = parse_task_id(raw_id)?;
        Ok(self.store.find(id).await?)
    }

    /// Validates `input` and stores it as a new task owned by `owner`.
    pub async fn create(&self, input: TaskInput, owner: Uuid) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.store.insert(Task::new(input, owner)).await?;
        log::debug!("created task {} for user {}", task.id, owner);
        Ok(task)
    }

    pub async fn update(&self, raw_id: &str, patch: TaskPatch) -> Result<Option<Task>, AppError> {
        let id = parse_task_id(raw_id)?;
        patch.validate()?;
        let task = self.store.update(id, &patch).await?;
        if task.is_some() {
            log::debug!("updated task {}", id);
        }
        Ok(task)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<Option<Task>, AppError> {
        let id = parse_task_id(raw_id)?;
        let task = self.store.delete(id).await?;
        if task.is_some() {
            log::debug!("deleted task {}", id);
        }
        Ok(task)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store
            .ping()
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))
    }
}

fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Malformed task id: {}", raw)))
}
