use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{Task, TaskDetail, TaskPatch, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    tasks: Vec<Task>,
}

/// Process-local store. Insertion order is preserved, matching the
/// `created_at` ordering of the Postgres adapter.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.clone())
    }

    async fn list_with_owner(&self) -> Result<Vec<TaskDetail>, StoreError> {
        let inner = self.inner.read().await;
        let details = inner
            .tasks
            .iter()
            .map(|task| {
                let owner = inner
                    .users
                    .iter()
                    .find(|user| user.id == task.user)
                    .map(User::summary);
                TaskDetail::new(task.clone(), owner)
            })
            .collect();
        Ok(details)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().find(|task| task.id == id).cloned())
    }

    async fn insert(&self, task: Task) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.users.iter().any(|user| user.id == task.user) {
            return Err(StoreError::Conflict("Task owner does not exist".into()));
        }
        if inner.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(StoreError::Conflict(format!("Task {} already exists", task.id)));
        }
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .map(|task| {
                task.apply(patch);
                task.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .tasks
            .iter()
            .position(|task| task.id == id)
            .map(|index| inner.tasks.remove(index)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|user| user.id == id).cloned())
    }
}
