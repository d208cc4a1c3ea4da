//! Persistence ports.
//!
//! `TaskStore` and `UserStore` describe what the services need from a
//! backend. Two adapters implement both: [`PgStore`] for Postgres and
//! [`MemoryStore`] for running without a database.
//!
//! Identifiers arrive here already parsed; deciding whether a raw path
//! segment is a well-formed id is the service layer's job.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{Task, TaskDetail, TaskPatch, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures reported by store adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The write violates a uniqueness or reference constraint.
    Conflict(String),
    /// Connectivity, query or decoding failures.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "store conflict: {}", msg),
            StoreError::Backend(msg) => write!(f, "store failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return StoreError::Conflict(match db_error.constraint() {
                    Some("users_email_key") => "Email already registered".to_string(),
                    _ => db_error.message().to_string(),
                });
            }
            if db_error.is_foreign_key_violation() {
                return StoreError::Conflict("Task owner does not exist".to_string());
            }
            if db_error.is_check_violation() {
                return StoreError::Conflict(db_error.message().to_string());
            }
        }
        StoreError::Backend(error.to_string())
    }
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every task, oldest first.
    async fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// Every task with its owner expanded, oldest first.
    async fn list_with_owner(&self) -> Result<Vec<TaskDetail>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn insert(&self, task: Task) -> Result<Task, StoreError>;

    /// Applies `patch` to the task, returning `None` if it does not exist.
    async fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, StoreError>;

    /// Removes the task, returning what was removed.
    async fn delete(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}
