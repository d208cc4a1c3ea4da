use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::date;
use super::user::UserSummary;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Newly created and not yet started.
    #[default]
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
}

/// Payload accepted by `POST /tasks`.
///
/// There is deliberately no owner field: the owner always comes from the
/// authenticated identity, and unknown keys such as `user` are dropped by serde.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// At most 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `pending` when omitted.
    #[serde(default)]
    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "date::deserialize_opt")]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Payload accepted by `PUT /tasks/{id}`. Only supplied fields change.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "date::deserialize_opt")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.expiration_date.is_none()
    }
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub expiration_date: Option<DateTime<Utc>>,
    /// Identifier of the owning user.
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `owner`, with a fresh id and timestamps.
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            expiration_date: input.expiration_date,
            user: owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the fields present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(expiration_date) = patch.expiration_date {
            self.expiration_date = Some(expiration_date);
        }
        self.updated_at = Utc::now();
    }
}

/// A task with its owner expanded, as returned by `GET /tasks/detail`.
///
/// `user` is `None` when the owner record no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub expiration_date: Option<DateTime<Utc>>,
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskDetail {
    pub fn new(task: Task, owner: Option<UserSummary>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            expiration_date: task.expiration_date,
            user: owner,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
            status: None,
            expiration_date: None,
        }
    }

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(input("Test Task"), owner);

        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user, owner);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut long_description = input("Valid Task");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_input_requires_string_title() {
        let missing = serde_json::from_value::<TaskInput>(json!({
            "description": "Probando crear una task",
            "expirationDate": "2022-02-10"
        }));
        assert!(missing.is_err());

        let wrong_type = serde_json::from_value::<TaskInput>(json!({
            "title": 123412,
            "expirationDate": "2022-02-10"
        }));
        assert!(wrong_type.is_err());
    }

    #[test]
    fn test_input_ignores_client_supplied_owner() {
        let parsed: TaskInput = serde_json::from_value(json!({
            "title": "Forged",
            "user": "61fc89c0c81cea97e75195ad",
            "status": "in_progress",
            "expirationDate": "2022-02-10"
        }))
        .unwrap();

        assert_eq!(parsed.status, Some(TaskStatus::InProgress));
        assert_eq!(
            parsed.expiration_date,
            Some(Utc.with_ymd_and_hms(2022, 2, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut task = Task::new(input("Llevar el auto a lavar"), Uuid::new_v4());
        let before = task.clone();

        let patch: TaskPatch = serde_json::from_value(json!({
            "description": "Antes de ir a lavar el auto, pasar por la panaderia"
        }))
        .unwrap();
        task.apply(&patch);

        assert_eq!(task.title, before.title);
        assert_eq!(task.status, before.status);
        assert_eq!(
            task.description.as_deref(),
            Some("Antes de ir a lavar el auto, pasar por la panaderia")
        );
        assert!(task.updated_at >= before.updated_at);
    }

    #[test]
    fn test_patch_rejects_wrong_types() {
        assert!(serde_json::from_value::<TaskPatch>(json!({ "description": 1231231 })).is_err());
        assert!(serde_json::from_value::<TaskPatch>(json!({ "status": "archived" })).is_err());
        assert!(serde_json::from_value::<TaskPatch>(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::new(input("Serialize me"), Uuid::new_v4());
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["status"], "pending");
        assert_eq!(value["user"], task.user.to_string());
        assert!(value.get("expirationDate").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
