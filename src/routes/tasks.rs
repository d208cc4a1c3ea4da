use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskPatch},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Task {} does not exist", id))
}

/// Lists every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, empty if there are none.
#[get("")]
pub async fn list_tasks(service: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    let tasks = service.find_all().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists every task with its owner expanded to `{id, email}`.
///
/// ## Responses:
/// - `200 OK`: JSON array of `TaskDetail` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("/detail")]
pub async fn list_tasks_with_user(
    service: web::Data<TaskService>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = service.find_all_with_user().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a task by id.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `400 Bad Request`: `id` is not a valid task id.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no task has this id.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    id: web::Path<String>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = service.find_by_id(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a task owned by the caller.
///
/// Any owner supplied in the body is ignored.
///
/// ## Responses:
/// - `200 OK`: the created `Task`.
/// - `400 Bad Request`: missing `title`, wrongly typed fields or failed validation.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    body: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = service.create(body.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task; only the fields present in the body change.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: malformed id or invalid field values.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no task has this id.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    id: web::Path<String>,
    body: web::Json<TaskPatch>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = service
        .update(&id, body.into_inner())
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task with id: <id> deleted."}`.
/// - `400 Bad Request`: malformed id.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no task has this id.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    id: web::Path<String>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    service.delete(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Task with id: {} deleted.", id.as_str())
    })))
}
