use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::services::TaskService;

/// Health check endpoint
///
/// Reports `ok` when the task store answers, `503` otherwise.
#[get("/health")]
pub async fn health(service: web::Data<TaskService>) -> impl Responder {
    match service.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "error": e.to_string(),
                "timestamp": Utc::now()
            }))
        }
    }
}
