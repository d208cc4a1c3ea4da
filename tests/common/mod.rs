#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, App};
use chrono::Duration;
use serde_json::Value;
use taskdocs::auth::{LoginRequest, TokenIssuer};
use taskdocs::models::{Task, TaskInput, UserInput};
use taskdocs::store::MemoryStore;
use taskdocs::AppState;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@gmail.com";
pub const ADMIN_PASSWORD: &str = "password12356";
pub const JWT_SECRET: &str = "integration_test_secret";

/// Title and description of the seeded tasks.
pub const INITIAL_TASKS: &[(&str, &str)] = &[
    ("Llevar el auto a lavar", "Lavado completo con aspirado"),
    ("Comprar pan", "Dos baguettes y medialunas"),
    ("Pagar la factura de luz", "Vence el viernes"),
    ("Llamar al dentista", "Pedir turno para control"),
    ("Preparar la presentacion", "Diapositivas para la reunion del lunes"),
    ("Regar las plantas", "Las del balcon primero"),
];

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub admin_id: Uuid,
    pub token: String,
}

impl TestContext {
    /// A memory-backed app state with the admin user and the initial tasks.
    pub async fn seeded() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            TokenIssuer::new(JWT_SECRET, Duration::hours(1)),
            4,
        );

        let admin = state
            .auth
            .register(UserInput {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            })
            .await
            .expect("failed to register admin");

        for (title, description) in INITIAL_TASKS {
            state
                .tasks
                .create(
                    TaskInput {
                        title: title.to_string(),
                        description: Some(description.to_string()),
                        status: None,
                        expiration_date: None,
                    },
                    admin.id,
                )
                .await
                .expect("failed to seed task");
        }

        let token = state
            .auth
            .login(LoginRequest {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            })
            .await
            .expect("failed to log in admin")
            .token;

        Self {
            state,
            store,
            admin_id: admin.id,
            token,
        }
    }

    pub async fn tasks_in_db(&self) -> Vec<Task> {
        self.state.tasks.find_all().await.expect("failed to list tasks")
    }

    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

/// Builds the app the same way `main` does, minus CORS.
pub async fn init_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let state = state.clone();
    test::init_service(
        App::new()
            .wrap(state.auth_middleware())
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg)),
    )
    .await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Sends `req` and returns status and JSON body, including for requests the
/// auth middleware rejects before they reach a handler.
pub async fn send<S, B>(app: &S, req: Request) -> TestResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let content_type = content_type(resp.headers());
            let bytes = test::read_body(resp).await;
            TestResponse {
                status,
                content_type,
                body: parse_body(&bytes),
            }
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let content_type = content_type(resp.headers());
            let bytes = to_bytes(resp.into_body()).await.expect("failed to read error body");
            TestResponse {
                status,
                content_type,
                body: parse_body(&bytes),
            }
        }
    }
}

fn content_type(headers: &header::HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
