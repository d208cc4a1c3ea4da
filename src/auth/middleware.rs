use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenIssuer;
use crate::error::AppError;

/// Verifies the `Authorization` header and stores the decoded `Claims` in
/// the request extensions for [`AuthenticatedUser`](super::AuthenticatedUser).
#[derive(Clone)]
pub struct AuthMiddleware {
    issuer: Arc<TokenIssuer>,
}

impl AuthMiddleware {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            issuer: self.issuer.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    issuer: Arc<TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.method(), req.path()) {
            return Box::pin(self.service.call(req));
        }

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        let result = match token {
            Some(token) => self.issuer.verify(token),
            None => Err(AppError::Unauthorized("Missing token".into())),
        };

        match result {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => {
                log::warn!("rejected {} {}: {}", req.method(), req.path(), app_err);
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}

/// Routes reachable without a token. CORS preflights always pass.
fn is_public(method: &Method, path: &str) -> bool {
    *method == Method::OPTIONS
        || matches!(
            (method.as_str(), path),
            ("GET", "/health") | ("GET", "/tasks") | ("POST", "/login") | ("POST", "/users")
        )
}

/// Accepts `Bearer <token>` as well as a bare token.
fn bearer_token(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let token = match value
        .strip_prefix("Bearer")
        .or_else(|| value.strip_prefix("bearer"))
    {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => value,
    }
    .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use actix_web::test::{self as actix_test, TestRequest};
    use actix_web::{http::StatusCode, web, App, HttpResponse};
    use chrono::Duration;
    use uuid::Uuid;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.id.to_string())
    }

    async fn open() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("  Bearer abc.def  "), Some("abc.def"));
        assert_eq!(bearer_token("Bearerabc.def"), Some("Bearerabc.def"));
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("bearer"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_public_routes() {
        assert!(is_public(&Method::GET, "/tasks"));
        assert!(is_public(&Method::POST, "/login"));
        assert!(is_public(&Method::OPTIONS, "/tasks/detail"));
        assert!(!is_public(&Method::POST, "/tasks"));
        assert!(!is_public(&Method::GET, "/tasks/detail"));
    }

    #[actix_rt::test]
    async fn test_middleware_gates_private_routes() {
        let issuer = Arc::new(TokenIssuer::new("middleware_secret", Duration::hours(1)));
        let app = actix_test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(issuer.clone()))
                .route("/tasks", web::get().to(open))
                .route("/tasks/detail", web::get().to(whoami)),
        )
        .await;

        let req = TestRequest::get().uri("/tasks").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get().uri("/tasks/detail").to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

        let req = TestRequest::get()
            .uri("/tasks/detail")
            .insert_header((header::AUTHORIZATION, "Bearer   "))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized: Missing token");

        let req = TestRequest::get()
            .uri("/tasks/detail")
            .insert_header((header::AUTHORIZATION, "Bearer nonsense"))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

        let user_id = Uuid::new_v4();
        let token = issuer.issue(user_id, "admin@gmail.com").unwrap();
        let req = TestRequest::get()
            .uri("/tasks/detail")
            .insert_header((header::AUTHORIZATION, token))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string().into_bytes());
    }
}
