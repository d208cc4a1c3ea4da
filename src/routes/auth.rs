use crate::{
    auth::LoginRequest,
    error::AppError,
    models::{UserInput, UserResponse},
    services::AuthService,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates an account and returns its public view.
#[post("/users")]
pub async fn register(
    service: web::Data<AuthService>,
    body: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let user = service.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login user
///
/// Authenticates a user and returns `{token, email}`.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = service.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
