use std::sync::Arc;

use validator::Validate;

use crate::auth::{hash_password, verify_password, LoginRequest, LoginResponse, TokenIssuer};
use crate::error::AppError;
use crate::models::{User, UserInput};
use crate::store::UserStore;

/// Registration and login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenIssuer>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenIssuer>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Creates an account. Emails are compared case-insensitively.
    pub async fn register(&self, input: UserInput) -> Result<User, AppError> {
        input.validate()?;
        let email = normalize_email(&input.email);
        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;

        let user = self.users.insert(User::new(email, password_hash)).await?;
        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Checks credentials and issues a token.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(LoginResponse {
            token,
            email: user.email,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
