use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use crate::auth::{AuthMiddleware, TokenIssuer};
use crate::config::Config;
use crate::routes;
use crate::services::{AuthService, TaskService};
use crate::store::{TaskStore, UserStore};

/// Services shared by every worker, built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub tasks: web::Data<TaskService>,
    pub auth: web::Data<AuthService>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, tokens: TokenIssuer, bcrypt_cost: u32) -> Self
    where
        S: TaskStore + UserStore + 'static,
    {
        let tokens = Arc::new(tokens);
        let task_store: Arc<dyn TaskStore> = store.clone();
        let user_store: Arc<dyn UserStore> = store;
        Self {
            tasks: web::Data::new(TaskService::new(task_store)),
            auth: web::Data::new(AuthService::new(user_store, tokens.clone(), bcrypt_cost)),
            tokens,
        }
    }

    pub fn from_config<S>(store: Arc<S>, config: &Config) -> Self
    where
        S: TaskStore + UserStore + 'static,
    {
        let tokens = TokenIssuer::new(&config.jwt_secret, Duration::hours(config.jwt_ttl_hours));
        Self::new(store, tokens, config.bcrypt_cost)
    }

    pub fn auth_middleware(&self) -> AuthMiddleware {
        AuthMiddleware::new(self.tokens.clone())
    }

    /// Registers the services and all routes on an app or scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tasks.clone()).app_data(self.auth.clone());
        routes::config(cfg);
    }
}
