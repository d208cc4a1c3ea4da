#![doc = "The `taskdocs` library crate."]
#![doc = ""]
#![doc = "Domain models, store adapters, services, authentication, routing and error"]
#![doc = "handling for the task API. The binary (`main.rs`) reads the configuration,"]
#![doc = "picks a store and serves the routes."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
