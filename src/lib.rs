#![doc = "The `taskadmin` library crate."]
#![doc = ""]
#![doc = "An admin interface over projects, tasks and the admin users they are assigned"]
#![doc = "to: data model and validation, task scopes and filters, authentication,"]
#![doc = "HTML rendering and the route handlers. `main.rs` builds the server from it."]

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod mailer;
pub mod models;
pub mod queries;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
