//! User Admin - administrative user management over HTTP.
//!
//! Lists users with their single role, serves the data behind the create and
//! edit forms, and creates, updates and deletes users. Every user holds
//! exactly one of the fixed roles after a successful write.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, roles and password handling
//! - **validation**: Normalization and field rules for submissions
//! - **services**: User administration use cases
//! - **infra**: Database, migrations, repositories and Unit of Work
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: View and redirect response shapes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve --port 8080
//!
//! # Run migrations (also seeds the roles)
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, PasswordPolicy, Role, User};
pub use errors::{AppError, AppResult};
pub use services::{UserManager, UserService};
pub use validation::{UserInput, UserValidator};
