//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{UserManager, UserService};
use crate::validation::UserValidator;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// User administration use cases
    pub user_service: Arc<dyn UserService>,
    /// Submission validator
    pub validator: Arc<UserValidator>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the services over one Unit of Work on `database`.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let validator = Arc::new(UserValidator::new(
            uow.users(),
            config.password_policy.clone(),
        ));
        let user_service = Arc::new(UserManager::new(uow));

        Self {
            user_service,
            validator,
            database,
        }
    }
}
