//! Shared fixtures for integration tests.
//!
//! Every fixture opens its own in-memory SQLite database with all
//! migrations applied, so tests never see each other's rows.

#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Statement};

use user_admin::api::AppState;
use user_admin::config::Config;
use user_admin::infra::{Database, Persistence, UnitOfWork};
use user_admin::services::UserManager;
use user_admin::validation::{UserInput, UserValidator};

pub const STRONG_PASSWORD: &str = "Str0ng!Pass";

pub fn test_config() -> Config {
    Config {
        // One connection keeps a single in-memory database alive for the pool.
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        ..Config::default()
    }
}

pub async fn test_database() -> Arc<Database> {
    let db = Database::connect(&test_config())
        .await
        .expect("in-memory database should migrate");
    Arc::new(db)
}

/// Service, validator and the database they share.
pub struct Fixture {
    pub database: Arc<Database>,
    pub uow: Arc<Persistence>,
    pub service: UserManager<Persistence>,
    pub validator: UserValidator,
}

pub async fn fixture() -> Fixture {
    let database = test_database().await;
    let uow = Arc::new(Persistence::new(database.get_connection()));
    let validator = UserValidator::new(uow.users(), test_config().password_policy);
    let service = UserManager::new(uow.clone());

    Fixture {
        database,
        uow,
        service,
        validator,
    }
}

pub async fn test_state() -> AppState {
    AppState::from_config(test_database().await, &test_config())
}

pub fn input(name: &str, email: &str, password: Option<&str>, role: &str) -> UserInput {
    UserInput {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: password.map(str::to_string),
        role: Some(role.to_string()),
    }
}

/// Number of rows in `table`.
pub async fn count_rows(database: &Database, table: &str) -> i64 {
    let conn = database.connection();
    let row = conn
        .query_one(Statement::from_string(
            conn.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {}", table),
        ))
        .await
        .expect("count query")
        .expect("count row");
    row.try_get::<i64>("", "n").expect("count column")
}

/// Insert `count` role-less users in a single statement, all older than any
/// user created through the service.
pub async fn bulk_insert_users(database: &Database, count: u32) {
    database
        .connection()
        .execute_unprepared(&format!(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {count}) \
             INSERT INTO users (id, name, email, password_hash, email_verified_at, created_at, updated_at) \
             SELECT randomblob(16), 'Bulk ' || n, 'bulk' || n || '@x.com', 'hashed', NULL, \
                    '2020-01-01T00:00:00+00:00', '2020-01-01T00:00:00+00:00' \
             FROM seq"
        ))
        .await
        .expect("bulk insert");
}
