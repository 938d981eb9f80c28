//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories for users and role assignments
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{RoleRepository, RoleStore, UserRepository, UserStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxFuture, TxRoleRepository, TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockRoleRepository, MockUserRepository};
