//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-step writes (a user row plus
//! its role assignment) inside a single database transaction.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    role_repository, user_repository, RoleRepository, RoleStore, UserRepository, UserStore,
};
use crate::domain::{NewUser, Role, User, UserChanges};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by a transactional closure.
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Repository access plus transactions, shared by the services.
///
/// The generic `transaction` method rules out `automock`; tests either wrap
/// mocked repositories in a hand-written implementation or use SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Pooled user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Pooled role repository
    fn roles(&self) -> Arc<dyn RoleRepository>;

    /// Run `f` inside one database transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back when it returns `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repositories bound to the open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'a> {
        TxUserRepository { txn: self.txn }
    }

    pub fn roles(&self) -> TxRoleRepository<'a> {
        TxRoleRepository { txn: self.txn }
    }
}

/// SeaORM-backed [`UnitOfWork`]
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    role_repo: Arc<RoleStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let role_repo = Arc::new(RoleStore::new(db.clone()));
        Self {
            db,
            user_repo,
            role_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.role_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Backend default isolation (ReadCommitted on PostgreSQL)
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

/// Transaction-bound user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        user_repository::create(self.txn, new_user).await
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        user_repository::update(self.txn, id, changes).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        user_repository::delete(self.txn, id).await
    }
}

/// Transaction-bound role repository.
pub struct TxRoleRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRoleRepository<'a> {
    pub async fn assign_role(&self, user_id: Uuid, role: Role) -> AppResult<()> {
        role_repository::assign_role(self.txn, user_id, role).await
    }

    pub async fn replace_roles(&self, user_id: Uuid, roles: Vec<Role>) -> AppResult<()> {
        role_repository::replace_roles(self.txn, user_id, roles).await
    }

    /// Drop every assignment of a user; returns how many were removed
    pub async fn remove_roles(&self, user_id: Uuid) -> AppResult<u64> {
        role_repository::remove_roles(self.txn, user_id).await
    }
}
