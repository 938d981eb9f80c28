//! Role repository: role lookup and user-to-role assignments.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::{role, user_role, RoleEntity, UserRoleEntity};
use crate::domain::Role;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Names of the stored roles among `names`, alphabetically
    async fn find_by_names(&self, names: Vec<String>) -> AppResult<Vec<String>>;

    /// Add a role to a user, keeping any existing assignments
    async fn assign_role(&self, user_id: Uuid, role: Role) -> AppResult<()>;

    /// Replace every assignment of a user with exactly `roles`
    async fn replace_roles(&self, user_id: Uuid, roles: Vec<Role>) -> AppResult<()>;

    /// The user's role name (first alphabetically if several)
    async fn assigned_role(&self, user_id: Uuid) -> AppResult<Option<String>>;

}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_names(&self, names: Vec<String>) -> AppResult<Vec<String>> {
        find_by_names(&self.db, names).await
    }

    async fn assign_role(&self, user_id: Uuid, role: Role) -> AppResult<()> {
        assign_role(&self.db, user_id, role).await
    }

    async fn replace_roles(&self, user_id: Uuid, roles: Vec<Role>) -> AppResult<()> {
        replace_roles(&self.db, user_id, roles).await
    }

    async fn assigned_role(&self, user_id: Uuid) -> AppResult<Option<String>> {
        assigned_role(&self.db, user_id).await
    }

}

pub(crate) async fn find_by_names<C: ConnectionTrait>(
    db: &C,
    names: Vec<String>,
) -> AppResult<Vec<String>> {
    let roles = RoleEntity::find()
        .filter(role::Column::Name.is_in(names))
        .order_by_asc(role::Column::Name)
        .all(db)
        .await?;

    Ok(roles.into_iter().map(|r| r.name).collect())
}

async fn role_id<C: ConnectionTrait>(db: &C, role: Role) -> AppResult<i32> {
    RoleEntity::find()
        .filter(role::Column::Name.eq(role.as_str()))
        .one(db)
        .await?
        .map(|r| r.id)
        .ok_or_else(|| AppError::internal(format!("Role `{}` is not seeded", role)))
}

pub(crate) async fn assign_role<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    role: Role,
) -> AppResult<()> {
    let role_id = role_id(db, role).await?;

    let existing = UserRoleEntity::find_by_id((user_id, role_id)).one(db).await?;
    if existing.is_some() {
        return Ok(());
    }

    UserRoleEntity::insert(user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
    })
    .exec_without_returning(db)
    .await?;

    Ok(())
}

pub(crate) async fn remove_roles<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<u64> {
    let result = UserRoleEntity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

pub(crate) async fn replace_roles<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    roles: Vec<Role>,
) -> AppResult<()> {
    remove_roles(db, user_id).await?;
    for role in roles {
        assign_role(db, user_id, role).await?;
    }
    Ok(())
}

pub(crate) async fn assigned_role<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Option<String>> {
    let role = RoleEntity::find()
        .join(JoinType::InnerJoin, role::Relation::UserRole.def())
        .filter(user_role::Column::UserId.eq(user_id))
        .order_by_asc(role::Column::Name)
        .one(db)
        .await?;

    Ok(role.map(|r| r.name))
}
