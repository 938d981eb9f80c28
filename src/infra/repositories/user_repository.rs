//! User repository.
//!
//! Queries are written once against [`ConnectionTrait`] so the pooled
//! [`UserStore`] and the transaction-bound repository share them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::{role, user_role};
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// All users, newest first, each with its role name if one is assigned
    async fn list_with_roles(&self) -> AppResult<Vec<(User, Option<String>)>>;

    /// Whether a user other than `except` already owns this email
    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> AppResult<bool>;

    /// Insert a new user
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn list_with_roles(&self) -> AppResult<Vec<(User, Option<String>)>> {
        list_with_roles(&self.db).await
    }

    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> AppResult<bool> {
        email_taken(&self.db, email, except).await
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        create(&self.db, new_user).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        update(&self.db, id, changes).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id).one(db).await?;
    Ok(result.map(User::from))
}

/// One row of `users LEFT JOIN user_roles LEFT JOIN roles`.
#[derive(Debug, FromQueryResult)]
struct UserWithRoleRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    email_verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    role_name: Option<String>,
}

impl UserWithRoleRow {
    fn into_parts(self) -> (User, Option<String>) {
        let user = User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            email_verified_at: self.email_verified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (user, self.role_name)
    }
}

/// Single joined query; no id list is bound, so the user count is unbounded.
pub(crate) async fn list_with_roles<C: ConnectionTrait>(
    db: &C,
) -> AppResult<Vec<(User, Option<String>)>> {
    let rows = UserEntity::find()
        .column_as(role::Column::Name, "role_name")
        .join(JoinType::LeftJoin, user::Relation::UserRole.def())
        .join(JoinType::LeftJoin, user_role::Relation::Role.def())
        .order_by_desc(user::Column::CreatedAt)
        .order_by_asc(user::Column::Id)
        .order_by_asc(role::Column::Name)
        .into_model::<UserWithRoleRow>()
        .all(db)
        .await?;

    // Rows of one user are adjacent; the first carries its alphabetically first role.
    let mut listed: Vec<(User, Option<String>)> = Vec::with_capacity(rows.len());
    for row in rows {
        if listed.last().is_some_and(|(user, _)| user.id == row.id) {
            continue;
        }
        listed.push(row.into_parts());
    }

    Ok(listed)
}

pub(crate) async fn email_taken<C: ConnectionTrait>(
    db: &C,
    email: &str,
    except: Option<Uuid>,
) -> AppResult<bool> {
    let mut query = UserEntity::find().filter(user::Column::Email.eq(email.to_lowercase()));
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }

    Ok(query.one(db).await?.is_some())
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, new_user: NewUser) -> AppResult<User> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new_user.name),
        email: Set(new_user.email.to_lowercase()),
        password_hash: Set(new_user.password_hash),
        email_verified_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(db).await?;
    Ok(User::from(model))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: UserChanges,
) -> AppResult<User> {
    let user = UserEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = user.into();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(email) = changes.email {
        active.email = Set(email.to_lowercase());
    }
    if let Some(password_hash) = changes.password_hash {
        active.password_hash = Set(password_hash);
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(User::from(model))
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = UserEntity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}
