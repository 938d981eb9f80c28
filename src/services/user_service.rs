//! User service - the user administration use cases.
//!
//! Every operation receives already validated input (see
//! [`crate::validation::UserValidator`]) or a bare id. Writes that touch both
//! the user row and its role assignment run in one transaction.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{EditableUser, NewUser, Password, Role, User, UserChanges, UserListItem};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::Redirect;
use crate::validation::{OldInput, ValidatedUser};

pub const USER_CREATED: &str = "User created successfully.";
pub const USER_UPDATED: &str = "User updated successfully.";
pub const USER_DELETED: &str = "User deleted successfully.";

/// Data behind the edit form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditForm {
    pub user: EditableUser,
    /// Selectable role names, alphabetically
    pub roles: Vec<String>,
}

/// User administration service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// All users, newest first, each with its role name or "No Role"
    async fn list_users(&self) -> AppResult<Vec<UserListItem>>;

    /// Role names offered by the create and edit forms, alphabetically
    async fn form_options(&self) -> AppResult<Vec<String>>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Create a user and assign its role
    async fn create_user(&self, input: ValidatedUser) -> AppResult<Redirect>;

    /// Current values and role choices for editing a user
    async fn edit_form(&self, id: Uuid) -> AppResult<EditForm>;

    /// Update a user and replace its role
    async fn update_user(&self, id: Uuid, input: ValidatedUser) -> AppResult<Redirect>;

    /// Permanently delete a user and its role assignment
    async fn delete_user(&self, id: Uuid) -> AppResult<Redirect>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn old_input(input: &ValidatedUser) -> OldInput {
    OldInput {
        name: Some(input.name.clone()),
        email: Some(input.email.clone()),
        role: Some(input.role.to_string()),
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self) -> AppResult<Vec<UserListItem>> {
        let users = self.uow.users().list_with_roles().await?;

        Ok(users
            .into_iter()
            .map(|(user, role)| UserListItem::new(user, role))
            .collect())
    }

    async fn form_options(&self) -> AppResult<Vec<String>> {
        let names = Role::names().iter().map(|n| n.to_string()).collect();
        self.uow.roles().find_by_names(names).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_user(&self, input: ValidatedUser) -> AppResult<Redirect> {
        let Some(plain) = input.password.as_deref() else {
            return Err(AppError::invalid_field(
                "password",
                "The password field is required.",
                old_input(&input),
            ));
        };
        let password_hash = Password::hash(plain)?.into_string();

        let role = input.role;
        let new_user = NewUser {
            name: input.name,
            email: input.email,
            password_hash,
        };

        let user = self
            .uow
            .transaction::<_, User>(move |ctx| {
                Box::pin(async move {
                    let user = ctx.users().create(new_user).await?;
                    ctx.roles().assign_role(user.id, role).await?;
                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %role, "User created");
        Ok(Redirect::to_users_index(USER_CREATED))
    }

    async fn edit_form(&self, id: Uuid) -> AppResult<EditForm> {
        let user = self.get_user(id).await?;
        let role = self.uow.roles().assigned_role(user.id).await?;
        let roles = self.form_options().await?;

        Ok(EditForm {
            user: EditableUser::new(user, role),
            roles,
        })
    }

    async fn update_user(&self, id: Uuid, input: ValidatedUser) -> AppResult<Redirect> {
        let password_hash = input
            .password
            .as_deref()
            .map(Password::hash)
            .transpose()?
            .map(Password::into_string);
        let password_changed = password_hash.is_some();

        let role = input.role;
        let changes = UserChanges {
            name: Some(input.name),
            email: Some(input.email),
            password_hash,
        };

        self.uow
            .transaction::<_, User>(move |ctx| {
                Box::pin(async move {
                    let user = ctx.users().update(id, changes).await?;
                    ctx.roles().replace_roles(user.id, vec![role]).await?;
                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = %id, role = %role, password_changed, "User updated");
        Ok(Redirect::to_users_index(USER_UPDATED))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<Redirect> {
        self.uow
            .transaction::<_, ()>(move |ctx| {
                Box::pin(async move {
                    ctx.users().find_by_id(id).await?.ok_or_not_found()?;
                    ctx.roles().remove_roles(id).await?;
                    ctx.users().delete(id).await
                })
            })
            .await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(Redirect::to_users_index(USER_DELETED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockRoleRepository, MockUserRepository, RoleRepository, TransactionContext, TxFuture,
        UserRepository,
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    /// Read-only UnitOfWork over mocked repositories.
    struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
        roles: Arc<MockRoleRepository>,
    }

    impl TestUnitOfWork {
        fn new(users: MockUserRepository, roles: MockRoleRepository) -> Self {
            Self {
                users: Arc::new(users),
                roles: Arc::new(roles),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn roles(&self) -> Arc<dyn RoleRepository> {
            self.roles.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            // Transaction not supported in test mock
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn test_user(id: Uuid, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hashed".to_string(),
            email_verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository, roles: MockRoleRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(Arc::new(TestUnitOfWork::new(users, roles)))
    }

    #[tokio::test]
    async fn test_list_users_labels_unassigned_users() {
        let assigned = Uuid::new_v4();
        let unassigned = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users.expect_list_with_roles().times(1).returning(move || {
            Ok(vec![
                (test_user(assigned, "Ada"), Some("Suppliers".to_string())),
                (test_user(unassigned, "Bob"), None),
            ])
        });

        let listed = service(users, MockRoleRepository::new())
            .list_users()
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].role, "Suppliers");
        assert_eq!(listed[1].role, "No Role");
    }

    #[tokio::test]
    async fn test_form_options_asks_for_the_fixed_roles() {
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_names()
            .withf(|names| {
                let mut names = names.clone();
                names.sort();
                names == ["Customers", "Suppliers", "System Admin"]
            })
            .returning(|_| {
                Ok(vec![
                    "Customers".to_string(),
                    "Suppliers".to_string(),
                    "System Admin".to_string(),
                ])
            });

        let options = service(MockUserRepository::new(), roles)
            .form_options()
            .await
            .unwrap();
        assert_eq!(options, ["Customers", "Suppliers", "System Admin"]);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let result = service(users, MockRoleRepository::new())
            .get_user(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_edit_form_defaults_role_to_empty() {
        let id = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(id))
            .returning(|id| Ok(Some(test_user(id, "Ada"))));

        let mut roles = MockRoleRepository::new();
        roles.expect_assigned_role().returning(|_| Ok(None));
        roles
            .expect_find_by_names()
            .returning(|_| Ok(vec!["Customers".to_string()]));

        let form = service(users, roles).edit_form(id).await.unwrap();
        assert_eq!(form.user.id, id);
        assert_eq!(form.user.role, "");
        assert_eq!(form.roles, ["Customers"]);
    }

    #[tokio::test]
    async fn test_edit_form_not_found_skips_role_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let result = service(users, MockRoleRepository::new())
            .edit_form(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_without_password_is_rejected_before_writing() {
        let input = ValidatedUser {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            role: Role::Suppliers,
            password: None,
        };

        let result = service(MockUserRepository::new(), MockRoleRepository::new())
            .create_user(input)
            .await;

        match result {
            Err(AppError::Validation(failure)) => {
                assert!(failure.errors.has("password"));
                assert_eq!(failure.old_input.role.as_deref(), Some("Suppliers"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
