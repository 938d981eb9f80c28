//! User service integration tests against an in-memory SQLite database.

mod common;

use std::time::Duration;

use user_admin::domain::{NewUser, Password, Role};
use user_admin::errors::AppError;
use user_admin::infra::UnitOfWork;
use user_admin::services::{UserService, USER_CREATED, USER_DELETED, USER_UPDATED};
use user_admin::validation::ValidatedUser;

use common::{bulk_insert_users, count_rows, fixture, input, Fixture, STRONG_PASSWORD};

async fn create(fx: &Fixture, name: &str, email: &str, role: &str) -> uuid::Uuid {
    let validated = fx
        .validator
        .validate(input(name, email, Some(STRONG_PASSWORD), role), None)
        .await
        .expect("valid submission");
    fx.service.create_user(validated).await.expect("created");

    fx.service
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .find(|u| u.email == email.trim().to_lowercase())
        .expect("created user is listed")
        .id
}

#[tokio::test]
async fn test_create_user_assigns_exactly_one_role() {
    let fx = fixture().await;

    let validated = fx
        .validator
        .validate(
            input("  Ada  ", " ADA@X.com ", Some(STRONG_PASSWORD), "Suppliers"),
            None,
        )
        .await
        .unwrap();
    let redirect = fx.service.create_user(validated).await.unwrap();

    assert!(redirect.is_success());
    assert_eq!(redirect.redirect_to, "users.index");
    assert_eq!(redirect.location, "/users");
    assert_eq!(redirect.message, USER_CREATED);

    let users = fx.service.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Ada");
    assert_eq!(users[0].email, "ada@x.com");
    assert_eq!(users[0].role, "Suppliers");
    assert_eq!(count_rows(&fx.database, "user_roles").await, 1);

    let stored = fx.service.get_user(users[0].id).await.unwrap();
    assert_ne!(stored.password_hash, STRONG_PASSWORD);
    assert!(Password::from_hash(stored.password_hash).verify(STRONG_PASSWORD));
}

#[tokio::test]
async fn test_create_user_without_password_writes_nothing() {
    let fx = fixture().await;

    let validated = ValidatedUser {
        name: "Ada".to_string(),
        email: "ada@x.com".to_string(),
        role: Role::Customers,
        password: None,
    };
    let result = fx.service.create_user(validated).await;

    match result {
        Err(AppError::Validation(failure)) => {
            assert_eq!(
                failure.errors.get("password"),
                Some(&["The password field is required.".to_string()][..])
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(count_rows(&fx.database, "users").await, 0);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_by_validator() {
    let fx = fixture().await;
    create(&fx, "Ada", "ada@x.com", "Suppliers").await;

    let result = fx
        .validator
        .validate(
            input("Other", "Ada@X.com", Some(STRONG_PASSWORD), "Customers"),
            None,
        )
        .await;

    match result {
        Err(AppError::Validation(failure)) => {
            assert_eq!(
                failure.errors.get("email"),
                Some(&["The email has already been taken.".to_string()][..])
            );
            assert_eq!(failure.old_input.email.as_deref(), Some("ada@x.com"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_email_past_validation_is_a_conflict() {
    let fx = fixture().await;
    create(&fx, "Ada", "ada@x.com", "Suppliers").await;

    // Simulates a concurrent insert that passed the uniqueness check
    let validated = ValidatedUser {
        name: "Other".to_string(),
        email: "ada@x.com".to_string(),
        role: Role::Customers,
        password: Some(STRONG_PASSWORD.to_string()),
    };
    let result = fx.service.create_user(validated).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(count_rows(&fx.database, "users").await, 1);
    assert_eq!(count_rows(&fx.database, "user_roles").await, 1);
}

#[tokio::test]
async fn test_update_with_blank_password_keeps_hash_and_replaces_role() {
    let fx = fixture().await;
    let id = create(&fx, "Ada", "ada@x.com", "Suppliers").await;
    let before = fx.service.get_user(id).await.unwrap();

    let validated = fx
        .validator
        .validate(input("Ada L.", "ada@x.com", Some("   "), "Customers"), Some(id))
        .await
        .unwrap();
    assert!(validated.password.is_none());

    let redirect = fx.service.update_user(id, validated).await.unwrap();
    assert_eq!(redirect.message, USER_UPDATED);

    let after = fx.service.get_user(id).await.unwrap();
    assert_eq!(after.name, "Ada L.");
    assert_eq!(after.password_hash, before.password_hash);
    assert!(after.updated_at >= before.updated_at);

    let form = fx.service.edit_form(id).await.unwrap();
    assert_eq!(form.user.role, "Customers");
    assert_eq!(count_rows(&fx.database, "user_roles").await, 1);
}

#[tokio::test]
async fn test_update_with_new_password_rehashes() {
    let fx = fixture().await;
    let id = create(&fx, "Ada", "ada@x.com", "Suppliers").await;

    let validated = fx
        .validator
        .validate(
            input("Ada", "ada@x.com", Some("An0ther!Secret"), "Suppliers"),
            Some(id),
        )
        .await
        .unwrap();
    fx.service.update_user(id, validated).await.unwrap();

    let stored = Password::from_hash(fx.service.get_user(id).await.unwrap().password_hash);
    assert!(stored.verify("An0ther!Secret"));
    assert!(!stored.verify(STRONG_PASSWORD));
}

#[tokio::test]
async fn test_update_collapses_multiple_roles_into_one() {
    let fx = fixture().await;
    let id = create(&fx, "Ada", "ada@x.com", "Suppliers").await;
    fx.uow.roles().assign_role(id, Role::SystemAdmin).await.unwrap();
    assert_eq!(count_rows(&fx.database, "user_roles").await, 2);

    let validated = fx
        .validator
        .validate(input("Ada", "ada@x.com", None, "Customers"), Some(id))
        .await
        .unwrap();
    fx.service.update_user(id, validated).await.unwrap();

    assert_eq!(count_rows(&fx.database, "user_roles").await, 1);
    assert_eq!(
        fx.uow.roles().assigned_role(id).await.unwrap().as_deref(),
        Some("Customers")
    );
}

#[tokio::test]
async fn test_update_keeping_own_email_passes_uniqueness() {
    let fx = fixture().await;
    let id = create(&fx, "Ada", "ada@x.com", "Suppliers").await;

    let result = fx
        .validator
        .validate(input("Ada", "ADA@x.com", None, "Suppliers"), Some(id))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_cannot_take_another_users_email() {
    let fx = fixture().await;
    create(&fx, "Ada", "ada@x.com", "Suppliers").await;
    let bob = create(&fx, "Bob", "bob@x.com", "Customers").await;

    let result = fx
        .validator
        .validate(input("Bob", "ADA@x.com", None, "Customers"), Some(bob))
        .await;

    match result {
        Err(AppError::Validation(failure)) => {
            assert_eq!(
                failure.errors.get("email"),
                Some(&["The email has already been taken.".to_string()][..])
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(fx.service.get_user(bob).await.unwrap().email, "bob@x.com");
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let fx = fixture().await;

    let validated = ValidatedUser {
        name: "Ghost".to_string(),
        email: "ghost@x.com".to_string(),
        role: Role::Customers,
        password: None,
    };
    let result = fx.service.update_user(uuid::Uuid::new_v4(), validated).await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(count_rows(&fx.database, "user_roles").await, 0);
}

#[tokio::test]
async fn test_list_users_newest_first_with_no_role_label() {
    let fx = fixture().await;
    create(&fx, "First", "first@x.com", "Customers").await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    // Inserted straight through the repository, so no role is assigned
    let unassigned = fx
        .uow
        .users()
        .create(NewUser {
            name: "Second".to_string(),
            email: "second@x.com".to_string(),
            password_hash: "hashed".to_string(),
        })
        .await
        .unwrap();

    let users = fx.service.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, unassigned.id);
    assert_eq!(users[0].role, "No Role");
    assert_eq!(users[1].name, "First");
    assert_eq!(users[1].role, "Customers");

    let form = fx.service.edit_form(unassigned.id).await.unwrap();
    assert_eq!(form.user.role, "");
}

#[tokio::test]
async fn test_list_users_beyond_bind_parameter_limit() {
    let fx = fixture().await;
    // More rows than SQLite accepts as bound variables in one statement
    bulk_insert_users(&fx.database, 33_000).await;
    let ada = create(&fx, "Ada", "ada@x.com", "Suppliers").await;

    let users = fx.service.list_users().await.unwrap();

    assert_eq!(users.len(), 33_001);
    assert_eq!(users[0].id, ada);
    assert_eq!(users[0].role, "Suppliers");
    assert!(users[1..].iter().all(|u| u.role == "No Role"));
}

#[tokio::test]
async fn test_list_users_shows_first_role_once_per_user() {
    let fx = fixture().await;
    let id = create(&fx, "Ada", "ada@x.com", "Suppliers").await;
    fx.uow.roles().assign_role(id, Role::Customers).await.unwrap();

    let users = fx.service.list_users().await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, "Customers");
}

#[tokio::test]
async fn test_list_users_empty() {
    let fx = fixture().await;
    assert!(fx.service.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_form_options_are_alphabetical_and_stable() {
    let fx = fixture().await;

    let first = fx.service.form_options().await.unwrap();
    let second = fx.service.form_options().await.unwrap();

    assert_eq!(first, ["Customers", "Suppliers", "System Admin"]);
    assert_eq!(first, second);
    assert_eq!(count_rows(&fx.database, "roles").await, 3);
}

#[tokio::test]
async fn test_edit_form_unknown_user_is_not_found() {
    let fx = fixture().await;
    let result = fx.service.edit_form(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_delete_user_removes_row_and_assignment() {
    let fx = fixture().await;
    let id = create(&fx, "Ada", "ada@x.com", "Suppliers").await;
    let keep = create(&fx, "Bob", "bob@x.com", "Customers").await;

    let redirect = fx.service.delete_user(id).await.unwrap();
    assert_eq!(redirect.message, USER_DELETED);

    assert!(matches!(fx.service.get_user(id).await, Err(AppError::NotFound)));
    assert!(fx.service.get_user(keep).await.is_ok());
    assert_eq!(count_rows(&fx.database, "users").await, 1);
    assert_eq!(count_rows(&fx.database, "user_roles").await, 1);
}

#[tokio::test]
async fn test_delete_unknown_user_changes_nothing() {
    let fx = fixture().await;
    create(&fx, "Ada", "ada@x.com", "Suppliers").await;

    let result = fx.service.delete_user(uuid::Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(count_rows(&fx.database, "users").await, 1);
    assert_eq!(count_rows(&fx.database, "user_roles").await, 1);
}
