//! User administration handlers.

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{JsonBody, PathParam};
use crate::api::AppState;
use crate::config::{VIEW_USERS_CREATE, VIEW_USERS_EDIT, VIEW_USERS_INDEX};
use crate::domain::UserListItem;
use crate::errors::AppResult;
use crate::services::EditForm;
use crate::types::{Redirect, View};
use crate::validation::UserInput;

/// Props of the `Users/Index` view
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersIndexProps {
    pub users: Vec<UserListItem>,
}

/// Props of the `Users/Create` view
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateFormProps {
    /// Selectable role names, alphabetically
    pub roles: Vec<String>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(store))
        .route("/new", get(create))
        .route("/:id/edit", get(edit))
        .route("/:id", put(update).patch(update).delete(destroy))
}

/// List all users with their role
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Users/Index view", body = UsersIndexProps)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<View<UsersIndexProps>> {
    let users = state.user_service.list_users().await?;
    Ok(View::new(VIEW_USERS_INDEX, UsersIndexProps { users }))
}

/// Data for the create form
#[utoipa::path(
    get,
    path = "/users/new",
    tag = "Users",
    responses(
        (status = 200, description = "Users/Create view", body = CreateFormProps)
    )
)]
pub async fn create(State(state): State<AppState>) -> AppResult<View<CreateFormProps>> {
    let roles = state.user_service.form_options().await?;
    Ok(View::new(VIEW_USERS_CREATE, CreateFormProps { roles }))
}

/// Create a user with one role
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserInput,
    responses(
        (status = 303, description = "User created", body = Redirect),
        (status = 400, description = "Malformed body"),
        (status = 409, description = "Email already stored"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn store(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UserInput>,
) -> AppResult<Redirect> {
    let validated = state.validator.validate(input, None).await?;
    state.user_service.create_user(validated).await
}

/// Data for the edit form
#[utoipa::path(
    get,
    path = "/users/{id}/edit",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Users/Edit view", body = EditForm),
        (status = 404, description = "User not found")
    )
)]
pub async fn edit(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<View<EditForm>> {
    let form = state.user_service.edit_form(id).await?;
    Ok(View::new(VIEW_USERS_EDIT, form))
}

/// Update a user and replace its role
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserInput,
    responses(
        (status = 303, description = "User updated", body = Redirect),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already stored"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(input): JsonBody<UserInput>,
) -> AppResult<Redirect> {
    // Unknown ids are a 404, not a validation failure.
    let user = state.user_service.get_user(id).await?;

    let validated = state.validator.validate(input, Some(user.id)).await?;
    state.user_service.update_user(user.id, validated).await
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 303, description = "User deleted", body = Redirect),
        (status = 404, description = "User not found")
    )
)]
pub async fn destroy(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Redirect> {
    state.user_service.delete_user(id).await
}
