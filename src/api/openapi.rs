//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::domain::{EditableUser, Role, UserListItem};
use crate::services::EditForm;
use crate::types::{Outcome, Redirect};
use crate::validation::UserInput;

/// OpenAPI documentation for the user administration API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Admin",
        version = "0.1.0",
        description = "Administrative user management with single-role assignment"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        user_handler::index,
        user_handler::create,
        user_handler::store,
        user_handler::edit,
        user_handler::update,
        user_handler::destroy,
    ),
    components(
        schemas(
            // Domain types
            Role,
            UserListItem,
            EditableUser,
            // Request and outcome types
            UserInput,
            EditForm,
            Outcome,
            Redirect,
            // View props
            user_handler::UsersIndexProps,
            user_handler::CreateFormProps,
        )
    ),
    tags(
        (name = "Users", description = "User administration")
    )
)]
pub struct ApiDoc;
