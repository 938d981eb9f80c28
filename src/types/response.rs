//! Presentation shapes returned to the routing layer.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{PATH_USERS_INDEX, ROUTE_USERS_INDEX};

/// A named view plus the data it renders.
#[derive(Debug, Serialize)]
pub struct View<P: Serialize> {
    pub view: &'static str,
    pub props: P,
}

impl<P: Serialize> View<P> {
    pub fn new(view: &'static str, props: P) -> Self {
        Self { view, props }
    }
}

impl<P: Serialize> IntoResponse for View<P> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Whether a mutation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Redirect with a flash message, returned by every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Redirect {
    pub outcome: Outcome,
    /// Named route to land on
    #[schema(example = "users.index")]
    pub redirect_to: String,
    /// Path of that route
    #[schema(example = "/users")]
    pub location: String,
    /// Flash message
    #[schema(example = "User created successfully.")]
    pub message: String,
}

impl Redirect {
    /// Successful redirect back to the user listing.
    pub fn to_users_index(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            redirect_to: ROUTE_USERS_INDEX.to_string(),
            location: PATH_USERS_INDEX.to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, self.location.clone())],
            Json(self),
        )
            .into_response()
    }
}
