//! Raw, normalized and validated shapes of a user submission.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Role;

/// Raw user form submission. Every field is optional at this stage.
#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UserInput {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// Required on create; empty or omitted on update keeps the current password
    #[schema(example = "Str0ng!Pass")]
    pub password: Option<String>,
    #[schema(example = "Suppliers")]
    pub role: Option<String>,
}

impl std::fmt::Debug for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

/// Submitted values echoed back with a validation failure. Never holds the password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OldInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Input after trimming and empty-to-absent conversion, with the static rules.
#[derive(Clone, Validate)]
pub(super) struct UserForm {
    #[validate(length(
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: Option<String>,
    #[validate(
        email(message = "The email field must be a valid email address."),
        length(
            max = 255,
            message = "The email field must not be greater than 255 characters."
        )
    )]
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UserForm {
    pub fn normalize(input: UserInput) -> Self {
        Self {
            name: trimmed(input.name),
            email: trimmed(input.email).map(|email| email.to_lowercase()),
            // Passwords keep surrounding whitespace but blank means absent.
            password: input.password.filter(|p| !p.trim().is_empty()),
            role: trimmed(input.role),
        }
    }

    pub fn old_input(&self) -> OldInput {
        OldInput {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalized field set that passed every rule.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedUser {
    pub name: String,
    /// Lowercased
    pub email: String,
    pub role: Role,
    /// Plain text; `Some` only when a new password is being set
    pub password: Option<String>,
}

impl std::fmt::Debug for ValidatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
