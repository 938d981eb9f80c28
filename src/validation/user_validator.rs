//! User submission validator.
//!
//! Turns a raw [`UserInput`] into a [`ValidatedUser`], or rejects it with
//! every failing field reported at once. Nothing is written here; the only
//! storage access is the email uniqueness lookup.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::errors::{FieldErrors, ValidationFailure};
use super::input::{UserForm, UserInput, ValidatedUser};
use crate::domain::{PasswordPolicy, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

const NAME_REQUIRED: &str = "The name field is required.";
const EMAIL_REQUIRED: &str = "The email field is required.";
const EMAIL_TAKEN: &str = "The email has already been taken.";
const PASSWORD_REQUIRED: &str = "The password field is required.";
const ROLE_REQUIRED: &str = "The role field is required.";
const ROLE_INVALID: &str = "The selected role is invalid.";

/// Validates create and update submissions.
pub struct UserValidator {
    users: Arc<dyn UserRepository>,
    policy: PasswordPolicy,
}

impl UserValidator {
    pub fn new(users: Arc<dyn UserRepository>, policy: PasswordPolicy) -> Self {
        Self { users, policy }
    }

    /// Validate a submission.
    ///
    /// `existing_user_id` is `None` for a create and the edited user's id for
    /// an update. It decides whether a password is required and which user
    /// may already own the submitted email.
    pub async fn validate(
        &self,
        input: UserInput,
        existing_user_id: Option<Uuid>,
    ) -> AppResult<ValidatedUser> {
        let form = UserForm::normalize(input);
        let mut errors = FieldErrors::default();

        if let Err(e) = form.validate() {
            errors.extend_from(&e);
        }

        if form.name.is_none() {
            errors.add("name", NAME_REQUIRED);
        }

        match form.email.as_deref() {
            None => errors.add("email", EMAIL_REQUIRED),
            Some(email) if !errors.has("email") => {
                if self.users.email_taken(email, existing_user_id).await? {
                    errors.add("email", EMAIL_TAKEN);
                }
            }
            Some(_) => {}
        }

        match form.password.as_deref() {
            Some(password) => {
                for violation in self.policy.check(password) {
                    errors.add("password", violation);
                }
            }
            None if existing_user_id.is_none() => errors.add("password", PASSWORD_REQUIRED),
            None => {}
        }

        let role = match form.role.as_deref() {
            None => {
                errors.add("role", ROLE_REQUIRED);
                None
            }
            Some(name) => match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.add("role", ROLE_INVALID);
                    None
                }
            },
        };

        if !errors.is_empty() {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "User input rejected");
            return Err(AppError::Validation(ValidationFailure {
                errors,
                old_input: form.old_input(),
            }));
        }

        match (form.name, form.email, role) {
            (Some(name), Some(email), Some(role)) => Ok(ValidatedUser {
                name,
                email,
                role,
                password: form.password,
            }),
            _ => Err(AppError::internal("validated input is missing a required field")),
        }
    }
}
