//! Input validation for user submissions.

mod errors;
mod input;
mod user_validator;

pub use errors::{FieldErrors, ValidationFailure};
pub use input::{OldInput, UserInput, ValidatedUser};
pub use user_validator::UserValidator;
