//! Application services layer - user administration use cases.
//!
//! Services take input that already passed [`crate::validation`] and drive
//! the repositories through the Unit of Work, so every multi-row write is
//! transactional.

mod user_service;

pub use user_service::{
    EditForm, UserManager, UserService, USER_CREATED, USER_DELETED, USER_UPDATED,
};
