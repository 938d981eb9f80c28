//! Domain layer - Core business entities and logic
//!
//! Users, the fixed role set, and password handling, independent of
//! storage and HTTP concerns.

pub mod password;
pub mod role;
pub mod user;

pub use password::{Password, PasswordPolicy};
pub use role::{Role, UnknownRole};
pub use user::{EditableUser, NewUser, User, UserChanges, UserListItem};
