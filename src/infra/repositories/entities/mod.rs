//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod role;
pub mod user;
pub mod user_role;

pub use role::Entity as RoleEntity;
pub use user::Entity as UserEntity;
pub use user_role::Entity as UserRoleEntity;
