//! Application configuration.
//!
//! Environment-driven settings plus the constants shared across layers
//! (role names, route targets, view identifiers, validation limits).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
