//! Shared response types.

mod response;

pub use response::{Outcome, Redirect, View};
