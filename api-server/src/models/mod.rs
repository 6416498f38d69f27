//! Data models

pub mod user;
pub mod prediction;

pub use user::*;
pub use prediction::*;
