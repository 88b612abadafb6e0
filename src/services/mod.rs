//! External service boundaries.

pub mod cover;
pub mod error_log;
