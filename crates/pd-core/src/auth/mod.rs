//! Authentication domain module.
//!
//! The user record handed back by the credential backend, and the
//! request/response shapes of its two operations.

pub mod request;
pub mod user;

pub use request::{require, AuthResponse, SignupRequest, ValidationError};
pub use user::{UserRecord, UserRole};
