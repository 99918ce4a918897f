//! Host commands.
//!
//! The surface a UI shell invokes. Every handler opens a `command.*` root
//! span and flattens errors to `String`.

pub mod auth;
pub mod error;
pub mod session;
pub mod setup;

pub use error::map_err;
