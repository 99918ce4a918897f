//! Permission domain module.
//!
//! Capabilities the proctor must grant, the fixed step catalog, the
//! per-session grant state and the user-facing acquisition errors.

pub mod capability;
pub mod catalog;
pub mod error;
pub mod state;

pub use capability::PermissionCapability;
pub use catalog::{required_capabilities, step_at, step_count, SetupStep, SETUP_STEPS};
pub use error::PermissionError;
pub use state::PermissionState;
