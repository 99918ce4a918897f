//! Media capability provider.

pub mod provider;

pub use provider::{MediaCapabilityProvider, PermissionStatusReport};
