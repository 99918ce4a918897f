//! # pd-core
//!
//! Core domain models and business logic for ProctorDesk onboarding.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod app_dirs;
pub mod auth;
pub mod config;
pub mod ids;
pub mod media;
pub mod permission;
pub mod ports;
pub mod setup;

// Re-export commonly used types at the crate root
pub use auth::{UserRecord, UserRole};
pub use config::AppConfig;
pub use ids::{HandleId, UserId};
pub use media::{ResourceHandle, ResourceRegistry};
pub use permission::{PermissionCapability, PermissionError, PermissionState, SetupStep};
pub use setup::{SetupSession, SetupView};
