//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. The setup core depends only on
//! these traits; platform, storage and host adapters live outside this crate.

pub mod app_dirs;
pub mod auth;
mod clock;
pub mod errors;
pub mod media_platform;
pub mod navigation;
pub mod session_store;
pub mod setup_event_port;

pub use app_dirs::AppDirsPort;
pub use auth::AuthPort;
pub use clock::*;
pub use errors::AppDirsError;
pub use media_platform::{MediaPlatformPort, PermissionGrant};
pub use navigation::HostNavigationPort;
pub use session_store::{SessionStorePort, SESSION_USER_KEY};
pub use setup_event_port::SetupEventPort;
