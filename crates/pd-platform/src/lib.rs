//! # pd-platform
//!
//! Platform-specific implementations for ProctorDesk.
//!
//! This crate contains the adapters that talk to the operating system:
//! capture devices, the display server, and application directories.

pub mod adapters;
pub mod app_dirs;
pub mod media;

pub use adapters::{ScriptedMediaPlatform, SimulatedStream};
pub use media::{detect_media_backend, DeviceNodeMediaPlatform, MediaBackend};
