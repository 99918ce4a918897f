//! Media backends backed by the host operating system.

mod detect;
mod device_nodes;

pub use detect::{detect_media_backend, MediaBackend};
pub use device_nodes::DeviceNodeMediaPlatform;
