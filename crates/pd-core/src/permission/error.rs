use serde::{Deserialize, Serialize};

use super::PermissionCapability;

/// User-facing acquisition failures.
///
/// Each variant carries a fixed instructional message. All of them are
/// recoverable: the step stays active and the user may retry.
///
/// 权限获取失败（可重试）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PermissionError {
    #[error("Camera access was denied. Please allow camera access in your browser or system settings and try again.")]
    CameraDenied,
    #[error("Microphone access was denied. Please allow microphone access in your browser or system settings and try again.")]
    MicrophoneDenied,
    #[error("Screen sharing was denied. Please allow screen sharing and try again.")]
    ScreenShareDenied,
    #[error("Location access was denied. Please allow location access and try again.")]
    LocationDenied,
    #[error("Location services are not available on this device. Please enable location access and try again.")]
    LocationUnavailable,
}

impl PermissionError {
    /// The generic denial for a capability.
    pub fn denied(capability: PermissionCapability) -> Self {
        match capability {
            PermissionCapability::Camera => PermissionError::CameraDenied,
            PermissionCapability::Microphone => PermissionError::MicrophoneDenied,
            PermissionCapability::Screen => PermissionError::ScreenShareDenied,
            PermissionCapability::Location => PermissionError::LocationDenied,
        }
    }

    pub fn capability(&self) -> PermissionCapability {
        match self {
            PermissionError::CameraDenied => PermissionCapability::Camera,
            PermissionError::MicrophoneDenied => PermissionCapability::Microphone,
            PermissionError::ScreenShareDenied => PermissionCapability::Screen,
            PermissionError::LocationDenied | PermissionError::LocationUnavailable => {
                PermissionCapability::Location
            }
        }
    }
}
