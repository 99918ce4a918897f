use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A permission-gated platform resource.
///
/// 需要用户授权的平台能力。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionCapability {
    Camera,
    Microphone,
    Screen,
    Location,
}

impl PermissionCapability {
    pub const ALL: [PermissionCapability; 4] = [
        PermissionCapability::Camera,
        PermissionCapability::Microphone,
        PermissionCapability::Screen,
        PermissionCapability::Location,
    ];

    /// Registry key used for this capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionCapability::Camera => "camera",
            PermissionCapability::Microphone => "microphone",
            PermissionCapability::Screen => "screen",
            PermissionCapability::Location => "location",
        }
    }

    /// Whether the platform offers a persistent permission query for it.
    ///
    /// Screen capture is granted per-prompt and has no such query.
    pub fn has_status_query(&self) -> bool {
        !matches!(self, PermissionCapability::Screen)
    }
}

impl Display for PermissionCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for PermissionCapability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camera" => Ok(PermissionCapability::Camera),
            "microphone" | "mic" => Ok(PermissionCapability::Microphone),
            "screen" | "screen-share" | "screenshare" => Ok(PermissionCapability::Screen),
            "location" => Ok(PermissionCapability::Location),
            other => Err(UnknownCapability(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_parses_aliases() {
        assert_eq!(
            "screen-share".parse::<PermissionCapability>().unwrap(),
            PermissionCapability::Screen
        );
        assert_eq!(
            "Mic".parse::<PermissionCapability>().unwrap(),
            PermissionCapability::Microphone
        );
        assert!("gyroscope".parse::<PermissionCapability>().is_err());
    }

    #[test]
    fn capability_serializes_lowercase() {
        let json = serde_json::to_string(&PermissionCapability::Microphone).unwrap();
        assert_eq!(json, "\"microphone\"");
    }

    #[test]
    fn screen_has_no_status_query() {
        assert!(!PermissionCapability::Screen.has_status_query());
        assert!(PermissionCapability::Location.has_status_query());
    }
}
