//! Application configuration domain model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::media::{AudioConstraints, DisplayConstraints, GeolocationOptions, VideoConstraints};

/// Application configuration
///
/// Every section is optional in the TOML file; missing values take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Setup flow pacing
    pub setup: SetupConfig,

    /// Capture constraints per capability
    pub media: MediaConfig,

    /// Storage settings
    pub storage: StorageConfig,
}

/// Setup flow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Delay between a successful grant and showing the next step
    pub advance_delay_ms: u64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: 1000,
        }
    }
}

impl SetupConfig {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub camera: VideoConstraints,
    pub microphone: AudioConstraints,
    pub screen: DisplayConstraints,
    pub location: GeolocationOptions,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the session file location (defaults to the app data dir)
    pub session_file: Option<PathBuf>,
}
