//! Platform capture and sensor primitives.
//!
//! One implementation per target platform. This is the only true external
//! boundary of the setup core.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::media::{
    AudioConstraints, DisplayConstraints, GeoPosition, GeolocationOptions, LiveStream,
    PlatformMediaError, VideoConstraints,
};
use crate::permission::PermissionCapability;

/// Persistent permission state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionGrant {
    Granted,
    Denied,
    Prompt,
}

#[async_trait]
pub trait MediaPlatformPort: Send + Sync {
    async fn open_camera(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError>;

    async fn open_microphone(
        &self,
        constraints: &AudioConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError>;

    async fn open_display(
        &self,
        constraints: &DisplayConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError>;

    fn geolocation_supported(&self) -> bool;

    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<GeoPosition, PlatformMediaError>;

    /// Queries the persisted grant. Platforms without a query mechanism for
    /// `capability` return [`PlatformMediaError::Unsupported`].
    async fn query_permission(
        &self,
        capability: PermissionCapability,
    ) -> Result<PermissionGrant, PlatformMediaError>;
}
