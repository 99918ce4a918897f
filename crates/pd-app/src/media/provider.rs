//! Media capability provider.
//!
//! Acquires one capability at a time from the platform port and owns the
//! registry of live handles for one setup scope.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use pd_core::config::MediaConfig;
use pd_core::media::{
    GeoPosition, LiveStream, PlatformMediaError, ResourceHandle, ResourceRegistry, TrackKind,
    TrackSettings,
};
use pd_core::permission::{PermissionCapability, PermissionError};
use pd_core::ports::{ClockPort, MediaPlatformPort, PermissionGrant};

/// Best-effort grant state for capabilities with a status query.
pub type PermissionStatusReport = BTreeMap<PermissionCapability, bool>;

pub struct MediaCapabilityProvider {
    platform: Arc<dyn MediaPlatformPort>,
    clock: Arc<dyn ClockPort>,
    config: MediaConfig,
    registry: Mutex<ResourceRegistry>,
}

impl MediaCapabilityProvider {
    pub fn new(
        platform: Arc<dyn MediaPlatformPort>,
        clock: Arc<dyn ClockPort>,
        config: MediaConfig,
    ) -> Self {
        Self {
            platform,
            clock,
            config,
            registry: Mutex::new(ResourceRegistry::new()),
        }
    }

    /// Acquires `capability` and returns its registered handle.
    pub async fn acquire(
        &self,
        capability: PermissionCapability,
    ) -> Result<ResourceHandle, PermissionError> {
        match capability {
            PermissionCapability::Camera => self.acquire_camera().await,
            PermissionCapability::Microphone => self.acquire_microphone().await,
            PermissionCapability::Screen => self.acquire_screen_share().await,
            PermissionCapability::Location => self.acquire_location_handle().await,
        }
    }

    pub async fn acquire_camera(&self) -> Result<ResourceHandle, PermissionError> {
        let capability = PermissionCapability::Camera;
        let constraints = &self.config.camera;
        let span = info_span!("usecase.media_provider.acquire", capability = %capability);
        async {
            let stream = self
                .platform
                .open_camera(constraints)
                .await
                .map_err(|err| Self::denied(capability, &err))?;
            Self::ensure_video_tracks(capability, stream.as_ref(), |settings| {
                constraints.accepts(settings)
            })?;
            Ok(self.register_stream(capability, stream).await)
        }
        .instrument(span)
        .await
    }

    pub async fn acquire_microphone(&self) -> Result<ResourceHandle, PermissionError> {
        let capability = PermissionCapability::Microphone;
        let span = info_span!("usecase.media_provider.acquire", capability = %capability);
        async {
            let stream = self
                .platform
                .open_microphone(&self.config.microphone)
                .await
                .map_err(|err| Self::denied(capability, &err))?;
            Ok(self.register_stream(capability, stream).await)
        }
        .instrument(span)
        .await
    }

    pub async fn acquire_screen_share(&self) -> Result<ResourceHandle, PermissionError> {
        let capability = PermissionCapability::Screen;
        let constraints = &self.config.screen;
        let span = info_span!("usecase.media_provider.acquire", capability = %capability);
        async {
            let stream = self
                .platform
                .open_display(constraints)
                .await
                .map_err(|err| Self::denied(capability, &err))?;
            Self::ensure_video_tracks(capability, stream.as_ref(), |settings| {
                constraints.accepts(settings)
            })?;
            Ok(self.register_stream(capability, stream).await)
        }
        .instrument(span)
        .await
    }

    /// Takes a one-shot position fix.
    ///
    /// A held fix younger than the configured maximum age is returned
    /// without asking the platform again.
    pub async fn acquire_location(&self) -> Result<GeoPosition, PermissionError> {
        let handle = self.acquire_location_handle().await?;
        handle
            .position()
            .cloned()
            .ok_or(PermissionError::LocationDenied)
    }

    async fn acquire_location_handle(&self) -> Result<ResourceHandle, PermissionError> {
        let capability = PermissionCapability::Location;
        let options = &self.config.location;
        let span = info_span!("usecase.media_provider.acquire", capability = %capability);
        async {
            if !self.platform.geolocation_supported() {
                warn!("geolocation is not supported on this platform");
                return Err(PermissionError::LocationUnavailable);
            }

            if let Some(cached) = self.fresh_location_fix(options.maximum_age_ms).await {
                debug!(handle_id = %cached.id(), "reusing cached position fix");
                return Ok(cached);
            }

            let position = match tokio::time::timeout(
                options.timeout(),
                self.platform.current_position(options),
            )
            .await
            {
                Ok(Ok(position)) => position,
                Ok(Err(PlatformMediaError::Unsupported)) => {
                    warn!("platform reported geolocation as unsupported");
                    return Err(PermissionError::LocationUnavailable);
                }
                Ok(Err(err)) => return Err(Self::denied(capability, &err)),
                Err(_elapsed) => {
                    return Err(Self::denied(capability, &PlatformMediaError::Timeout))
                }
            };

            let handle = ResourceHandle::from_position(position, self.clock.now_ms());
            Ok(self.register(handle).await)
        }
        .instrument(span)
        .await
    }

    /// Stops and forgets the handle for `capability`. No-op when none is held.
    pub async fn release(&self, capability: PermissionCapability) -> bool {
        let released = self.registry.lock().await.release(capability);
        if released {
            info!(capability = %capability, "capability released");
        }
        released
    }

    pub async fn release_all(&self) -> usize {
        let released = self.registry.lock().await.release_all();
        info!(released, "all capabilities released");
        released
    }

    pub async fn handle(&self, capability: PermissionCapability) -> Option<ResourceHandle> {
        self.registry.lock().await.get(capability).cloned()
    }

    pub async fn held(&self) -> Vec<PermissionCapability> {
        self.registry.lock().await.held()
    }

    /// Queries persisted grants for camera, microphone and location.
    ///
    /// Screen capture has no query primitive and is left out. A query the
    /// platform cannot answer reports `false`.
    pub async fn check_status(&self) -> PermissionStatusReport {
        let mut report = PermissionStatusReport::new();
        for capability in PermissionCapability::ALL
            .into_iter()
            .filter(|capability| capability.has_status_query())
        {
            let granted = match self.platform.query_permission(capability).await {
                Ok(grant) => grant == PermissionGrant::Granted,
                Err(err) => {
                    debug!(capability = %capability, error = %err, "permission query unavailable");
                    false
                }
            };
            report.insert(capability, granted);
        }
        report
    }

    async fn fresh_location_fix(&self, maximum_age_ms: u64) -> Option<ResourceHandle> {
        let registry = self.registry.lock().await;
        let handle = registry.get(PermissionCapability::Location)?;
        let age_ms = self.clock.now_ms().saturating_sub(handle.acquired_at_ms());
        let fresh = (0..i64::try_from(maximum_age_ms).unwrap_or(i64::MAX)).contains(&age_ms);
        fresh.then(|| handle.clone())
    }

    async fn register_stream(
        &self,
        capability: PermissionCapability,
        stream: Box<dyn LiveStream>,
    ) -> ResourceHandle {
        let handle = ResourceHandle::from_stream(capability, stream, self.clock.now_ms());
        self.register(handle).await
    }

    async fn register(&self, handle: ResourceHandle) -> ResourceHandle {
        let replaced = self.registry.lock().await.register(handle.clone());
        info!(
            capability = %handle.capability(),
            handle_id = %handle.id(),
            replaced = replaced.is_some(),
            "capability acquired"
        );
        handle
    }

    /// Rejects streams whose negotiated video falls below the minimums.
    fn ensure_video_tracks(
        capability: PermissionCapability,
        stream: &dyn LiveStream,
        accepts: impl Fn(&TrackSettings) -> bool,
    ) -> Result<(), PermissionError> {
        let rejected = stream
            .tracks()
            .into_iter()
            .filter(|track| track.kind == TrackKind::Video)
            .filter_map(|track| track.settings)
            .find(|settings| !accepts(settings));

        match rejected {
            Some(settings) => {
                stream.stop();
                let err = PlatformMediaError::OverConstrained(format!(
                    "{}x{} does not meet the minimum",
                    settings.width, settings.height
                ));
                Err(Self::denied(capability, &err))
            }
            None => Ok(()),
        }
    }

    fn denied(capability: PermissionCapability, err: &PlatformMediaError) -> PermissionError {
        warn!(capability = %capability, error = %err, "capability acquisition failed");
        PermissionError::denied(capability)
    }
}
