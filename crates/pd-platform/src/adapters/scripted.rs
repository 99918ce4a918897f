//! Scripted media platform.
//!
//! Answers every capture request from an in-process script instead of real
//! devices. Used by the headless CLI and by tests that need deterministic
//! grants and denials.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pd_core::media::{
    AudioConstraints, DisplayConstraints, GeoPosition, GeolocationOptions, LiveStream, MediaTrack,
    PlatformMediaError, TrackSettings, VideoConstraints,
};
use pd_core::permission::PermissionCapability;
use pd_core::ports::{MediaPlatformPort, PermissionGrant};

/// How the next request for a capability is answered.
#[derive(Debug, Clone, PartialEq)]
enum Script {
    Deny,
    /// Deny this many requests, then grant.
    DenyTimes(usize),
    Fail(PlatformMediaError),
}

#[derive(Debug, Default)]
struct CapabilityLedger {
    requests: usize,
    granted: bool,
}

/// A capture stream that only tracks its own liveness.
pub struct SimulatedStream {
    tracks: Vec<MediaTrack>,
    active: Arc<AtomicBool>,
}

impl SimulatedStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            tracks,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Liveness flag shared with the stream, for observing `stop` from outside.
    pub fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }
}

impl fmt::Debug for SimulatedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedStream")
            .field("tracks", &self.tracks.len())
            .field("active", &self.is_active())
            .finish()
    }
}

impl LiveStream for SimulatedStream {
    fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.clone()
    }

    fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            log::debug!("simulated stream stopped ({} tracks)", self.tracks.len());
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct ScriptedMediaPlatform {
    scripts: Mutex<HashMap<PermissionCapability, Script>>,
    ledger: Mutex<HashMap<PermissionCapability, CapabilityLedger>>,
    geolocation: bool,
    position: GeoPosition,
    latency: Option<Duration>,
    streams: Mutex<Vec<Arc<AtomicBool>>>,
}

impl ScriptedMediaPlatform {
    /// A platform that grants every capability.
    pub fn granting_all() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            ledger: Mutex::new(HashMap::new()),
            geolocation: true,
            position: GeoPosition {
                latitude: 37.7749,
                longitude: -122.4194,
                accuracy_m: 15.0,
                altitude_m: None,
                timestamp_ms: 0,
            },
            latency: None,
            streams: Mutex::new(Vec::new()),
        }
    }

    /// Every request for `capability` is denied.
    pub fn deny(self, capability: PermissionCapability) -> Self {
        self.script(capability, Script::Deny)
    }

    /// The first `times` requests for `capability` are denied.
    pub fn deny_times(self, capability: PermissionCapability, times: usize) -> Self {
        self.script(capability, Script::DenyTimes(times))
    }

    /// Requests for `capability` fail with the given platform cause.
    pub fn fail_with(self, capability: PermissionCapability, error: PlatformMediaError) -> Self {
        self.script(capability, Script::Fail(error))
    }

    pub fn without_geolocation(mut self) -> Self {
        self.geolocation = false;
        self
    }

    pub fn with_position(mut self, position: GeoPosition) -> Self {
        self.position = position;
        self
    }

    /// Every request waits this long before it is answered.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of requests made for `capability` so far.
    pub fn request_count(&self, capability: PermissionCapability) -> usize {
        self.lock_ledger()
            .get(&capability)
            .map_or(0, |entry| entry.requests)
    }

    /// Number of streams handed out that are still live.
    pub fn live_stream_count(&self) -> usize {
        self.lock_streams()
            .iter()
            .filter(|active| active.load(Ordering::SeqCst))
            .count()
    }

    fn script(self, capability: PermissionCapability, script: Script) -> Self {
        self.lock_scripts().insert(capability, script);
        self
    }

    fn lock_scripts(&self) -> std::sync::MutexGuard<'_, HashMap<PermissionCapability, Script>> {
        self.scripts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_ledger(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<PermissionCapability, CapabilityLedger>> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_streams(&self) -> std::sync::MutexGuard<'_, Vec<Arc<AtomicBool>>> {
        self.streams.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Consumes one scripted answer for `capability`.
    async fn answer(&self, capability: PermissionCapability) -> Result<(), PlatformMediaError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let outcome = {
            let mut scripts = self.lock_scripts();
            match scripts.get_mut(&capability) {
                None => Ok(()),
                Some(Script::Deny) => Err(PlatformMediaError::NotAllowed),
                Some(Script::Fail(error)) => Err(error.clone()),
                Some(Script::DenyTimes(remaining)) => {
                    if *remaining == 0 {
                        Ok(())
                    } else {
                        *remaining -= 1;
                        Err(PlatformMediaError::NotAllowed)
                    }
                }
            }
        };

        let mut ledger = self.lock_ledger();
        let entry = ledger.entry(capability).or_default();
        entry.requests += 1;
        entry.granted |= outcome.is_ok();
        match &outcome {
            Ok(()) => log::info!("scripted platform granted {capability}"),
            Err(err) => log::info!("scripted platform refused {capability}: {err}"),
        }
        outcome
    }

    fn stream(&self, tracks: Vec<MediaTrack>) -> Box<dyn LiveStream> {
        let stream = SimulatedStream::new(tracks);
        self.lock_streams().push(stream.liveness());
        Box::new(stream)
    }
}

impl Default for ScriptedMediaPlatform {
    fn default() -> Self {
        Self::granting_all()
    }
}

#[async_trait]
impl MediaPlatformPort for ScriptedMediaPlatform {
    async fn open_camera(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        self.answer(PermissionCapability::Camera).await?;
        Ok(self.stream(vec![MediaTrack::video(
            "Simulated Camera",
            TrackSettings {
                width: constraints.ideal_width,
                height: constraints.ideal_height,
                frame_rate: Some(constraints.ideal_frame_rate),
            },
        )]))
    }

    async fn open_microphone(
        &self,
        _constraints: &AudioConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        self.answer(PermissionCapability::Microphone).await?;
        Ok(self.stream(vec![MediaTrack::audio("Simulated Microphone")]))
    }

    async fn open_display(
        &self,
        constraints: &DisplayConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        self.answer(PermissionCapability::Screen).await?;
        let mut tracks = vec![MediaTrack::video(
            "Simulated Display",
            TrackSettings {
                width: constraints.ideal_width,
                height: constraints.ideal_height,
                frame_rate: None,
            },
        )];
        if constraints.audio {
            tracks.push(MediaTrack::audio("Simulated System Audio"));
        }
        Ok(self.stream(tracks))
    }

    fn geolocation_supported(&self) -> bool {
        self.geolocation
    }

    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<GeoPosition, PlatformMediaError> {
        self.answer(PermissionCapability::Location).await?;
        Ok(GeoPosition {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            ..self.position.clone()
        })
    }

    async fn query_permission(
        &self,
        capability: PermissionCapability,
    ) -> Result<PermissionGrant, PlatformMediaError> {
        if !capability.has_status_query() {
            return Err(PlatformMediaError::Unsupported);
        }
        if self.lock_ledger().get(&capability).is_some_and(|entry| entry.granted) {
            return Ok(PermissionGrant::Granted);
        }
        let grant = match self.lock_scripts().get(&capability) {
            Some(Script::Deny) => PermissionGrant::Denied,
            _ => PermissionGrant::Prompt,
        };
        Ok(grant)
    }
}
