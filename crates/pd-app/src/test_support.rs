//! Hand-written fakes shared by unit tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pd_core::auth::{UserRecord, UserRole};
use pd_core::media::{
    AudioConstraints, DisplayConstraints, GeoPosition, GeolocationOptions, LiveStream, MediaTrack,
    PlatformMediaError, TrackSettings, VideoConstraints,
};
use pd_core::permission::PermissionCapability;
use pd_core::ports::{ClockPort, MediaPlatformPort, PermissionGrant, SetupEventPort};
use pd_core::setup::SetupView;

pub(crate) fn user(role: UserRole) -> UserRecord {
    UserRecord {
        id: format!("u-{}", role.as_str()).into(),
        email: format!("{}@example.com", role.as_str()),
        name: "Test User".to_string(),
        role,
    }
}

pub(crate) struct FakeStream {
    tracks: Vec<MediaTrack>,
    active: AtomicBool,
    stops: Arc<AtomicUsize>,
}

impl FakeStream {
    pub(crate) fn boxed(tracks: Vec<MediaTrack>, stops: Arc<AtomicUsize>) -> Box<dyn LiveStream> {
        Box::new(Self {
            tracks,
            active: AtomicBool::new(true),
            stops,
        })
    }
}

impl fmt::Debug for FakeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeStream").finish_non_exhaustive()
    }
}

impl LiveStream for FakeStream {
    fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.clone()
    }

    fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Platform fake: every capability succeeds unless listed in `deny`.
#[derive(Default)]
pub(crate) struct FakePlatform {
    pub(crate) deny: StdMutex<Vec<PermissionCapability>>,
    pub(crate) calls: StdMutex<HashMap<PermissionCapability, usize>>,
    pub(crate) stops: Arc<AtomicUsize>,
    pub(crate) no_geolocation: AtomicBool,
    /// Position reads sleep this long before answering.
    pub(crate) position_delay: StdMutex<Option<Duration>>,
    /// Camera opens sleep this long before answering.
    pub(crate) camera_delay: StdMutex<Option<Duration>>,
    pub(crate) camera_settings: StdMutex<Option<TrackSettings>>,
}

impl FakePlatform {
    pub(crate) fn deny(&self, capability: PermissionCapability) {
        self.deny.lock().unwrap().push(capability);
    }

    pub(crate) fn allow_all(&self) {
        self.deny.lock().unwrap().clear();
    }

    pub(crate) fn calls(&self, capability: PermissionCapability) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&capability)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn record(&self, capability: PermissionCapability) -> Result<(), PlatformMediaError> {
        *self.calls.lock().unwrap().entry(capability).or_default() += 1;
        if self.deny.lock().unwrap().contains(&capability) {
            return Err(PlatformMediaError::NotAllowed);
        }
        Ok(())
    }

    fn stream(&self, tracks: Vec<MediaTrack>) -> Box<dyn LiveStream> {
        FakeStream::boxed(tracks, Arc::clone(&self.stops))
    }
}

#[async_trait]
impl MediaPlatformPort for FakePlatform {
    async fn open_camera(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        let delay = *self.camera_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(PermissionCapability::Camera)?;
        let settings = self.camera_settings.lock().unwrap().unwrap_or(TrackSettings {
            width: constraints.ideal_width,
            height: constraints.ideal_height,
            frame_rate: Some(constraints.ideal_frame_rate),
        });
        Ok(self.stream(vec![MediaTrack::video("fake camera", settings)]))
    }

    async fn open_microphone(
        &self,
        _constraints: &AudioConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        self.record(PermissionCapability::Microphone)?;
        Ok(self.stream(vec![MediaTrack::audio("fake microphone")]))
    }

    async fn open_display(
        &self,
        constraints: &DisplayConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        self.record(PermissionCapability::Screen)?;
        let settings = TrackSettings {
            width: constraints.ideal_width,
            height: constraints.ideal_height,
            frame_rate: None,
        };
        Ok(self.stream(vec![
            MediaTrack::video("fake display", settings),
            MediaTrack::audio("fake system audio"),
        ]))
    }

    fn geolocation_supported(&self) -> bool {
        !self.no_geolocation.load(Ordering::SeqCst)
    }

    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<GeoPosition, PlatformMediaError> {
        let delay = *self.position_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(PermissionCapability::Location)?;
        Ok(GeoPosition {
            latitude: 52.52,
            longitude: 13.405,
            accuracy_m: 12.0,
            altitude_m: None,
            timestamp_ms: 0,
        })
    }

    async fn query_permission(
        &self,
        capability: PermissionCapability,
    ) -> Result<PermissionGrant, PlatformMediaError> {
        if self.deny.lock().unwrap().contains(&capability) {
            return Ok(PermissionGrant::Denied);
        }
        match capability {
            PermissionCapability::Location => Err(PlatformMediaError::Unsupported),
            _ => Ok(PermissionGrant::Granted),
        }
    }
}

#[derive(Default)]
pub(crate) struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub(crate) fn advance_ms(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub(crate) struct RecordingSetupEventPort {
    emitted: Mutex<Vec<SetupView>>,
}

impl RecordingSetupEventPort {
    pub(crate) async fn snapshot(&self) -> Vec<SetupView> {
        self.emitted.lock().await.clone()
    }
}

#[async_trait]
impl SetupEventPort for RecordingSetupEventPort {
    async fn emit_setup_state_changed(&self, view: SetupView) {
        self.emitted.lock().await.push(view);
    }
}
