use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{GeoPosition, LiveStream, MediaTrack};
use crate::ids::HandleId;
use crate::permission::PermissionCapability;

/// What an acquisition produced.
#[derive(Debug)]
pub enum AcquiredResource {
    Stream(Box<dyn LiveStream>),
    Position(GeoPosition),
}

struct HandleInner {
    id: HandleId,
    capability: PermissionCapability,
    acquired_at_ms: i64,
    resource: AcquiredResource,
    released: AtomicBool,
}

/// Shared handle to an acquired resource.
///
/// Clones share one underlying resource. Consumers (preview surfaces, the
/// exam recorder) read through it; only [`super::ResourceRegistry`] stops it.
#[derive(Clone)]
pub struct ResourceHandle {
    inner: Arc<HandleInner>,
}

impl ResourceHandle {
    pub fn from_stream(
        capability: PermissionCapability,
        stream: Box<dyn LiveStream>,
        acquired_at_ms: i64,
    ) -> Self {
        Self::new(capability, AcquiredResource::Stream(stream), acquired_at_ms)
    }

    pub fn from_position(position: GeoPosition, acquired_at_ms: i64) -> Self {
        Self::new(
            PermissionCapability::Location,
            AcquiredResource::Position(position),
            acquired_at_ms,
        )
    }

    fn new(
        capability: PermissionCapability,
        resource: AcquiredResource,
        acquired_at_ms: i64,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id: HandleId::new(),
                capability,
                acquired_at_ms,
                resource,
                released: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> &HandleId {
        &self.inner.id
    }

    pub fn capability(&self) -> PermissionCapability {
        self.inner.capability
    }

    pub fn acquired_at_ms(&self) -> i64 {
        self.inner.acquired_at_ms
    }

    pub fn resource(&self) -> &AcquiredResource {
        &self.inner.resource
    }

    pub fn tracks(&self) -> Vec<MediaTrack> {
        match &self.inner.resource {
            AcquiredResource::Stream(stream) => stream.tracks(),
            AcquiredResource::Position(_) => Vec::new(),
        }
    }

    pub fn position(&self) -> Option<&GeoPosition> {
        match &self.inner.resource {
            AcquiredResource::Position(position) => Some(position),
            AcquiredResource::Stream(_) => None,
        }
    }

    pub fn is_live(&self) -> bool {
        if self.inner.released.load(Ordering::SeqCst) {
            return false;
        }
        match &self.inner.resource {
            AcquiredResource::Stream(stream) => stream.is_active(),
            AcquiredResource::Position(_) => true,
        }
    }

    /// Stops the underlying tracks. Only the first call has an effect.
    pub(crate) fn stop(&self) {
        if self.inner.released.swap(true, Ordering::SeqCst) {
            return;
        }
        if let AcquiredResource::Stream(stream) = &self.inner.resource {
            stream.stop();
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("id", &self.inner.id)
            .field("capability", &self.inner.capability)
            .field("acquired_at_ms", &self.inner.acquired_at_ms)
            .field("live", &self.is_live())
            .finish()
    }
}
