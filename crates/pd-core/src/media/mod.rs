//! Media resource domain module.
//!
//! Acquisition constraints, live stream abstraction, resource handles and
//! the per-capability handle registry.

pub mod constraints;
pub mod error;
pub mod handle;
pub mod registry;
pub mod stream;

pub use constraints::{
    AudioConstraints, DisplayConstraints, GeoPosition, GeolocationOptions, VideoConstraints,
};
pub use error::PlatformMediaError;
pub use handle::{AcquiredResource, ResourceHandle};
pub use registry::ResourceRegistry;
pub use stream::{LiveStream, MediaTrack, TrackKind, TrackSettings};
