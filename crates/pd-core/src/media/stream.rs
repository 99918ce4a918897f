use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Negotiated settings of a video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSettings {
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTrack {
    pub kind: TrackKind,
    pub label: String,
    pub settings: Option<TrackSettings>,
}

impl MediaTrack {
    pub fn video(label: impl Into<String>, settings: TrackSettings) -> Self {
        Self {
            kind: TrackKind::Video,
            label: label.into(),
            settings: Some(settings),
        }
    }

    pub fn audio(label: impl Into<String>) -> Self {
        Self {
            kind: TrackKind::Audio,
            label: label.into(),
            settings: None,
        }
    }
}

/// A live capture stream produced by the platform.
///
/// `stop` ends every underlying track and must be safe to call repeatedly.
pub trait LiveStream: Send + Sync + std::fmt::Debug {
    fn tracks(&self) -> Vec<MediaTrack>;

    fn stop(&self);

    fn is_active(&self) -> bool;
}
