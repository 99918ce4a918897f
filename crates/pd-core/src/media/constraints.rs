//! Capture constraints passed to the platform.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TrackSettings;

/// Camera capture constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub ideal_frame_rate: u32,
    pub min_frame_rate: u32,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            min_width: 640,
            min_height: 480,
            ideal_frame_rate: 30,
            min_frame_rate: 15,
        }
    }
}

impl VideoConstraints {
    /// Whether a negotiated track meets the minimums.
    pub fn accepts(&self, settings: &TrackSettings) -> bool {
        settings.width >= self.min_width
            && settings.height >= self.min_height
            && settings.frame_rate.unwrap_or(self.ideal_frame_rate) >= self.min_frame_rate
    }
}

/// Microphone capture constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

/// Display capture constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub audio: bool,
}

impl Default for DisplayConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1920,
            ideal_height: 1080,
            min_width: 1280,
            min_height: 720,
            audio: true,
        }
    }
}

impl DisplayConstraints {
    pub fn accepts(&self, settings: &TrackSettings) -> bool {
        settings.width >= self.min_width && settings.height >= self.min_height
    }
}

/// One-shot position request options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    /// A fix younger than this may be reused without a fresh read.
    pub maximum_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 60_000,
        }
    }
}

impl GeolocationOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}

/// A position fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    pub altitude_m: Option<f64>,
    /// Unix epoch milliseconds at which the fix was taken.
    pub timestamp_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_defaults_target_720p_at_30fps() {
        let video = VideoConstraints::default();
        assert_eq!((video.ideal_width, video.ideal_height), (1280, 720));
        assert_eq!((video.min_width, video.min_height), (640, 480));
        assert_eq!((video.ideal_frame_rate, video.min_frame_rate), (30, 15));
    }

    #[test]
    fn video_rejects_tracks_below_minimum() {
        let video = VideoConstraints::default();
        let low = TrackSettings {
            width: 320,
            height: 240,
            frame_rate: Some(30),
        };
        let slow = TrackSettings {
            width: 1280,
            height: 720,
            frame_rate: Some(10),
        };
        let ok = TrackSettings {
            width: 640,
            height: 480,
            frame_rate: Some(15),
        };
        assert!(!video.accepts(&low));
        assert!(!video.accepts(&slow));
        assert!(video.accepts(&ok));
    }

    #[test]
    fn display_defaults_include_audio() {
        let display = DisplayConstraints::default();
        assert!(display.audio);
        assert_eq!((display.min_width, display.min_height), (1280, 720));
    }

    #[test]
    fn geolocation_defaults() {
        let options = GeolocationOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout(), Duration::from_secs(10));
        assert_eq!(options.maximum_age(), Duration::from_secs(60));
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let options: GeolocationOptions = serde_json::from_str(r#"{"timeout_ms": 500}"#).unwrap();
        assert_eq!(options.timeout_ms, 500);
        assert_eq!(options.maximum_age_ms, 60_000);
    }
}
