//! Media backend detection.
//!
//! Decides whether the host exposes capture devices the device-node backend
//! can open, or whether the scripted backend has to stand in.

use std::path::Path;

/// Which `MediaPlatformPort` implementation the host should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    /// Kernel capture nodes are present (Linux V4L2 / ALSA).
    DeviceNodes,
    /// No usable capture stack; answers come from a script.
    Simulated,
}

/// Detect the media backend of the current platform.
///
/// # Detection Logic
///
/// - **Linux**: `DeviceNodes` when `/dev` has a video capture node or an ALSA
///   capture PCM, otherwise `Simulated`
/// - **Other**: `Simulated`
pub fn detect_media_backend() -> MediaBackend {
    #[cfg(target_os = "linux")]
    {
        detect_in(Path::new("/dev"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        log::warn!("No device-node capture support on this platform. Using simulated media");
        MediaBackend::Simulated
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn detect_in(dev_root: &Path) -> MediaBackend {
    let has_video = !super::device_nodes::video_nodes(dev_root).is_empty();
    let has_audio = !super::device_nodes::capture_pcm_nodes(dev_root).is_empty();

    if has_video || has_audio {
        log::info!(
            "Capture device nodes detected (video: {has_video}, audio: {has_audio}). Using device-node media"
        );
        return MediaBackend::DeviceNodes;
    }

    log::warn!("No capture device nodes under {}. Using simulated media", dev_root.display());
    MediaBackend::Simulated
}
