//! Device-node media backend.
//!
//! Treats an open file descriptor on a kernel capture node as the acquired
//! stream: V4L2 `/dev/videoN` for the camera, ALSA `/dev/snd/pcmC*D*c` for the
//! microphone. Screen capture holds a connection to the display server socket
//! (`$XDG_RUNTIME_DIR/$WAYLAND_DISPLAY`, or `/tmp/.X11-unix/X<n>` for `:<n>`).
//! This backend has no location source.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use pd_core::media::{
    AudioConstraints, DisplayConstraints, GeoPosition, GeolocationOptions, LiveStream, MediaTrack,
    PlatformMediaError, TrackKind, VideoConstraints,
};
use pd_core::permission::PermissionCapability;
use pd_core::ports::{MediaPlatformPort, PermissionGrant};

/// Lists `videoN` nodes directly under `dev_root`, sorted.
pub(crate) fn video_nodes(dev_root: &Path) -> Vec<PathBuf> {
    list_nodes(dev_root, |name| {
        name.strip_prefix("video")
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Lists ALSA capture PCMs (`pcmC<card>D<device>c`) under `dev_root/snd`, sorted.
pub(crate) fn capture_pcm_nodes(dev_root: &Path) -> Vec<PathBuf> {
    list_nodes(&dev_root.join("snd"), |name| {
        name.starts_with("pcmC") && name.ends_with('c') && name.contains('D')
    })
}

fn list_nodes(dir: &Path, matches: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut nodes: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_str().is_some_and(&matches))
        .map(|entry| entry.path())
        .collect();
    nodes.sort();
    nodes
}

const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

/// Socket path of a display name.
///
/// `:<n>` and `:<n>.<screen>` are local X11 displays; anything else is a
/// Wayland socket name, relative to `runtime_dir` unless absolute. Remote X11
/// displays (`host:<n>`) have no local socket.
pub(crate) fn display_socket(
    display: &str,
    runtime_dir: Option<&Path>,
    x11_socket_dir: &Path,
) -> Option<PathBuf> {
    if let Some(rest) = display.strip_prefix(':') {
        let number = rest.split('.').next().unwrap_or_default();
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return Some(x11_socket_dir.join(format!("X{number}")));
    }
    if display.contains(':') {
        return None;
    }
    let path = Path::new(display);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    runtime_dir.map(|dir| dir.join(path))
}

fn map_io_error(err: &io::Error) -> PlatformMediaError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PlatformMediaError::NotAllowed,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => PlatformMediaError::NotFound,
        _ => PlatformMediaError::Other(err.to_string()),
    }
}

/// An open kernel node or display server connection.
#[derive(Debug)]
enum HeldNode {
    Device { _file: File },
    #[cfg(unix)]
    Display { _socket: std::os::unix::net::UnixStream },
}

#[cfg(unix)]
async fn connect_display(socket: &Path) -> io::Result<HeldNode> {
    let stream = tokio::net::UnixStream::connect(socket).await?;
    Ok(HeldNode::Display {
        _socket: stream.into_std()?,
    })
}

#[cfg(not(unix))]
async fn connect_display(_socket: &Path) -> io::Result<HeldNode> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "display sockets need a unix host",
    ))
}

/// A stream that holds its nodes open until stopped.
#[derive(Debug)]
struct NodeStream {
    tracks: Vec<MediaTrack>,
    nodes: Mutex<Option<Vec<HeldNode>>>,
}

impl NodeStream {
    fn new(tracks: Vec<MediaTrack>, nodes: Vec<HeldNode>) -> Self {
        Self {
            tracks,
            nodes: Mutex::new(Some(nodes)),
        }
    }
}

impl LiveStream for NodeStream {
    fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.clone()
    }

    fn stop(&self) {
        let mut nodes = self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(files) = nodes.take() {
            log::debug!("closing {} held node(s)", files.len());
        }
    }

    fn is_active(&self) -> bool {
        self.nodes
            .lock()
            .map(|nodes| nodes.is_some())
            .unwrap_or(false)
    }
}

pub struct DeviceNodeMediaPlatform {
    dev_root: PathBuf,
    display: Option<String>,
    runtime_dir: Option<PathBuf>,
    x11_socket_dir: PathBuf,
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl DeviceNodeMediaPlatform {
    /// Uses `/dev` and the display named by `WAYLAND_DISPLAY` or `DISPLAY`.
    pub fn new() -> Self {
        let display = non_empty_env("WAYLAND_DISPLAY").or_else(|| non_empty_env("DISPLAY"));
        Self::with_root(PathBuf::from("/dev"), display)
    }

    /// Display sockets are looked up under `XDG_RUNTIME_DIR` and
    /// `/tmp/.X11-unix`.
    pub fn with_root(dev_root: PathBuf, display: Option<String>) -> Self {
        Self {
            dev_root,
            display,
            runtime_dir: non_empty_env("XDG_RUNTIME_DIR").map(PathBuf::from),
            x11_socket_dir: PathBuf::from(X11_SOCKET_DIR),
        }
    }

    /// Overrides where display sockets are looked up.
    pub fn with_socket_dirs(mut self, runtime_dir: Option<PathBuf>, x11_socket_dir: PathBuf) -> Self {
        self.runtime_dir = runtime_dir;
        self.x11_socket_dir = x11_socket_dir;
        self
    }

    fn nodes_for(&self, capability: PermissionCapability) -> Vec<PathBuf> {
        match capability {
            PermissionCapability::Camera => video_nodes(&self.dev_root),
            PermissionCapability::Microphone => capture_pcm_nodes(&self.dev_root),
            _ => Vec::new(),
        }
    }

    /// Opens the first node that accepts a read handle.
    async fn open_first(
        &self,
        capability: PermissionCapability,
    ) -> Result<(PathBuf, File), PlatformMediaError> {
        let mut last_error = PlatformMediaError::NotFound;
        for path in self.nodes_for(capability) {
            match tokio::fs::OpenOptions::new().read(true).open(&path).await {
                Ok(file) => {
                    log::info!("opened {} for {capability}", path.display());
                    return Ok((path, file.into_std().await));
                }
                Err(err) => {
                    log::warn!("cannot open {} for {capability}: {err}", path.display());
                    last_error = map_io_error(&err);
                }
            }
        }
        Err(last_error)
    }

    fn node_track(kind: TrackKind, path: &Path) -> MediaTrack {
        MediaTrack {
            kind,
            label: path.display().to_string(),
            settings: None,
        }
    }
}

impl Default for DeviceNodeMediaPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaPlatformPort for DeviceNodeMediaPlatform {
    async fn open_camera(
        &self,
        _constraints: &VideoConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        let (path, file) = self.open_first(PermissionCapability::Camera).await?;
        let track = Self::node_track(TrackKind::Video, &path);
        Ok(Box::new(NodeStream::new(vec![track], vec![HeldNode::Device { _file: file }])))
    }

    async fn open_microphone(
        &self,
        _constraints: &AudioConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        let (path, file) = self.open_first(PermissionCapability::Microphone).await?;
        let track = Self::node_track(TrackKind::Audio, &path);
        Ok(Box::new(NodeStream::new(vec![track], vec![HeldNode::Device { _file: file }])))
    }

    async fn open_display(
        &self,
        _constraints: &DisplayConstraints,
    ) -> Result<Box<dyn LiveStream>, PlatformMediaError> {
        let Some(display) = &self.display else {
            log::warn!("no display server; screen capture unavailable");
            return Err(PlatformMediaError::NotFound);
        };
        let Some(socket) =
            display_socket(display, self.runtime_dir.as_deref(), &self.x11_socket_dir)
        else {
            log::warn!("display {display} has no local socket; screen capture unavailable");
            return Err(PlatformMediaError::NotFound);
        };
        let connection = connect_display(&socket).await.map_err(|err| {
            log::warn!("cannot connect to display socket {}: {err}", socket.display());
            map_io_error(&err)
        })?;
        log::info!("connected to display {display} at {}", socket.display());

        let track = MediaTrack {
            kind: TrackKind::Video,
            label: format!("display {display}"),
            settings: None,
        };
        Ok(Box::new(NodeStream::new(vec![track], vec![connection])))
    }

    fn geolocation_supported(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<GeoPosition, PlatformMediaError> {
        Err(PlatformMediaError::Unsupported)
    }

    async fn query_permission(
        &self,
        capability: PermissionCapability,
    ) -> Result<PermissionGrant, PlatformMediaError> {
        match capability {
            PermissionCapability::Camera | PermissionCapability::Microphone => {
                match self.open_first(capability).await {
                    Ok(_) => Ok(PermissionGrant::Granted),
                    Err(PlatformMediaError::NotAllowed) => Ok(PermissionGrant::Denied),
                    Err(err) => Err(err),
                }
            }
            PermissionCapability::Screen | PermissionCapability::Location => {
                Err(PlatformMediaError::Unsupported)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dev_root() -> TempDir {
        let dev = TempDir::new().unwrap();
        std::fs::create_dir_all(dev.path().join("snd")).unwrap();
        dev
    }

    #[test]
    fn video_nodes_ignore_unrelated_entries() {
        let dev = dev_root();
        for name in ["video1", "video0", "video", "videoX", "vcs0"] {
            std::fs::write(dev.path().join(name), b"").unwrap();
        }

        let nodes = video_nodes(dev.path());

        assert_eq!(
            nodes,
            vec![dev.path().join("video0"), dev.path().join("video1")]
        );
    }

    #[tokio::test]
    async fn camera_stream_closes_node_on_stop() {
        let dev = dev_root();
        std::fs::write(dev.path().join("video0"), b"").unwrap();
        let platform = DeviceNodeMediaPlatform::with_root(dev.path().to_path_buf(), None);

        let stream = platform
            .open_camera(&VideoConstraints::default())
            .await
            .unwrap();
        assert!(stream.is_active());
        assert_eq!(stream.tracks()[0].kind, TrackKind::Video);

        stream.stop();
        assert!(!stream.is_active());
    }

    #[tokio::test]
    async fn missing_nodes_report_not_found() {
        let dev = dev_root();
        let platform = DeviceNodeMediaPlatform::with_root(dev.path().to_path_buf(), None);

        let err = platform
            .open_microphone(&AudioConstraints::default())
            .await
            .unwrap_err();

        assert_eq!(err, PlatformMediaError::NotFound);
        assert!(platform
            .open_display(&DisplayConstraints::default())
            .await
            .is_err());
    }

    #[test]
    fn display_socket_resolves_wayland_and_x11_names() {
        let runtime = Path::new("/run/user/1000");
        let x11 = Path::new("/tmp/.X11-unix");

        assert_eq!(
            display_socket("wayland-0", Some(runtime), x11),
            Some(PathBuf::from("/run/user/1000/wayland-0"))
        );
        assert_eq!(display_socket("wayland-0", None, x11), None);
        assert_eq!(
            display_socket("/tmp/wl", None, x11),
            Some(PathBuf::from("/tmp/wl"))
        );
        assert_eq!(
            display_socket(":1.0", None, x11),
            Some(PathBuf::from("/tmp/.X11-unix/X1"))
        );
        assert_eq!(display_socket("remote:0", Some(runtime), x11), None);
        assert_eq!(display_socket(":", Some(runtime), x11), None);
    }

    #[tokio::test]
    async fn stale_display_name_is_not_granted() {
        let runtime = TempDir::new().unwrap();
        let platform = DeviceNodeMediaPlatform::with_root(
            PathBuf::from("/nonexistent"),
            Some("no-such-wayland-socket-99".to_string()),
        )
        .with_socket_dirs(Some(runtime.path().to_path_buf()), runtime.path().to_path_buf());

        let err = platform
            .open_display(&DisplayConstraints::default())
            .await
            .unwrap_err();

        assert_eq!(err, PlatformMediaError::NotFound);
    }

    #[tokio::test]
    async fn stale_x11_socket_file_is_not_granted() {
        let x11 = TempDir::new().unwrap();
        std::fs::write(x11.path().join("X0"), b"").unwrap();
        let platform =
            DeviceNodeMediaPlatform::with_root(PathBuf::from("/nonexistent"), Some(":0".to_string()))
                .with_socket_dirs(None, x11.path().to_path_buf());

        assert!(platform
            .open_display(&DisplayConstraints::default())
            .await
            .is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn listening_wayland_socket_is_held_by_the_stream() {
        let runtime = TempDir::new().unwrap();
        let _listener =
            std::os::unix::net::UnixListener::bind(runtime.path().join("wayland-1")).unwrap();
        let platform = DeviceNodeMediaPlatform::with_root(
            PathBuf::from("/nonexistent"),
            Some("wayland-1".to_string()),
        )
        .with_socket_dirs(Some(runtime.path().to_path_buf()), runtime.path().to_path_buf());

        let stream = platform
            .open_display(&DisplayConstraints::default())
            .await
            .unwrap();

        assert!(stream.is_active());
        assert_eq!(stream.tracks()[0].label, "display wayland-1");
        stream.stop();
        assert!(!stream.is_active());
    }

    #[tokio::test]
    async fn location_is_unsupported() {
        let platform = DeviceNodeMediaPlatform::with_root(PathBuf::from("/nonexistent"), None);

        assert!(!platform.geolocation_supported());
        assert_eq!(
            platform
                .query_permission(PermissionCapability::Location)
                .await,
            Err(PlatformMediaError::Unsupported)
        );
    }
}
