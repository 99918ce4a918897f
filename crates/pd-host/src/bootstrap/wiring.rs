//! # Dependency Wiring / 依赖注入
//!
//! Builds every port adapter and hands them to the use cases. This is the
//! only place that knows which concrete adapter backs which port.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use pd_app::{
    AuthenticateUser, CurrentSession, FinalizeSession, MediaCapabilityProvider,
    SetupOrchestrator,
};
use pd_core::app_dirs::AppDirs;
use pd_core::config::AppConfig;
use pd_core::permission::PermissionCapability;
use pd_core::ports::{AuthPort, ClockPort, MediaPlatformPort, SessionStorePort};
use pd_infra::{FileSessionStore, SystemClock};
use pd_platform::{detect_media_backend, DeviceNodeMediaPlatform, MediaBackend, ScriptedMediaPlatform};

use crate::adapters::{BroadcastSetupEventEmitter, HeadlessNavigation, OfflineAuthGateway};
use crate::bootstrap::runtime::{AppRuntime, HostDeps, UseCaseSet};

/// Which media backend the host should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaBackendChoice {
    /// Detect from the host platform.
    #[default]
    Auto,
    Simulated,
    Device,
}

/// Host-level knobs that are not part of the persisted config.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub backend: MediaBackendChoice,
    /// Simulated backend: always deny these.
    pub deny: Vec<PermissionCapability>,
    /// Simulated backend: deny the first request for these.
    pub deny_once: Vec<PermissionCapability>,
}

fn build_media_platform(options: &HostOptions) -> Arc<dyn MediaPlatformPort> {
    let backend = match options.backend {
        MediaBackendChoice::Auto => detect_media_backend(),
        MediaBackendChoice::Simulated => MediaBackend::Simulated,
        MediaBackendChoice::Device => MediaBackend::DeviceNodes,
    };

    match backend {
        MediaBackend::Simulated => {
            let mut platform = ScriptedMediaPlatform::granting_all();
            for capability in &options.deny {
                platform = platform.deny(*capability);
            }
            for capability in &options.deny_once {
                platform = platform.deny_times(*capability, 1);
            }
            info!(deny = ?options.deny, deny_once = ?options.deny_once, "using simulated media backend");
            Arc::new(platform)
        }
        MediaBackend::DeviceNodes => {
            if !options.deny.is_empty() || !options.deny_once.is_empty() {
                warn!("deny scripts only apply to the simulated backend; ignoring");
            }
            info!("using device-node media backend");
            Arc::new(DeviceNodeMediaPlatform::new())
        }
    }
}

fn session_file_path(config: &AppConfig, app_dirs: &AppDirs) -> PathBuf {
    config
        .storage
        .session_file
        .clone()
        .unwrap_or_else(|| app_dirs.session_file())
}

/// Wires adapters from `config` and `options` into a ready runtime.
pub fn wire_runtime(config: AppConfig, options: HostOptions, app_dirs: &AppDirs) -> AppRuntime {
    let media_platform = build_media_platform(&options);
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let session_path = session_file_path(&config, app_dirs);
    info!(path = %session_path.display(), "session store location");
    let session_store: Arc<dyn SessionStorePort> = Arc::new(FileSessionStore::new(session_path));
    let auth: Arc<dyn AuthPort> = Arc::new(OfflineAuthGateway::new());

    let deps = HostDeps {
        events: Arc::new(BroadcastSetupEventEmitter::new()),
        navigation: Arc::new(HeadlessNavigation::new()),
    };

    let provider = Arc::new(MediaCapabilityProvider::new(
        media_platform,
        clock,
        config.media.clone(),
    ));
    let finalize_session = Arc::new(FinalizeSession::new(
        session_store.clone(),
        deps.navigation.clone(),
    ));
    let setup_orchestrator = Arc::new(SetupOrchestrator::new(
        provider,
        finalize_session.clone(),
        deps.events.clone(),
        config.setup.advance_delay(),
    ));
    let authenticate_user = Arc::new(AuthenticateUser::new(
        auth,
        setup_orchestrator.clone(),
        finalize_session,
    ));
    let current_session = Arc::new(CurrentSession::new(session_store));

    AppRuntime::new(
        config,
        deps,
        UseCaseSet {
            setup_orchestrator,
            authenticate_user,
            current_session,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_override_wins_over_app_dirs() {
        let app_dirs = AppDirs {
            app_data_root: PathBuf::from("/tmp/proctordesk"),
        };
        let mut config = AppConfig::default();
        assert_eq!(
            session_file_path(&config, &app_dirs),
            PathBuf::from("/tmp/proctordesk/session.json")
        );

        config.storage.session_file = Some(PathBuf::from("/srv/session.json"));
        assert_eq!(
            session_file_path(&config, &app_dirs),
            PathBuf::from("/srv/session.json")
        );
    }
}
