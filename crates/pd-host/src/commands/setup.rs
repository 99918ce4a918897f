//! Setup-related commands
//! 权限设置流程相关命令

use tracing::{info_span, Instrument};

use pd_app::media::PermissionStatusReport;
use pd_core::auth::UserRecord;
use pd_core::permission::PermissionCapability;
use pd_core::setup::SetupView;

use crate::bootstrap::AppRuntime;
use crate::commands::map_err;

/// Get current setup state.
/// 获取当前设置流程状态。
pub async fn get_state(runtime: &AppRuntime) -> Result<SetupView, String> {
    let span = info_span!("command.setup.get_state");
    async { Ok(runtime.usecases().setup_orchestrator().get_state().await) }
        .instrument(span)
        .await
}

/// Grant the permission of the current step.
/// 授权当前步骤的权限。
pub async fn grant_permission(
    runtime: &AppRuntime,
    capability: PermissionCapability,
) -> Result<SetupView, String> {
    let span = info_span!("command.setup.grant_permission", capability = %capability);
    async {
        runtime
            .usecases()
            .setup_orchestrator()
            .grant(capability)
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}

pub async fn enter_dashboard(runtime: &AppRuntime) -> Result<UserRecord, String> {
    let span = info_span!("command.setup.enter_dashboard");
    async {
        runtime
            .usecases()
            .setup_orchestrator()
            .enter_dashboard()
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}

pub async fn cancel_setup(runtime: &AppRuntime) -> Result<SetupView, String> {
    let span = info_span!("command.setup.cancel_setup");
    async {
        runtime
            .usecases()
            .setup_orchestrator()
            .cancel_setup()
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}

/// Best-effort persisted grant state (camera, microphone, location).
pub async fn check_permission_status(
    runtime: &AppRuntime,
) -> Result<PermissionStatusReport, String> {
    let span = info_span!("command.setup.check_permission_status");
    async {
        Ok(runtime
            .usecases()
            .setup_orchestrator()
            .provider()
            .check_status()
            .await)
    }
    .instrument(span)
    .await
}
