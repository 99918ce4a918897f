//! Session commands
//! 会话命令

use tracing::{info_span, Instrument};

use pd_core::auth::UserRecord;

use crate::bootstrap::AppRuntime;
use crate::commands::map_err;

pub async fn current_user(runtime: &AppRuntime) -> Result<Option<UserRecord>, String> {
    let span = info_span!("command.session.current_user");
    async {
        runtime
            .usecases()
            .current_session()
            .current_user()
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}

pub async fn sign_out(runtime: &AppRuntime) -> Result<(), String> {
    let span = info_span!("command.session.sign_out");
    async {
        runtime
            .usecases()
            .current_session()
            .sign_out()
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}
