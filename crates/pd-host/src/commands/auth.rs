//! Authentication commands
//! 登录/注册命令

use tracing::{info_span, Instrument};

use pd_app::AuthOutcome;
use pd_core::auth::SignupRequest;

use crate::bootstrap::AppRuntime;
use crate::commands::map_err;

pub async fn login(
    runtime: &AppRuntime,
    email: String,
    password: String,
) -> Result<AuthOutcome, String> {
    let span = info_span!("command.auth.login");
    async {
        runtime
            .usecases()
            .authenticate_user()
            .login(&email, &password)
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}

pub async fn signup(runtime: &AppRuntime, request: SignupRequest) -> Result<AuthOutcome, String> {
    let span = info_span!("command.auth.signup", role = %request.role);
    async {
        runtime
            .usecases()
            .authenticate_user()
            .signup(request)
            .await
            .map_err(map_err)
    }
    .instrument(span)
    .await
}
