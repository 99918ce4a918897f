//! Walks a proctor through every pending setup step.

use anyhow::bail;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use pd_core::auth::UserRecord;
use pd_core::permission::PermissionCapability;
use pd_core::setup::SetupView;
use pd_host::commands::setup;
use pd_host::AppRuntime;

pub(crate) async fn walk_setup(runtime: &AppRuntime, max_attempts: u32) -> anyhow::Result<UserRecord> {
    let mut events = runtime.deps().events.subscribe();

    loop {
        match setup::get_state(runtime).await.map_err(anyhow::Error::msg)? {
            SetupView::Complete { .. } => break,
            SetupView::NotStarted => bail!("permission setup is not active"),
            SetupView::AwaitingStep {
                advancing: true, ..
            } => wait_for_advance(&mut events).await,
            SetupView::AwaitingStep {
                index, total, step, ..
            } => {
                eprintln!("[{index}/{total}] {}: {}", step.title, step.description);
                grant_with_retries(runtime, step.capability, max_attempts).await?;
            }
        }
    }

    eprintln!("All permissions granted. Entering dashboard.");
    setup::enter_dashboard(runtime)
        .await
        .map_err(anyhow::Error::msg)
}

async fn grant_with_retries(
    runtime: &AppRuntime,
    capability: PermissionCapability,
    max_attempts: u32,
) -> anyhow::Result<()> {
    for attempt in 1..=max_attempts {
        match setup::grant_permission(runtime, capability).await {
            Ok(_) => {
                info!(capability = %capability, attempt, "step granted");
                eprintln!("  {capability} granted");
                return Ok(());
            }
            Err(message) => {
                warn!(capability = %capability, attempt, error = %message, "step not granted");
                eprintln!("  {message}");
            }
        }
    }

    if let Err(err) = setup::cancel_setup(runtime).await {
        warn!(error = %err, "cancel after exhausted attempts failed");
    }
    bail!("{capability} was not granted after {max_attempts} attempts")
}

/// Returns once a non-advancing view has been emitted.
///
/// A stale view may end the wait early; the caller re-reads the state.
async fn wait_for_advance(events: &mut broadcast::Receiver<SetupView>) {
    loop {
        match events.recv().await {
            Ok(SetupView::AwaitingStep {
                advancing: true, ..
            }) => continue,
            Ok(_) => return,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "setup event receiver lagged");
            }
            Err(RecvError::Closed) => return,
        }
    }
}
