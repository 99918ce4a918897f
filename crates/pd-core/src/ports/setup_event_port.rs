use crate::setup::SetupView;

#[async_trait::async_trait]
pub trait SetupEventPort: Send + Sync {
    async fn emit_setup_state_changed(&self, view: SetupView);
}
