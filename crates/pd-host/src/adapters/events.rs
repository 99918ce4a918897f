//! Setup event emitter.
//!
//! Fans setup state changes out to every subscriber (UI shell, CLI) on a
//! tokio broadcast channel.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use pd_core::ports::SetupEventPort;
use pd_core::setup::SetupView;

const CHANNEL_CAPACITY: usize = 64;

pub struct BroadcastSetupEventEmitter {
    sender: broadcast::Sender<SetupView>,
}

impl BroadcastSetupEventEmitter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SetupView> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastSetupEventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SetupEventPort for BroadcastSetupEventEmitter {
    async fn emit_setup_state_changed(&self, view: SetupView) {
        // No receivers is not an error: nobody is watching the setup screen.
        let receivers = self.sender.send(view).unwrap_or(0);
        debug!(receivers, "setup state change emitted");
    }
}
