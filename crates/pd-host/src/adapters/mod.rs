pub mod events;
pub mod navigation;
pub mod offline_auth;

pub use events::BroadcastSetupEventEmitter;
pub use navigation::HeadlessNavigation;
pub use offline_auth::OfflineAuthGateway;
