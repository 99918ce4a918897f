pub mod config;
pub mod runtime;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_config};
pub use runtime::{AppRuntime, HostDeps, UseCases};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{wire_runtime, HostOptions, MediaBackendChoice};
