pub mod auth;
pub mod session;
pub mod setup;

pub use auth::{AuthError, AuthOutcome, AuthenticateUser};
pub use session::{CurrentSession, FinalizeSession};
pub use setup::{SetupError, SetupOrchestrator};
