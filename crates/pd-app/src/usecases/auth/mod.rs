//! Authentication use cases.

mod authenticate;

pub use authenticate::{AuthError, AuthOutcome, AuthenticateUser};
