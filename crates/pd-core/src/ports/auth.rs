//! Credential backend port.
//!
//! The backend itself is external; this crate only consumes its two operations.

use async_trait::async_trait;

use crate::auth::{AuthResponse, SignupRequest};

#[async_trait]
pub trait AuthPort: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<AuthResponse>;

    async fn signup(&self, request: &SignupRequest) -> anyhow::Result<AuthResponse>;
}
