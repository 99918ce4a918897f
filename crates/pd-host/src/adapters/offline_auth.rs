//! Offline credential gateway.
//!
//! An in-process stand-in for the credential backend so the host can run
//! without network access. Accounts live only as long as the process and
//! passwords are kept as SHA-256 digests.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;

use pd_core::auth::{AuthResponse, SignupRequest, UserRecord};
use pd_core::ids::UserId;
use pd_core::ports::AuthPort;

struct Account {
    password_digest: String,
    user: UserRecord,
}

#[derive(Default)]
pub struct OfflineAuthGateway {
    accounts: RwLock<HashMap<String, Account>>,
}

impl OfflineAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn digest(email: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(email.as_bytes());
        hasher.update([0u8]);
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn normalize(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }
}

#[async_trait]
impl AuthPort for OfflineAuthGateway {
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<AuthResponse> {
        let email = Self::normalize(email);
        let accounts = self.accounts.read().await;
        let response = match accounts.get(&email) {
            Some(account) if account.password_digest == Self::digest(&email, password) => {
                AuthResponse::ok(account.user.clone())
            }
            _ => AuthResponse::failed("Invalid email or password"),
        };
        Ok(response)
    }

    async fn signup(&self, request: &SignupRequest) -> anyhow::Result<AuthResponse> {
        let email = Self::normalize(&request.email);
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Ok(AuthResponse::failed(
                "An account with this email already exists",
            ));
        }

        let user = UserRecord {
            id: UserId::new(),
            email: email.clone(),
            name: request.name.trim().to_string(),
            role: request.role,
        };
        info!(user_id = %user.id, role = %user.role, "offline account created");
        accounts.insert(
            email.clone(),
            Account {
                password_digest: Self::digest(&email, &request.password),
                user: user.clone(),
            },
        );
        Ok(AuthResponse::ok(user))
    }
}
