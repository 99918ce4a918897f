use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ids::UserId;

/// Platform role. Only `proctor` goes through permission setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Proctor,
    Student,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Proctor => "proctor",
            UserRole::Student => "student",
            UserRole::Admin => "admin",
        }
    }

    pub fn requires_permission_setup(&self) -> bool {
        matches!(self, UserRole::Proctor)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proctor" => Ok(UserRole::Proctor),
            "student" => Ok(UserRole::Student),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated user as returned by login/signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl UserRecord {
    pub fn is_proctor(&self) -> bool {
        self.role.requires_permission_setup()
    }
}
