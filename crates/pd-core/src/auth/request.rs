use serde::{Deserialize, Serialize};

use super::{UserRecord, UserRole};

/// Result of a login or signup call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Option<UserRecord>,
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn ok(user: UserRecord) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

/// Form-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("name", &self.name)
    }
}

/// Rejects blank values for a required form field.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_validation_reports_first_blank_field() {
        let request = SignupRequest {
            email: "ada@example.com".to_string(),
            password: "  ".to_string(),
            name: String::new(),
            role: UserRole::Student,
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField { field: "password" })
        );
    }
}
