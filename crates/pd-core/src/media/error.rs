use thiserror::Error;

/// Failure reported by a platform capture or sensor primitive.
///
/// These are the raw causes; the provider maps them onto
/// [`crate::permission::PermissionError`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformMediaError {
    #[error("permission denied by user or policy")]
    NotAllowed,

    #[error("no matching device found")]
    NotFound,

    #[error("constraints cannot be satisfied: {0}")]
    OverConstrained(String),

    #[error("request timed out")]
    Timeout,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("capability not supported on this platform")]
    Unsupported,

    #[error("platform error: {0}")]
    Other(String),
}
