//! ProctorDesk Application Orchestration Layer
//!
//! This crate contains the media capability provider and the use cases that
//! drive proctor onboarding: permission setup, session finalization and the
//! authentication hand-off.

pub mod media;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use media::MediaCapabilityProvider;
pub use usecases::{
    AuthError, AuthOutcome, AuthenticateUser, CurrentSession, FinalizeSession, SetupError,
    SetupOrchestrator,
};
