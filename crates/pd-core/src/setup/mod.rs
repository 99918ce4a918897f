//! Setup domain module.
//!
//! This module defines the permission setup session and its pure state machine.

pub mod session;
pub mod state_machine;

pub use session::{SetupSession, SetupView};
pub use state_machine::{SetupAction, SetupEvent, SetupStateMachine};
