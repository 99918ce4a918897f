//! # pd-host
//!
//! Host adapter layer for ProctorDesk.
//!
//! Loads configuration, initializes tracing, wires ports to adapters and
//! exposes the command handlers a UI shell or the CLI invokes.

pub mod adapters;
pub mod bootstrap;
pub mod commands;

pub use bootstrap::{AppRuntime, HostOptions, MediaBackendChoice};
