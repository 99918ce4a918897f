use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pd_core::auth::UserRole;
use pd_core::permission::PermissionCapability;
use pd_host::{HostOptions, MediaBackendChoice};

/// Proctor onboarding from the terminal
#[derive(Parser, Debug)]
#[command(name = "proctordesk", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub host: HostArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    /// TOML config file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Media backend
    #[arg(long, value_enum, default_value_t = BackendArg::Auto, global = true)]
    pub backend: BackendArg,

    /// Simulated backend: always deny this capability (repeatable)
    #[arg(long, value_name = "CAPABILITY", global = true)]
    pub deny: Vec<PermissionCapability>,

    /// Simulated backend: deny the first request for this capability (repeatable)
    #[arg(long, value_name = "CAPABILITY", global = true)]
    pub deny_once: Vec<PermissionCapability>,
}

impl HostArgs {
    pub fn options(&self) -> HostOptions {
        HostOptions {
            backend: self.backend.into(),
            deny: self.deny.clone(),
            deny_once: self.deny_once.clone(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Auto,
    Simulated,
    Device,
}

impl From<BackendArg> for MediaBackendChoice {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Auto => MediaBackendChoice::Auto,
            BackendArg::Simulated => MediaBackendChoice::Simulated,
            BackendArg::Device => MediaBackendChoice::Device,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account; proctors then walk the permission steps
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "proctor")]
        role: UserRole,
        /// Attempts per step before setup is abandoned
        #[arg(long, default_value_t = 3)]
        max_attempts: u32,
    },
    /// List the permission steps
    Steps,
    /// Report persisted permission state (camera, microphone, location)
    Status,
    /// Print the signed-in user, if any
    Session,
    /// Clear the persisted session
    SignOut,
}
