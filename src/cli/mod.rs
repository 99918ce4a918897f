//! Terminal front end over the host commands.
//!
//! Results are printed to stdout as JSON; progress and instructions go to
//! stderr alongside the console log.

mod args;
mod onboarding;

pub use args::{BackendArg, Cli, Command, HostArgs};

use anyhow::{anyhow, Context};
use tracing::info;

use pd_app::AuthOutcome;
use pd_core::auth::SignupRequest;
use pd_core::permission::SETUP_STEPS;
use pd_core::ports::AppDirsPort;
use pd_host::bootstrap::{init_tracing_subscriber, resolve_config, wire_runtime};
use pd_host::commands::{auth, session, setup};
use pd_platform::app_dirs::DirsAppDirsAdapter;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("failed to resolve application directories")?;
    init_tracing_subscriber(Some(&app_dirs))?;

    let config = resolve_config(cli.host.config.clone())?;
    let runtime = wire_runtime(config, cli.host.options(), &app_dirs);
    info!(backend = ?cli.host.backend, "proctordesk started");

    match cli.command {
        Command::Signup {
            email,
            password,
            name,
            role,
            max_attempts,
        } => {
            let request = SignupRequest {
                email,
                password,
                name,
                role,
            };
            let user = match auth::signup(&runtime, request).await.map_err(anyhow::Error::msg)? {
                AuthOutcome::Authenticated(user) => user,
                AuthOutcome::SetupRequired(_) => {
                    onboarding::walk_setup(&runtime, max_attempts).await?
                }
            };
            print_json(&user)
        }
        Command::Steps => print_json(&SETUP_STEPS),
        Command::Status => {
            let report = setup::check_permission_status(&runtime)
                .await
                .map_err(anyhow::Error::msg)?;
            print_json(&report)
        }
        Command::Session => {
            let user = session::current_user(&runtime)
                .await
                .map_err(anyhow::Error::msg)?;
            print_json(&user)
        }
        Command::SignOut => {
            session::sign_out(&runtime)
                .await
                .map_err(anyhow::Error::msg)?;
            eprintln!("signed out");
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|err| anyhow!(err))?;
    println!("{rendered}");
    Ok(())
}
