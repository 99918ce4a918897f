use clap::Parser;

use proctordesk_lib::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    cli::run(args).await
}
