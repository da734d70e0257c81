use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    nextread::logging::init().context("init logging")?;

    let cli = nextread::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        nextread::cli::Command::Steps => {
            nextread::steps::run();
        }
        nextread::cli::Command::Recommend(args) => {
            nextread::wizard::run(args).await.context("recommend")?;
        }
        nextread::cli::Command::Stats(args) => {
            nextread::stats::run(args).context("stats")?;
        }
        nextread::cli::Command::Lists { command } => {
            nextread::lists::run(command).context("lists")?;
        }
    }

    Ok(())
}
