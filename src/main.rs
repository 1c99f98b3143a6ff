//! `breedline`: breeding-plan lifecycle tracker

use clap::Parser;
use clap::error::ErrorKind;

use breedline::cli::args::Cli;
use breedline::cli::commands;
use breedline::error::ExitCode;
use breedline::observability::{describe_metrics, init_logging};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::USAGE_ERROR,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }
    describe_metrics();

    tokio::spawn(wait_for_shutdown());

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

/// Exits on the first Ctrl+C or SIGTERM.
///
/// A plan write in flight is a single rename, so there is nothing to drain.
#[cfg(unix)]
async fn wait_for_shutdown() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted();
            }
            return;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if result.is_ok() {
                interrupted();
            }
        }
        _ = sigterm.recv() => {
            eprintln!("\nterminated");
            std::process::exit(ExitCode::TERMINATED);
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown() {
    if tokio::signal::ctrl_c().await.is_ok() {
        interrupted();
    }
}

fn interrupted() -> ! {
    eprintln!("\ninterrupted");
    std::process::exit(ExitCode::INTERRUPTED);
}
