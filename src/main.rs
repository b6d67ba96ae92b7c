//! Chan-Sweeper main entry point
//!
//! This is the command-line interface for the Chan-Sweeper image-board crawler.

use anyhow::Context;
use chan_sweeper::config::load_config;
use chan_sweeper::crawler::crawl;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Chan-Sweeper: a recurring image-board crawler
///
/// Sweeps the pages of one board section and its reply threads over and
/// over, downloading every image it has not fetched before into
/// ~/images/4chan/<SECTION>/.
#[derive(Parser, Debug)]
#[command(name = "chan-sweeper")]
#[command(version = "1.0.0")]
#[command(about = "A recurring image-board crawler", long_about = None)]
struct Cli {
    /// Board section to sweep (defaults to "s")
    #[arg(value_name = "SECTION")]
    section: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_code(&e));
        }
    };

    setup_logging();

    match run(cli).await {
        Ok(never) => match never {},
        Err(e) => {
            tracing::error!("Crawl failed: {:#}", e);
            eprintln!("Error: {:?}", e);
            ExitCode::from(1)
        }
    }
}

/// Exit code for arguments clap refused: 1 for bad usage, 0 for
/// `--help` and `--version`
fn usage_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` overrides the default filter.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chan_sweeper=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration and sweeps until something unexpected happens
async fn run(cli: Cli) -> anyhow::Result<std::convert::Infallible> {
    let config = load_config(cli.section.as_deref()).context("Failed to load configuration")?;

    tracing::info!(
        "Sweeping /{}/ ({} pages every {:?}), saving to {}",
        config.board.section,
        config.board.max_pages,
        config.schedule.sweep_interval,
        config.section_dir().display()
    );

    let section = config.board.section.clone();
    crawl(config)
        .await
        .with_context(|| format!("Crawl of /{}/ aborted", section))
}
