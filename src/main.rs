//! Magpie main entry point
//!
//! Command-line interface for the incremental thread-link archiver.

use anyhow::Context;
use clap::Parser;
use magpie::config::load_config_or_default;
use magpie::crawler::Driver;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Magpie: an incremental news thread link archiver
///
/// Magpie crawls a link-aggregator front page on a fixed period, records
/// the outbound links found in each story's discussion thread, and
/// downloads anything it has not stored yet. Interrupt it to stop; state on
/// disk makes the next run pick up where it left off.
#[derive(Parser, Debug)]
#[command(name = "magpie")]
#[command(version)]
#[command(about = "An incremental news thread link archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single crawl cycle and exit
    #[arg(long)]
    once: bool,

    /// Append logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .context("failed to set up logging")?;

    let config = load_config_or_default(cli.config.as_deref()).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    tracing::info!(
        "Magpie starting: root {}, {} workers, period {}s",
        config.crawler.root_url,
        config.crawler.max_workers,
        config.crawler.cycle_period_secs
    );

    let driver = Driver::new(config).context("failed to initialize crawler")?;

    if cli.once {
        let report = driver.run_cycle().await?;
        tracing::info!(
            "Single cycle done: {} stories, {} new links, {} files saved",
            report.stories,
            report.new_links,
            report.saved_files
        );
        return Ok(());
    }

    driver.run_forever().await?;
    Ok(())
}

/// Sets up the tracing subscriber from the verbosity flags
///
/// At default verbosity RUST_LOG is honored when set; `-v` flags override
/// it. With `--log-file` output goes to the file, ANSI-free.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("magpie=info,warn")),
            1 => EnvFilter::new("magpie=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.init(),
    }

    Ok(())
}
