// dugout entry point.
//
// 1. Parse arguments
// 2. Load config (copying shipped defaults into config/ on first run)
// 3. Initialize tracing: stderr for batch commands, a log file for the
//    report viewer, which owns the terminal
// 4. Dispatch the subcommand

use anyhow::Context;
use clap::Parser;
use dugout_core::config::{self, Config};
use dugout_tui::cli::{self, Cli};
use tracing::info;

const DEFAULT_FILTER: &str =
    "dugout=info,dugout_tui=info,dugout_app=info,dugout_collect=info,dugout_baseball=info,warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = config::load_config().context("failed to load configuration")?;
    init_tracing(&config, args.command.is_interactive())?;
    info!("dugout {} starting", env!("CARGO_PKG_VERSION"));

    cli::run(args.command, &config).await
}

fn init_tracing(config: &Config, to_file: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if to_file {
        let log_dir = std::path::PathBuf::from(&config.data.logs_dir);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("failed to create {}", log_dir.display()))?;
        let log_file = std::fs::File::create(log_dir.join("dugout.log"))?;

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to set tracing subscriber")?;
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to set tracing subscriber")?;
    }
    Ok(())
}
