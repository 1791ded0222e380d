use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use switchwatch::gpio::FileDigitalInput;
use switchwatch::notify::{LogNotifier, StdoutNotifier};
use switchwatch::{AppConfig, Notifier, Poller};
use switchwatch_core::{MockDigitalInput, SharedDigitalInput};

/// switchwatch - power switch-over and sensor status monitor
#[derive(Parser, Debug, Clone)]
#[command(name = "switchwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Override the poll interval from the config (milliseconds)
    #[arg(short = 'i', long = "interval", value_name = "MS")]
    interval: Option<u64>,

    /// Sample once, print the report and exit
    #[arg(long = "once")]
    once: bool,

    /// Send change reports to the log instead of standard output
    #[arg(long = "log-only")]
    log_only: bool,

    /// Use in-memory pins (all low) instead of the pin directory
    #[arg(long = "simulate")]
    simulate: bool,

    /// Config file to load instead of the default location
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting switchwatch v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config_file {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    let gpio: SharedDigitalInput = if cli.simulate {
        warn!("Running with simulated pins");
        Arc::new(MockDigitalInput::new())
    } else {
        Arc::new(FileDigitalInput::new(config.pin_directory.clone()))
    };

    let mut registry = config.build_registry(&gpio);

    if cli.once {
        let outcome = registry.sample_all();
        println!("{}", registry.render_report(&outcome.triggered_by));
        return Ok(());
    }

    let interval = match cli.interval {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ => config.poll_interval(),
    };

    let mut poller = Poller::new(registry, interval);
    println!("{}", poller.handle().render_report().await);

    if cli.log_only {
        run_until_interrupted(&mut poller, &LogNotifier).await
    } else {
        run_until_interrupted(&mut poller, &StdoutNotifier).await
    }
}

async fn run_until_interrupted<N: Notifier>(poller: &mut Poller, notifier: &N) -> Result<()> {
    tokio::select! {
        _ = poller.run(notifier) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
