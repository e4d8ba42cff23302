//! rslog driver.
//!
//! Builds a logger from a config file and command-line overrides, writes a
//! few sample records, and optionally keeps running to apply config reloads.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rslog::config::{ConfigWatcher, FileConfig};
use rslog::{load_config, Encoding, Field, LogConfig, Logger, Severity};

#[derive(Parser)]
#[command(name = "rslog")]
#[command(about = "Write sample records through a configured logger", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum level (debug, info, warn, error).
    #[arg(short, long)]
    level: Option<String>,

    /// Also write to a daily-rotating file.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Days to keep rotated files.
    #[arg(long)]
    max_days: Option<u32>,

    /// JSON lines instead of console output.
    #[arg(long)]
    json: bool,

    /// Keep running and apply config file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

impl Cli {
    fn overlay(&self, config: &mut LogConfig) {
        if let Some(level) = &self.level {
            config.level = level.clone();
        }
        if let Some(filename) = &self.file {
            let file = config.file.get_or_insert_with(FileConfig::default);
            file.filename = filename.clone();
        }
        if let (Some(days), Some(file)) = (self.max_days, config.file.as_mut()) {
            file.max_days = days;
        }
        if self.json {
            config.encoding = Encoding::Json;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rslog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LogConfig::default(),
    };
    cli.overlay(&mut config);

    tracing::info!(
        level = %config.level,
        encoding = ?config.encoding,
        file = ?config.file.as_ref().map(|f| &f.filename),
        "Configuration loaded"
    );

    let logger = Logger::from_config(&config)?;
    write_samples(&logger);

    if cli.watch {
        if let Some(path) = &cli.config {
            let (watcher, mut updates) = ConfigWatcher::new(path);
            let _watcher = watcher.run()?;

            loop {
                tokio::select! {
                    Some(update) = updates.recv() => {
                        logger.apply(&update);
                        tracing::info!(level = %logger.level(), "Logger reconfigured");
                        write_samples(&logger);
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted, shutting down");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn write_samples(logger: &Logger) {
    logger.debug(&[&"cache warmed,", &128, &"entries"]);
    logger.info(&[&"service ready"]);
    rslog::warnf!(logger, "disk usage at {}%", 91);
    logger.log_with(
        Severity::Error,
        "upstream call failed",
        &[
            Field::new("attempt", 3),
            Field::new("elapsed", std::time::Duration::from_millis(1500)),
        ],
    );
}
