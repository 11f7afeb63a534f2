mod cli;
mod config;
mod errors;
mod merge;
mod models;
mod pipeline;
mod render;
mod sanitize;
mod walk;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::pipeline::{Outcome, RunOptions};

const FALLBACK_LOG_LEVEL: &str = "error";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first so the log level can come from it
    let config = Config::load(&cli.config_file, &[Config::from_env(), cli.overrides()])
        .with_context(|| format!("Error reading configuration file {}", cli.config_file.display()))?;

    // Initialize structured logging (stderr, so --print output stays clean)
    let level = config.tracing_level();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME"),
                level.unwrap_or(FALLBACK_LOG_LEVEL)
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if level.is_none() {
        error!("Invalid log level: {}", config.log_level);
    }
    info!("Starting resumake v{}", env!("CARGO_PKG_VERSION"));

    let options = RunOptions {
        force: cli.force,
        print: cli.print,
    };
    let outcome = match pipeline::run(&config, &cli.resume, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            if err.is_security_risk() {
                error!("Aborting before any TeX is written: {err}");
            }
            return Err(anyhow::Error::new(err)
                .context(format!("Error generating résumé from {}", cli.resume.display())));
        }
    };

    match outcome {
        Outcome::Printed(json) => println!("{json}"),
        Outcome::Written(paths) => {
            for path in paths {
                info!("Generated TeX file: {}", path.display());
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
