//! mldebug CLI entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use mldebug::app::{App, MetricSources};
use mldebug::config::{Config, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mldebug", version, about = "Diagnose ML training problems from training metrics")]
struct Cli {
    /// Config file (defaults to .mldebug/config.yml or mldebug.yml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Diagnose a set of training metrics
    Diagnose {
        /// Metric as name=value, e.g. train_accuracy=95 (repeatable)
        #[arg(short, long = "metric", value_name = "NAME=VALUE")]
        metrics: Vec<String>,

        /// JSON file with a metrics object, or - for stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Text file containing a JSON metrics object (e.g. a saved model reply), or - for stdin
        #[arg(short, long, value_name = "FILE")]
        extract: Option<PathBuf>,
    },
    /// Answer prompts for each metric, then diagnose
    Interactive,
    /// List the diagnostic rules in evaluation order
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    log::debug!("mldebug v{}", env!("CARGO_PKG_VERSION"));
    match &config.source {
        Some(path) => log::debug!("Using config {}", path.display()),
        None => log::debug!("No config file, using defaults"),
    }

    let app = App::new(config);

    match cli.command {
        Command::Diagnose {
            metrics,
            input,
            extract,
        } => {
            let sources = MetricSources {
                input,
                extract,
                pairs: metrics,
            };
            let metrics = app.gather(&sources)?;
            let result = app.diagnose(&metrics)?;
            print!("{}", app.render(&result, cli.format)?);
        }
        Command::Interactive => {
            // Prompts go to stderr so stdout carries only the report
            let stdin = std::io::stdin();
            let metrics = app.interactive(stdin.lock(), std::io::stderr())?;
            let result = app.diagnose(&metrics)?;
            print!("{}", app.render(&result, cli.format)?);
        }
        Command::Rules => {
            print!("{}", app.describe_rules());
        }
    }

    Ok(())
}
