use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::checkers::Exercise;
use crate::config::GraderConfig;
use crate::core::grader::Grader;
use crate::core::transcript::Markup;
use crate::native::executor::NativeExecutor;

mod checkers;
mod config;
mod constants;
mod core;
mod native;
#[cfg(test)]
mod stubs;

/// Compiles and runs a Java exercise submission and grades it.
#[derive(Debug, Parser)]
#[command(name = "codegrader", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exercise to grade against. Without it the program is only executed.
    #[arg(long, value_enum)]
    exercise: Option<Exercise>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long, value_enum)]
    markup: Option<Markup>,

    /// Print the outcome as JSON instead of the transcript.
    #[arg(long)]
    json: bool,

    source_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    set_panic_hook();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("Grading aborted: {}", e);
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

#[tracing::instrument]
async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = GraderConfig::load(cli.config.as_deref())?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(markup) = cli.markup {
        config.markup = markup;
    }
    tracing::debug!("Effective config: {:?}", config);

    let source = tokio::fs::read_to_string(&cli.source_file).await?;
    let executor = NativeExecutor::new(config.tool_command()?);
    let grader = Grader::new(
        Arc::new(executor),
        &config.work_dir,
        Duration::from_millis(config.timeout_ms),
    )
    .with_markup(config.markup);

    let checker = cli.exercise.map(Exercise::checker);
    let report = grader.grade(&source, checker.as_deref()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.transcript);
    }

    Ok(report.outcome.success)
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
