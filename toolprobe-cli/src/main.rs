//! `toolprobe`: checks whether a model really supports structured tool calls.

mod summary;

use std::future;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use probe_adapters::ollama::OllamaAdapter;
use probe_config::{HarnessConfig, default_catalog, load_catalog};
use probe_kernel::{ConversationDriver, ExitStatus, SuiteRunner};
use probe_primitives::TestCase;
use probe_tools::registry::ToolRegistry;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "toolprobe")]
#[command(about = "Test LLM tool call support against an Ollama endpoint")]
#[command(version)]
struct Args {
    /// Ollama server URL
    #[arg(long, alias = "ollama-url", default_value = "http://localhost:11434")]
    endpoint: String,

    /// Model name to test
    #[arg(long, required_unless_present = "list")]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// JSON file with test cases (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override every case's round-trip cap
    #[arg(long)]
    max_round_trips: Option<NonZeroUsize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 3600)]
    timeout_secs: u64,

    /// Write the results as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the catalog and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = probe_telemetry::init_tracing(args.verbose) {
        eprintln!("warning: {err:#}");
    }

    match run(args).await {
        Ok(status) => exit_code(status),
        Err(err) => {
            error!(error = %format!("{err:#}"), "harness fault");
            eprintln!("Test execution failed: {err:#}");
            exit_code(ExitStatus::Fault)
        }
    }
}

async fn run(args: Args) -> Result<ExitStatus> {
    let cases = catalog(args.catalog.as_deref())?;

    if args.list {
        print!("{}", summary::render_catalog(&cases));
        return Ok(ExitStatus::AllPassed);
    }

    let model = args.model.context("--model is required")?;
    let mut config = HarnessConfig::new(model)?
        .with_endpoint(&args.endpoint)?
        .with_timeout(Duration::from_secs(args.timeout_secs))?;
    if let Some(max) = args.max_round_trips {
        config = config.with_max_round_trips(max);
    }
    let cases = config.apply(cases);

    let adapter = OllamaAdapter::new(config.ollama()?)?;
    let tools = Arc::new(ToolRegistry::builtin()?);
    let driver = ConversationDriver::new(Arc::new(adapter), tools);
    let runner = SuiteRunner::new(driver, cases)?;

    info!(
        model = config.model(),
        endpoint = config.endpoint(),
        cases = runner.cases().len(),
        "starting tool call tests"
    );

    let report = runner.run_until(interrupt()).await;
    print!("{}", summary::render(&report));

    if let Some(path) = &args.report {
        let body =
            serde_json::to_string_pretty(&summary::JsonReport::new(config.model(), &report))?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    Ok(report.exit_status())
}

fn catalog(path: Option<&std::path::Path>) -> Result<Vec<TestCase>> {
    match path {
        Some(path) => Ok(load_catalog(path)?),
        None => Ok(default_catalog()?),
    }
}

async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable; run cannot be interrupted");
        future::pending::<()>().await;
    }
    eprintln!("\nTests interrupted by user");
}

fn exit_code(status: ExitStatus) -> ExitCode {
    // Codes are all in 0..=4.
    ExitCode::from(u8::try_from(status.code()).unwrap_or(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["toolprobe", "--model", "llama3"]).unwrap();
        assert_eq!(args.endpoint, "http://localhost:11434");
        assert_eq!(args.timeout_secs, 3600);
        assert!(args.max_round_trips.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn accepts_legacy_url_flag_and_overrides() {
        let args = Args::try_parse_from([
            "toolprobe",
            "--ollama-url",
            "http://gpu:11434",
            "--model",
            "qwen2.5",
            "-v",
            "--max-round-trips",
            "3",
        ])
        .unwrap();
        assert_eq!(args.endpoint, "http://gpu:11434");
        assert!(args.verbose);
        assert_eq!(args.max_round_trips.map(NonZeroUsize::get), Some(3));
    }

    #[test]
    fn model_required_unless_listing() {
        assert!(Args::try_parse_from(["toolprobe"]).is_err());
        assert!(Args::try_parse_from(["toolprobe", "--list"]).is_ok());
        assert!(Args::try_parse_from(["toolprobe", "--model", "m", "--max-round-trips", "0"]).is_err());
    }

    #[tokio::test]
    async fn list_exits_cleanly() {
        let args = Args::try_parse_from(["toolprobe", "--list"]).unwrap();
        assert_eq!(run(args).await.unwrap(), ExitStatus::AllPassed);
    }

    #[tokio::test]
    async fn bad_endpoint_is_a_fault() {
        let args =
            Args::try_parse_from(["toolprobe", "--model", "m", "--endpoint", "localhost"]).unwrap();
        assert!(run(args).await.is_err());
    }
}
