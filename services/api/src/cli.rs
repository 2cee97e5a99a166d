use std::path::PathBuf;
use std::sync::Arc;

use crate::server;
use ats_fit::analysis::{AnalysisPipeline, AnalysisRequest, MockScorer};
use ats_fit::config::AppConfig;
use ats_fit::error::AppError;
use ats_fit::propagation::DisabledDispatcher;
use ats_fit::telemetry;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ATS Fit",
    about = "Reconcile ATS exports, score applications, and propagate statuses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Analyze a saved `{profiles, jobs, applications}` payload without touching the ATS
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file holding the combined payload
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Seed the placeholder scorer for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_offline_analysis(args),
    }
}

fn run_offline_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = std::fs::read_to_string(&args.input)?;
    let request: AnalysisRequest = serde_json::from_str(&raw)
        .map_err(|err| AppError::bad_request(format!("{}: {err}", args.input.display())))?;

    let scorer = match args.seed {
        Some(seed) => MockScorer::seeded(seed),
        None => MockScorer::new(),
    }
    .without_signals();
    let pipeline = AnalysisPipeline::new(Arc::new(scorer), Arc::new(DisabledDispatcher));
    let report = pipeline.analyze(request);

    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    println!("{rendered}");
    Ok(())
}
