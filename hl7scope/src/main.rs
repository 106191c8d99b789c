//! HL7 v2 message data quality analyzer.
//!
//! Reads a message from a file or stdin, runs the quality check battery and
//! prints a scored report.
//!
//! # Guarantees
//! - Offline operation, nothing leaves the machine
//! - Field values are never logged

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hl7scope_core::{
    CheckId, Hl7ScopeError, QualityAnalyzer, QualityConfig, RecommendationSource, Result,
    init_logging,
    samples::{SampleKind, USE_CASES},
};
use tracing::{debug, info, warn};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "hl7scope")]
#[command(about = "HL7 v2 message data quality analyzer")]
#[command(version)]
#[command(long_about = "
hl7scope - HL7 v2 message data quality analysis

Scores a message from 0 to 100 and lists the issues found:
- Header, patient and visit completeness
- Date, identifier, address and phone formatting
- Patient class consistency
- Admit/discharge and birth/death date order
- HL7 version compliance

EXAMPLES:
  hl7scope analyze message.hl7
  hl7scope analyze --format json --min-score 90 message.hl7
  hl7scope sample adt | hl7scope analyze
  hl7scope analyze --disable-check phone_format,address_format message.hl7
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a message and print a quality report
    Analyze(AnalyzeArgs),
    /// Print a built-in sample message
    Sample(SampleArgs),
    /// List the quality checks
    Checks,
    /// List supported analysis use cases
    UseCases(UseCasesArgs),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Message file
    #[arg(help = "Message file to analyze (stdin when omitted or '-')")]
    pub file: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Quality configuration file
    #[arg(long, value_name = "FILE", help = "JSON quality configuration file")]
    pub config: Option<PathBuf>,

    /// Checks to skip
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "ID",
        help = "Comma-separated list of check ids to skip (see `hl7scope checks`)"
    )]
    pub disable_check: Vec<CheckId>,

    /// Recommendation list source
    #[arg(long, value_enum, help = "How the top-level recommendation list is built")]
    pub recommendations: Option<RecommendationArg>,

    /// Minimum acceptable score
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(0..=100),
        help = "Exit with a non-zero status when the score is below this value"
    )]
    pub min_score: Option<u8>,
}

#[derive(Args)]
pub struct SampleArgs {
    /// Sample to print
    #[arg(value_enum, default_value_t = SampleArg::Adt)]
    pub kind: SampleArg,
}

#[derive(Args)]
pub struct UseCasesArgs {
    /// Listing format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress all log output except errors"
    )]
    pub quiet: bool,
}

/// Recommendation sources accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecommendationArg {
    /// Every issue's recommendation plus check-level advice
    Issues,
    /// Check-level advice only
    Explicit,
}

impl From<RecommendationArg> for RecommendationSource {
    fn from(arg: RecommendationArg) -> Self {
        match arg {
            RecommendationArg::Issues => Self::Issues,
            RecommendationArg::Explicit => Self::Explicit,
        }
    }
}

/// Built-in samples accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleArg {
    /// ADT^A01 admission
    Adt,
    /// ORU^R01 lab result
    Oru,
    /// Structurally invalid text
    Invalid,
}

impl From<SampleArg> for SampleKind {
    fn from(arg: SampleArg) -> Self {
        match arg {
            SampleArg::Adt => Self::Adt,
            SampleArg::Oru => Self::Oru,
            SampleArg::Invalid => Self::Invalid,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    match &cli.command {
        Some(Command::Analyze(args)) => analyze(args),
        Some(Command::Sample(args)) => {
            print_sample(args.kind);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Checks) => {
            list_checks();
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::UseCases(args)) => {
            println!("{}", output::render_use_cases(USE_CASES, args.format)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("hl7scope v{}", env!("CARGO_PKG_VERSION"));
            println!("HL7 v2 message data quality analyzer");
            println!("Use --help for available commands");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs the analyzer and prints the report.
fn analyze(args: &AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let config = build_config(args).context("Invalid quality configuration")?;
    let raw = read_input(args.file.as_deref()).context("Failed to read message")?;

    debug!("Read {} bytes of message text", raw.len());

    let report = QualityAnalyzer::new(config).analyze(&raw);
    println!("{}", output::render(&report, args.format)?);

    if let Some(min_score) = args.min_score
        && report.overall_score < min_score
    {
        warn!(
            "Quality score {} is below the minimum of {}",
            report.overall_score, min_score
        );
        return Ok(ExitCode::FAILURE);
    }

    info!("Analysis finished with score {}", report.overall_score);
    Ok(ExitCode::SUCCESS)
}

/// Builds the quality configuration from an optional file plus CLI overrides.
fn build_config(args: &AnalyzeArgs) -> Result<QualityConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => QualityConfig::default(),
    };

    for check in &args.disable_check {
        config = config.without_check(*check);
    }
    if let Some(source) = args.recommendations {
        config = config.with_recommendation_source(source.into());
    }

    config
        .validate()
        .map_err(|e| Hl7ScopeError::configuration(e.to_string()))?;

    Ok(config)
}

/// Loads a JSON quality configuration. Missing keys take their defaults.
fn load_config(path: &Path) -> Result<QualityConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Hl7ScopeError::io(format!("Failed to read {}", path.display()), e))?;

    serde_json::from_str(&content).map_err(|e| {
        Hl7ScopeError::serialization(format!("Failed to parse {}", path.display()), e)
    })
}

/// Reads the message from a file, or from stdin when `path` is absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| Hl7ScopeError::io(format!("Failed to read {}", path.display()), e)),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| Hl7ScopeError::io("Failed to read stdin", e))?;
            Ok(buffer)
        }
    }
}

/// Prints a sample with one segment per line.
fn print_sample(kind: SampleArg) {
    let message = SampleKind::from(kind).message();
    for segment in message.split(['\r', '\n']) {
        println!("{}", segment);
    }
}

/// Lists the check battery in execution order.
fn list_checks() {
    println!("Quality checks (in execution order):");
    for check in CheckId::ALL {
        println!("  {:<27} {}", check.as_str(), check.description());
    }
}
