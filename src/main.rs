//! # winter-trends
//!
//! Command-line interface for the winter climate trend analysis.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use winter_trends::claims::ClaimSet;
use winter_trends::config::AnalysisConfig;
use winter_trends::pipeline::Pipeline;
use winter_trends::report::VerificationReport;

#[derive(Parser)]
#[command(name = "winter-trends")]
#[command(about = "Winter climate trends, forecasts and claim checks for one station", long_about = None)]
struct Cli {
    /// Cleaned station CSV (overrides the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Analysis configuration (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Linear trend report for every variable
    Trends,

    /// Robust trend statistics, backtest and Holt preview
    Validate,

    /// Backtest, select and forecast every variable, writing CSV tables
    Forecast {
        /// Model summary CSV (overrides the config file)
        #[arg(long)]
        summary_out: Option<PathBuf>,

        /// Forecast CSV (overrides the config file)
        #[arg(long)]
        forecast_out: Option<PathBuf>,
    },

    /// Check literal claims against the data
    Verify {
        /// Claims file (TOML, overrides the config file)
        #[arg(long)]
        claims: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "winter_trends=debug"
    } else {
        "winter_trends=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AnalysisConfig::load_or_default(cli.config.as_deref())
        .context("failed to load analysis configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let data_path = config.data_path.clone();
    let pipeline = Pipeline::load(config)
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    match cli.command {
        Commands::Trends => print!("{}", pipeline.trend_report()),
        Commands::Validate => print!("{}", pipeline.validation_report()),
        Commands::Forecast {
            summary_out,
            forecast_out,
        } => {
            let section = &pipeline.config().forecast;
            let summary_path = summary_out.unwrap_or_else(|| section.model_summary_path.clone());
            let forecast_path = forecast_out.unwrap_or_else(|| section.forecast_path.clone());

            let run = pipeline.forecast_all();
            run.write(&summary_path, &forecast_path)
                .context("failed to write forecast tables")?;
            print!("{run}");
            println!("Saved: {}", summary_path.display());
            println!("Saved: {}", forecast_path.display());
            if run.failed() == run.forecasts.len() {
                bail!("no variable could be forecast");
            }
        }
        Commands::Verify { claims } => {
            let path = claims.unwrap_or_else(|| pipeline.config().claims_path.clone());
            let claims = ClaimSet::load(&path)
                .with_context(|| format!("failed to load claims from {}", path.display()))?;
            let outcomes = pipeline.verify(&claims);
            let report = VerificationReport::new(&outcomes);
            print!("{report}");
            let summary = report.summary();
            if !summary.all_passed() {
                bail!("{} of {} claims failed", summary.failed, outcomes.len());
            }
        }
    }

    Ok(())
}
