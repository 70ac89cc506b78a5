use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use lunar_elongation::config::AnalysisConfig;
use lunar_elongation::ephemeris::{AnalyticEphemeris, SignedDms};
use lunar_elongation::pipeline::{aggregate_plan, mean_elongations, run_batch};
use lunar_elongation::store::StoreFactory;
use lunar_elongation::{BatchPlan, EpochPipeline, Sampler};

/// Moon–Sun elongation sampling and aggregation
#[derive(Parser, Debug)]
#[command(author, version, about = "Lunar elongation distribution analysis")]
struct Args {
    /// Configuration file (defaults to elongation.toml in a standard location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding cached distributions
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Number of epochs in the batch
    #[arg(long)]
    epochs: Option<u32>,

    /// Metonic cycles per epoch
    #[arg(long)]
    multiplier: Option<u32>,

    /// Sampling step in minutes
    #[arg(long)]
    resolution: Option<u32>,

    /// Span of each epoch in years
    #[arg(long)]
    duration_years: Option<f64>,

    /// Start of the first epoch (RFC 3339, e.g. 1971-01-01T00:00:00Z)
    #[arg(long)]
    initial_time: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the mean folded elongation of every epoch
    Mean {
        /// Print full statistics instead of the mean alone
        #[arg(long)]
        stats: bool,
    },
    /// Sample, bin and store every epoch not already stored
    Run,
    /// Combine the stored distributions of every epoch
    Aggregate {
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Transform::Raw)]
        transform: Transform,
    },
}

/// Shape of the aggregate output.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Transform {
    /// The 360 bucket frequencies
    Raw,
    /// Each bucket minus the uniform level 1/360
    Baseline,
    /// New-moon and full-moon halves and their difference
    Halves,
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AnalysisConfig::from_default_location()
            .context("Failed to load default configuration")?
            .unwrap_or_default(),
    };

    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = dir.clone();
    }
    if let Some(epochs) = args.epochs {
        config.batch.epoch_count = epochs;
    }
    if let Some(multiplier) = args.multiplier {
        config.batch.metonic_multiplier = multiplier;
    }
    if let Some(resolution) = args.resolution {
        config.sampling.resolution_minutes = resolution;
    }
    if let Some(years) = args.duration_years {
        config.sampling.duration_years = Some(years);
    }
    if let Some(start) = args.initial_time {
        config.batch.initial_time = start;
    }

    config.validate().context("Invalid command-line overrides")?;
    Ok(config)
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => writeln!(io::stdout().lock(), "{}", json)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let plan = BatchPlan::from_config(&config);
    let sampler = Sampler::new(AnalyticEphemeris::new(), config.sampler_config());

    info!(
        "{} epochs of {} Metonic cycle(s), {} years at {} minute resolution from {}",
        plan.epoch_count,
        plan.metonic_multiplier,
        plan.duration_years,
        plan.resolution_minutes,
        plan.initial_time
    );

    match args.command {
        Command::Mean { stats: false } => {
            let mut out = io::stdout().lock();
            for epoch in mean_elongations(&sampler, &plan)? {
                writeln!(
                    out,
                    "{}  {:.6}  {}",
                    epoch.start_time.format("%Y-%m-%d %H:%M:%S"),
                    epoch.mean,
                    SignedDms::from_degrees(epoch.mean)
                )?;
            }
        }
        Command::Mean { stats: true } => {
            let mut out = io::stdout().lock();
            for request in plan.requests()? {
                let stats = sampler.elongation_stats(
                    &request.start_time,
                    request.duration_years,
                    request.resolution_minutes,
                )?;
                writeln!(out, "{}  {}", request.start_time.format("%Y-%m-%d %H:%M:%S"), stats)?;
            }
        }
        Command::Run => {
            let store = StoreFactory::create(&config.storage).context("Failed to open store")?;
            let pipeline = EpochPipeline::new(sampler, store);
            let report = run_batch(&pipeline, &plan)?;
            println!(
                "{} epochs: {} computed, {} skipped",
                report.total(),
                report.computed.len(),
                report.skipped.len()
            );
        }
        Command::Aggregate { output, transform } => {
            let store = StoreFactory::create(&config.storage).context("Failed to open store")?;
            let combined = aggregate_plan(&store, &plan)?;
            let (peak, level) = combined.peak();
            info!("Peak at {}° with frequency {:.6}", peak, level);

            match transform {
                Transform::Raw => write_json(&combined, output.as_ref())?,
                Transform::Baseline => write_json(&combined.baseline_deviation(), output.as_ref())?,
                Transform::Halves => write_json(&combined.phase_halves(), output.as_ref())?,
            }
        }
    }

    Ok(())
}
