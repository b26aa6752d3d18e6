//! Command implementations for the census climate CLI
//!
//! Contains the main command execution logic: configuration assembly,
//! logging setup, progress reporting, and the final run summary.

use crate::app::models::{AssignmentTable, Station, WeightTable};
use crate::app::services::aggregator::{AggregationStats, WeightedAggregator};
use crate::app::services::assigner::{AssignmentStats, StationAssigner};
use crate::app::services::tables;
use crate::cli::args::{Args, Commands};
use crate::config::Config;
use crate::{Error, Result};
use chrono::Datelike;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Statistics for one CLI run, reported in the final summary
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Assignment scan statistics; absent when a cached table was reused
    pub assignment: Option<AssignmentStats>,
    /// Aggregation statistics; absent for the assign-only command
    pub aggregation: Option<AggregationStats>,
    /// Output files written, with sizes in bytes
    pub outputs: Vec<(String, u64)>,
    /// Total wall time of the run
    pub processing_time: std::time::Duration,
}

impl RunStats {
    /// Total size of all written outputs in bytes
    pub fn total_output_size(&self) -> u64 {
        self.outputs.iter().map(|(_, size)| size).sum()
    }

    /// Format a byte count in human-readable units
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Main command runner.
///
/// Sets up logging, validates arguments, dispatches to the requested
/// command, and prints the run summary.
pub async fn run(args: Args) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args)?;
    info!("Starting census climate processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let Some(command) = args.command.clone() else {
        return Err(Error::configuration("no command given"));
    };

    let mut stats = match command {
        Commands::Process(process) => run_process(&process.to_config(), &args).await?,
        Commands::Assign(assign) => run_assign(&assign.to_config(), &args).await?,
    };
    stats.processing_time = start_time.elapsed();

    report_summary(&args, &stats);
    Ok(stats)
}

/// Full pipeline: read inputs, assign stations, aggregate, write outputs
async fn run_process(config: &Config, args: &Args) -> Result<RunStats> {
    config.validate()?;
    prepare_directories(config)?;

    let batch = tables::read_observations(&config.observations_path)?;

    let (assignments, assignment_stats) =
        load_or_build_assignments(config, &batch.stations, args)?;

    let weights = if config.weights_path.as_os_str().is_empty() || !config.weights_path.exists()
    {
        // Only reachable with --skip-coarse; the fine table then carries an
        // empty POP column.
        WeightTable::new()
    } else {
        tables::read_weights(&config.weights_path)?
    };

    let aggregator = WeightedAggregator::new(&assignments, &weights);
    let mut aggregation_stats = AggregationStats::new();
    aggregation_stats.observations_in = batch.observations.len();

    let fine_rows = aggregator.fine_averages(&batch.observations, &mut aggregation_stats);

    let year = batch
        .latest_year()
        .unwrap_or_else(|| chrono::Local::now().year());
    let fine_path = config.fine_output_path(year);
    tables::write_fine(&fine_path, &fine_rows)?;
    let mut outputs = vec![output_entry(&fine_path)?];

    if config.skip_coarse {
        info!("Skipping division averaging stage");
    } else {
        let coarse_rows = aggregator.coarse_averages(&fine_rows, &mut aggregation_stats);
        let coarse_path = config.coarse_output_path(year);
        tables::write_coarse(&coarse_path, &coarse_rows)?;
        outputs.push(output_entry(&coarse_path)?);
    }

    info!("{}", aggregation_stats.summary());

    Ok(RunStats {
        assignment: assignment_stats,
        aggregation: Some(aggregation_stats),
        outputs,
        ..Default::default()
    })
}

/// Assignment-only run: rebuild and persist the station assignment cache
async fn run_assign(config: &Config, args: &Args) -> Result<RunStats> {
    config.validate()?;
    prepare_directories(config)?;

    let batch = tables::read_observations(&config.observations_path)?;
    let (table, stats) = build_assignments(config, &batch.stations, args)?;
    tables::write_assignments(&config.assignments_path, &table)?;

    Ok(RunStats {
        assignment: Some(stats),
        aggregation: None,
        outputs: vec![output_entry(&config.assignments_path)?],
        ..Default::default()
    })
}

/// Reuse the cached assignment table when allowed, otherwise run a fresh
/// scan and persist it
fn load_or_build_assignments(
    config: &Config,
    stations: &[Station],
    args: &Args,
) -> Result<(AssignmentTable, Option<AssignmentStats>)> {
    if !config.refresh_assignments && config.assignments_path.exists() {
        info!(
            "Reusing cached assignment table {}",
            config.assignments_path.display()
        );
        let table = tables::read_assignments(&config.assignments_path)?;
        return Ok((table, None));
    }

    let (table, stats) = build_assignments(config, stations, args)?;
    tables::write_assignments(&config.assignments_path, &table)?;
    Ok((table, Some(stats)))
}

/// Load boundaries and scan every distinct station against them
fn build_assignments(
    config: &Config,
    stations: &[Station],
    args: &Args,
) -> Result<(AssignmentTable, AssignmentStats)> {
    let subdivisions = tables::read_subdivisions(&config.subdivisions_path)?;
    if subdivisions.is_empty() {
        return Err(Error::shapefile(
            config.subdivisions_path.display().to_string(),
            "boundary file contains no subdivision records",
        ));
    }

    let assigner = StationAssigner::new(subdivisions, config.fallback_radius);
    info!(
        "Assigning {} station rows against {} subdivisions",
        stations.len(),
        assigner.subdivision_count()
    );

    let progress = if args.show_progress() {
        let pb = ProgressBar::new(stations.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Assigning stations");
        Some(pb)
    } else {
        None
    };

    let (table, stats) = assigner.assign(stations, progress.as_ref());

    if let Some(pb) = progress {
        pb.finish_with_message("Assignment complete");
    }

    info!("{}", stats.summary());
    if stats.unassigned > 0 {
        warn!(
            "{} stations have no subdivision within {} units: {:?}",
            stats.unassigned, config.fallback_radius, table.unassigned
        );
    }

    Ok((table, stats))
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("census_climate={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Create the output directory and the assignment cache directory
fn prepare_directories(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| Error::io("failed to create output directory", e))?;
    if let Some(parent) = config.assignments_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io("failed to create assignment cache directory", e))?;
        }
    }
    Ok(())
}

/// File name and size of a written output
fn output_entry(path: &Path) -> Result<(String, u64)> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::io(format!("failed to stat {}", path.display()), e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, metadata.len()))
}

/// Print the final run summary to stdout
fn report_summary(args: &Args, stats: &RunStats) {
    if args.quiet {
        return;
    }

    println!();
    println!("{}", "Run complete".green().bold());

    if let Some(assignment) = &stats.assignment {
        println!("  {}", assignment.summary());
        if assignment.unassigned > 0 {
            println!(
                "  {}",
                format!("{} stations left unassigned", assignment.unassigned).yellow()
            );
        }
    } else {
        println!("  Reused cached station assignment table");
    }

    if let Some(aggregation) = &stats.aggregation {
        println!("  {}", aggregation.summary());
        if aggregation.has_missing_joins() {
            println!(
                "  {}",
                format!(
                    "Data quality: {} observations without assignment, {} rows without population",
                    aggregation.missing_assignment, aggregation.missing_weight
                )
                .yellow()
            );
        }
    }

    for (name, size) in &stats.outputs {
        println!("  Wrote {} ({})", name.cyan(), RunStats::format_size(*size));
    }
    if stats.outputs.len() > 1 {
        println!(
            "  Total output: {}",
            RunStats::format_size(stats.total_output_size())
        );
    }
    println!(
        "  Finished in {:.2}s",
        stats.processing_time.as_secs_f64()
    );
}
