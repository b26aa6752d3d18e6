//! Command-line argument definitions for the census climate pipeline
//!
//! Defines the CLI surface with the clap derive API: a `process` command
//! running the full pipeline and an `assign` command that only rebuilds
//! the station assignment cache.

use crate::config::Config;
use crate::constants::DEFAULT_FALLBACK_RADIUS;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the census climate processor
///
/// Builds daily climate datasets over Canadian census geography: stations
/// are assigned to census subdivisions, subdivision averages are computed
/// per day, and division averages are weighted by subdivision population.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "census-climate",
    version,
    about = "Build daily climate averages by census subdivision and division",
    long_about = "Assigns Environment Canada weather stations to the census subdivision \
                  containing them (or the nearest one within 50 units), averages daily \
                  climate variables by subdivision, and rolls them up to census divisions \
                  weighted by subdivision population estimates."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress output; log warnings and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: assign stations, average by subdivision,
    /// weight by division (default workflow)
    Process(ProcessArgs),
    /// Rebuild the station assignment cache without aggregating
    Assign(AssignArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Daily climate observation batch (CSV export of the climate-daily
    /// feed, one row per station per day)
    #[arg(short = 'i', long = "observations", value_name = "PATH")]
    pub observations: PathBuf,

    /// Census subdivision boundary shapefile (.shp with sibling .dbf)
    ///
    /// Record order is significant: it fixes the scan order used to break
    /// containment and nearest-distance ties, so the same file must be
    /// used when reusing a cached assignment table.
    #[arg(short = 's', long = "subdivisions", value_name = "PATH")]
    pub subdivisions: PathBuf,

    /// Subdivision population estimates CSV with CSDUID, LOCAL_YEAR, POP
    /// columns
    #[arg(short = 'w', long = "weights", value_name = "PATH")]
    pub weights: PathBuf,

    /// Output directory for the derived average tables
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = "output"
    )]
    pub output: PathBuf,

    /// Station assignment cache location
    ///
    /// Defaults to stations_sd.csv under the platform cache directory.
    #[arg(long = "assignments", value_name = "PATH")]
    pub assignments: Option<PathBuf>,

    /// Rebuild the station assignment table even if a cache exists
    #[arg(long = "refresh-assignments")]
    pub refresh_assignments: bool,

    /// Stop after the subdivision averages (skip the population-weighted
    /// division stage)
    #[arg(long = "skip-coarse")]
    pub skip_coarse: bool,

    /// Maximum distance, in coordinate units, at which a station outside
    /// every subdivision is still assigned to its nearest one
    #[arg(
        long = "fallback-radius",
        value_name = "UNITS",
        default_value_t = DEFAULT_FALLBACK_RADIUS
    )]
    pub fallback_radius: f64,
}

impl ProcessArgs {
    /// Assemble the run configuration from these arguments
    pub fn to_config(&self) -> Config {
        Config {
            observations_path: self.observations.clone(),
            subdivisions_path: self.subdivisions.clone(),
            weights_path: self.weights.clone(),
            assignments_path: self
                .assignments
                .clone()
                .unwrap_or_else(|| Config::default_assignments_path(&self.output)),
            output_dir: self.output.clone(),
            refresh_assignments: self.refresh_assignments,
            skip_coarse: self.skip_coarse,
            fallback_radius: self.fallback_radius,
        }
    }
}

/// Arguments for the assign command
#[derive(Debug, Clone, Parser)]
pub struct AssignArgs {
    /// Daily climate observation batch; station points are derived from
    /// its coordinate columns
    #[arg(short = 'i', long = "observations", value_name = "PATH")]
    pub observations: PathBuf,

    /// Census subdivision boundary shapefile (.shp with sibling .dbf)
    #[arg(short = 's', long = "subdivisions", value_name = "PATH")]
    pub subdivisions: PathBuf,

    /// Station assignment cache location to write
    #[arg(long = "assignments", value_name = "PATH")]
    pub assignments: Option<PathBuf>,

    /// Fallback output directory used when no cache location is given
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = "output"
    )]
    pub output: PathBuf,

    /// Maximum fallback distance in coordinate units
    #[arg(
        long = "fallback-radius",
        value_name = "UNITS",
        default_value_t = DEFAULT_FALLBACK_RADIUS
    )]
    pub fallback_radius: f64,
}

impl AssignArgs {
    /// Assemble a configuration that always refreshes the assignment
    /// table and skips aggregation
    pub fn to_config(&self) -> Config {
        Config {
            observations_path: self.observations.clone(),
            subdivisions_path: self.subdivisions.clone(),
            weights_path: PathBuf::new(),
            assignments_path: self
                .assignments
                .clone()
                .unwrap_or_else(|| Config::default_assignments_path(&self.output)),
            output_dir: self.output.clone(),
            refresh_assignments: true,
            skip_coarse: true,
            fallback_radius: self.fallback_radius,
        }
    }
}

impl Args {
    /// Validate argument combinations before running
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(Error::configuration(
                "--verbose and --quiet are mutually exclusive",
            ));
        }
        Ok(())
    }

    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Whether to show interactive progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
