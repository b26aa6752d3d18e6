//! Run configuration and validation.
//!
//! A [`Config`] captures everything one pipeline run needs: input and
//! output locations, the assignment cache location and refresh policy, and
//! the spatial fallback radius. It is assembled from CLI arguments and
//! validated before any file is touched.

use crate::constants::{
    APP_CACHE_DIR, ASSIGNMENTS_FILE_NAME, COARSE_OUTPUT_PREFIX, DEFAULT_FALLBACK_RADIUS,
    FINE_OUTPUT_PREFIX,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Daily climate observation batch (CSV)
    pub observations_path: PathBuf,

    /// Census subdivision boundary shapefile (.shp with sibling .dbf)
    pub subdivisions_path: PathBuf,

    /// Subdivision population estimates (CSV)
    pub weights_path: PathBuf,

    /// Directory receiving the derived average tables
    pub output_dir: PathBuf,

    /// Location of the station assignment cache
    pub assignments_path: PathBuf,

    /// Rebuild the assignment table even if a cache exists
    pub refresh_assignments: bool,

    /// Stop after the subdivision averages (skip the weighted division
    /// stage)
    pub skip_coarse: bool,

    /// Maximum distance at which an uncontained station may still be
    /// assigned to its nearest subdivision, in coordinate units
    pub fallback_radius: f64,
}

impl Config {
    /// Default location for the assignment cache when none is given:
    /// `<platform cache dir>/census-climate/stations_sd.csv`, falling back
    /// to the output directory on platforms without a cache dir
    pub fn default_assignments_path(output_dir: &Path) -> PathBuf {
        dirs::cache_dir()
            .map(|cache| cache.join(APP_CACHE_DIR).join(ASSIGNMENTS_FILE_NAME))
            .unwrap_or_else(|| output_dir.join(ASSIGNMENTS_FILE_NAME))
    }

    /// Output path for the subdivision averages of one batch year
    pub fn fine_output_path(&self, year: i32) -> PathBuf {
        self.output_dir
            .join(format!("{FINE_OUTPUT_PREFIX}{year}.csv"))
    }

    /// Output path for the division averages of one batch year
    pub fn coarse_output_path(&self, year: i32) -> PathBuf {
        self.output_dir
            .join(format!("{COARSE_OUTPUT_PREFIX}{year}.csv"))
    }

    /// Validate inputs before running.
    ///
    /// Input files must exist; the fallback radius must be positive and
    /// finite. The output and cache directories are created later by the
    /// command layer, so only their paths are checked here.
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration: {:?}", self);

        if !self.observations_path.exists() {
            return Err(Error::file_not_found(
                self.observations_path.display().to_string(),
            ));
        }
        if !self.subdivisions_path.exists() {
            return Err(Error::file_not_found(
                self.subdivisions_path.display().to_string(),
            ));
        }
        if !self.skip_coarse && !self.weights_path.exists() {
            return Err(Error::file_not_found(
                self.weights_path.display().to_string(),
            ));
        }
        if !(self.fallback_radius.is_finite() && self.fallback_radius > 0.0) {
            return Err(Error::configuration(format!(
                "fallback radius must be a positive number, got {}",
                self.fallback_radius
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::configuration("output directory must not be empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let output_dir = PathBuf::from("output");
        Self {
            observations_path: PathBuf::new(),
            subdivisions_path: PathBuf::new(),
            weights_path: PathBuf::new(),
            assignments_path: Self::default_assignments_path(&output_dir),
            output_dir,
            refresh_assignments: false,
            skip_coarse: false,
            fallback_radius: DEFAULT_FALLBACK_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, "").unwrap();
        path
    }

    fn valid_config(dir: &TempDir) -> Config {
        Config {
            observations_path: touch(dir, "daily_climate.csv"),
            subdivisions_path: touch(dir, "census_subdivisions.shp"),
            weights_path: touch(dir, "subdivisions_pop.csv"),
            output_dir: dir.path().join("output"),
            assignments_path: dir.path().join("stations_sd.csv"),
            refresh_assignments: false,
            skip_coarse: false,
            fallback_radius: DEFAULT_FALLBACK_RADIUS,
        }
    }

    #[test]
    fn valid_configuration_passes() {
        let dir = TempDir::new().unwrap();
        assert!(valid_config(&dir).validate().is_ok());
    }

    #[test]
    fn missing_observations_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.observations_path = dir.path().join("absent.csv");
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_weights_file_is_allowed_when_skipping_coarse_stage() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.weights_path = dir.path().join("absent.csv");
        assert!(config.validate().is_err());

        config.skip_coarse = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_positive_radius_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.fallback_radius = 0.0;
        assert!(config.validate().is_err());
        config.fallback_radius = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn output_paths_carry_the_batch_year() {
        let dir = TempDir::new().unwrap();
        let config = valid_config(&dir);
        assert!(config
            .fine_output_path(2021)
            .ends_with("daily_csd_climate_2021.csv"));
        assert!(config
            .coarse_output_path(2021)
            .ends_with("daily_cd_climate_2021.csv"));
    }
}
