//! Application constants for the census climate pipeline
//!
//! This module contains the measured-variable set, input/output column
//! names, default file names, and spatial assignment defaults used
//! throughout the application.

// =============================================================================
// Climate Variables
// =============================================================================

/// Daily climate variables carried through both aggregation stages.
///
/// Order is significant: observation values and averaged values are stored
/// in vectors parallel to this slice, and output columns appear in this
/// order.
pub const CLIMATE_VARIABLES: &[&str] = &[
    "MEAN_TEMPERATURE",
    "MIN_TEMPERATURE",
    "MAX_TEMPERATURE",
    "TOTAL_PRECIPITATION",
    "TOTAL_RAIN",
    "TOTAL_SNOW",
    "SNOW_ON_GROUND",
    "DIRECTION_MAX_GUST",
    "SPEED_MAX_GUST",
    "MIN_REL_HUMIDITY",
    "MAX_REL_HUMIDITY",
];

// =============================================================================
// Input / Output Column Names
// =============================================================================

/// Column names shared by the observation batch, the assignment table, the
/// population weights table, and the derived output tables.
pub mod columns {
    /// Station identifier assigned by Environment Canada
    pub const CLIMATE_IDENTIFIER: &str = "CLIMATE_IDENTIFIER";

    /// Station longitude (or planar x) as published in the daily feed
    pub const X: &str = "x";
    /// Station latitude (or planar y) as published in the daily feed
    pub const Y: &str = "y";

    /// Observation date components
    pub const LOCAL_DATE: &str = "LOCAL_DATE";
    pub const LOCAL_YEAR: &str = "LOCAL_YEAR";
    pub const LOCAL_MONTH: &str = "LOCAL_MONTH";
    pub const LOCAL_DAY: &str = "LOCAL_DAY";

    /// Census subdivision code and name
    pub const CSDUID: &str = "CSDUID";
    pub const CSDNAME: &str = "CSDNAME";

    /// Province code and name
    pub const PRUID: &str = "PRUID";
    pub const PRNAME: &str = "PRNAME";

    /// Census division code and name
    pub const CDUID: &str = "CDUID";
    pub const CDNAME: &str = "CDNAME";

    /// Subdivision population estimate
    pub const POP: &str = "POP";
}

// =============================================================================
// Spatial Assignment
// =============================================================================

/// Maximum distance, in input coordinate units, at which a station outside
/// every subdivision may still be assigned to its nearest subdivision
pub const DEFAULT_FALLBACK_RADIUS: f64 = 50.0;

/// Minimum valid population weight. Subdivisions with a recorded population
/// of exactly zero are weighted as if one person lived there so the
/// subdivision still contributes to division averages.
pub const MIN_VALID_WEIGHT: f64 = 1.0;

// =============================================================================
// File Names
// =============================================================================

/// Default file name for the cached station-to-subdivision assignment table
pub const ASSIGNMENTS_FILE_NAME: &str = "stations_sd.csv";

/// Output file name prefixes; the observation batch year is appended
pub const FINE_OUTPUT_PREFIX: &str = "daily_csd_climate_";
pub const COARSE_OUTPUT_PREFIX: &str = "daily_cd_climate_";

/// Application directory name under the platform cache directory, used for
/// the default assignment table location
pub const APP_CACHE_DIR: &str = "census-climate";
