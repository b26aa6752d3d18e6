//! Core data structures for the census climate pipeline.
//!
//! Defines stations, census region attributes, daily observations, the
//! station-to-subdivision assignment table, and the derived average rows
//! used throughout the library.

use crate::constants::CLIMATE_VARIABLES;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A weather station location extracted from the observation batch
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Environment Canada climate identifier
    pub climate_id: String,
    /// Longitude or planar x coordinate
    pub x: f64,
    /// Latitude or planar y coordinate
    pub y: f64,
}

/// Census geography attributes carried by each subdivision boundary record.
///
/// Codes are numeric (StatsCan UIDs); names are carried through to the
/// output tables unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAttributes {
    /// Census subdivision code
    pub csd_uid: i64,
    /// Census subdivision name
    pub csd_name: String,
    /// Province code
    pub pr_uid: i64,
    /// Province name
    pub pr_name: String,
    /// Census division code
    pub cd_uid: i64,
    /// Census division name
    pub cd_name: String,
}

/// Calendar date of an observation, decomposed as published in the daily
/// climate feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObsDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ObsDate {
    /// Build a date from its components, validating against the calendar
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|_| Self { year, month, day })
    }
}

impl fmt::Display for ObsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A single daily observation from one station.
///
/// `values` is parallel to [`CLIMATE_VARIABLES`]; `None` means the variable
/// was not measured that day. Absent is never conflated with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub climate_id: String,
    pub date: ObsDate,
    pub values: Vec<Option<f64>>,
}

impl Observation {
    /// Create an observation with every variable absent
    pub fn empty(climate_id: impl Into<String>, date: ObsDate) -> Self {
        Self {
            climate_id: climate_id.into(),
            date,
            values: vec![None; CLIMATE_VARIABLES.len()],
        }
    }
}

/// Station-to-subdivision assignment table.
///
/// At most one record per distinct climate identifier. Once computed the
/// table is a stable reference: it can be cached to disk and reused across
/// runs while the station set and boundaries are unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignmentTable {
    /// Assigned stations, keyed by climate identifier
    pub records: HashMap<String, RegionAttributes>,
    /// Stations with no subdivision within the fallback radius, in first
    /// appearance order. A recorded gap, not an error.
    pub unassigned: Vec<String>,
}

impl AssignmentTable {
    /// Look up the region attributes assigned to a station
    pub fn get(&self, climate_id: &str) -> Option<&RegionAttributes> {
        self.records.get(climate_id)
    }

    /// Number of assigned stations
    pub fn assigned_count(&self) -> usize {
        self.records.len()
    }

    /// Number of stations left unassigned
    pub fn unassigned_count(&self) -> usize {
        self.unassigned.len()
    }
}

/// Subdivision population estimates keyed by (CSDUID, year).
///
/// Rows with an absent population are not stored; a lookup miss is counted
/// as a missing weight by the aggregation stage either way.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<(i64, i32), f64>,
}

impl WeightTable {
    /// Create an empty weight table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a population estimate for a subdivision-year
    pub fn insert(&mut self, csd_uid: i64, year: i32, population: f64) {
        self.weights.insert((csd_uid, year), population);
    }

    /// Look up the population estimate for a subdivision-year
    pub fn get(&self, csd_uid: i64, year: i32) -> Option<f64> {
        self.weights.get(&(csd_uid, year)).copied()
    }

    /// Number of recorded subdivision-year estimates
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table holds no estimates
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// One row of the subdivision (fine) averages table: per-variable unweighted
/// daily means for one (subdivision, date) group
#[derive(Debug, Clone, PartialEq)]
pub struct FineAverage {
    pub region: RegionAttributes,
    pub date: ObsDate,
    /// Per-variable means, parallel to [`CLIMATE_VARIABLES`]; absent when
    /// every contributing observation was absent
    pub values: Vec<Option<f64>>,
    /// Population weight after zero-substitution; absent when no estimate
    /// exists for this subdivision-year
    pub population: Option<f64>,
}

/// One row of the division (coarse) averages table: per-variable
/// population-weighted daily means for one (division, date) group
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseAverage {
    pub pr_uid: i64,
    pub pr_name: String,
    pub cd_uid: i64,
    pub cd_name: String,
    pub date: ObsDate,
    /// Per-variable weighted means, parallel to [`CLIMATE_VARIABLES`];
    /// absent when no member subdivision measured the variable
    pub values: Vec<Option<f64>>,
}
