//! Tests for the two-stage aggregation pipeline

use crate::app::models::{
    AssignmentTable, FineAverage, ObsDate, Observation, RegionAttributes,
};
use crate::constants::CLIMATE_VARIABLES;


pub fn region(csd_uid: i64, cd_uid: i64) -> RegionAttributes {
    RegionAttributes {
        csd_uid,
        csd_name: format!("Subdivision {csd_uid}"),
        pr_uid: 35,
        pr_name: "Ontario".to_string(),
        cd_uid,
        cd_name: format!("Division {cd_uid}"),
    }
}

pub fn date(year: i32, month: u32, day: u32) -> ObsDate {
    ObsDate::new(year, month, day).expect("valid test date")
}

/// Observation with the first climate variable set and every other absent
pub fn observation(climate_id: &str, date: ObsDate, first: Option<f64>) -> Observation {
    let mut obs = Observation::empty(climate_id, date);
    obs.values[0] = first;
    obs
}

pub fn assignments(entries: &[(&str, RegionAttributes)]) -> AssignmentTable {
    let mut table = AssignmentTable::default();
    for (climate_id, attrs) in entries {
        table.records.insert((*climate_id).to_string(), attrs.clone());
    }
    table
}

/// Fine row with the first variable set, every other absent, and an
/// already-attached population weight
pub fn fine_row(
    region: RegionAttributes,
    date: ObsDate,
    first: Option<f64>,
    population: Option<f64>,
) -> FineAverage {
    let mut values = vec![None; CLIMATE_VARIABLES.len()];
    values[0] = first;
    FineAverage {
        region,
        date,
        values,
        population,
    }
}
