//! Stage 2: population-weighted daily means by census division

use crate::app::models::{CoarseAverage, FineAverage, ObsDate, WeightTable};
use crate::app::services::aggregator::stats::AggregationStats;
use crate::constants::{CLIMATE_VARIABLES, MIN_VALID_WEIGHT};
use std::collections::BTreeMap;
use tracing::debug;

/// Left-join fine rows to population estimates by (CSDUID, year).
///
/// A recorded population of exactly zero is substituted with
/// [`MIN_VALID_WEIGHT`] so the subdivision is never erased from the weighted
/// sum and never causes a division by zero. Subdivision-years with no
/// estimate stay absent and are counted in `stats.missing_weight`.
pub fn attach_weights(
    rows: &mut [FineAverage],
    weights: &WeightTable,
    stats: &mut AggregationStats,
) {
    for row in rows {
        match weights.get(row.region.csd_uid, row.date.year) {
            Some(population) => {
                row.population = Some(if population == 0.0 {
                    MIN_VALID_WEIGHT
                } else {
                    population
                });
            }
            None => {
                debug!(
                    "No population estimate for CSDUID {} in {}",
                    row.region.csd_uid, row.date.year
                );
                row.population = None;
                stats.missing_weight += 1;
            }
        }
    }
}

/// Per-group weighted sums and weight totals, one slot per climate variable.
///
/// A subdivision's weight enters a variable's denominator only when that
/// subdivision measured the variable, so partial missingness in one
/// variable does not bias another's average.
struct CoarseAccumulator {
    pr_uid: i64,
    pr_name: String,
    cd_name: String,
    weighted_sums: Vec<f64>,
    weight_totals: Vec<f64>,
}

impl CoarseAccumulator {
    fn new(row: &FineAverage) -> Self {
        Self {
            pr_uid: row.region.pr_uid,
            pr_name: row.region.pr_name.clone(),
            cd_name: row.region.cd_name.clone(),
            weighted_sums: vec![0.0; CLIMATE_VARIABLES.len()],
            weight_totals: vec![0.0; CLIMATE_VARIABLES.len()],
        }
    }

    fn add(&mut self, values: &[Option<f64>], weight: f64) {
        for (slot, value) in values.iter().enumerate() {
            if let Some(v) = value {
                self.weighted_sums[slot] += v * weight;
                self.weight_totals[slot] += weight;
            }
        }
    }

    fn into_means(self) -> (i64, String, String, Vec<Option<f64>>) {
        let means = self
            .weighted_sums
            .iter()
            .zip(&self.weight_totals)
            .map(|(sum, total)| {
                if *total == 0.0 {
                    None
                } else {
                    Some(sum / total)
                }
            })
            .collect();
        (self.pr_uid, self.pr_name, self.cd_name, means)
    }
}

/// Group weighted fine rows by (CDUID, date) and compute per-variable
/// weighted means.
///
/// Every fine row creates or joins its division group, but only rows with a
/// population weight contribute to numerators and denominators; a group
/// whose members all lack weights (or all lack a variable) yields absent
/// cells. Output order is (CDUID ascending, date ascending).
pub fn coarse_averages(rows: &[FineAverage]) -> Vec<CoarseAverage> {
    let mut groups: BTreeMap<(i64, ObsDate), CoarseAccumulator> = BTreeMap::new();

    for row in rows {
        let accumulator = groups
            .entry((row.region.cd_uid, row.date))
            .or_insert_with(|| CoarseAccumulator::new(row));
        if let Some(weight) = row.population {
            accumulator.add(&row.values, weight);
        }
    }

    groups
        .into_iter()
        .map(|((cd_uid, date), accumulator)| {
            let (pr_uid, pr_name, cd_name, values) = accumulator.into_means();
            CoarseAverage {
                pr_uid,
                pr_name,
                cd_uid,
                cd_name,
                date,
                values,
            }
        })
        .collect()
}
