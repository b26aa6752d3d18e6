//! Stage 1: unweighted daily means by census subdivision

use crate::app::models::{
    AssignmentTable, FineAverage, ObsDate, Observation, RegionAttributes,
};
use crate::app::services::aggregator::stats::AggregationStats;
use crate::constants::CLIMATE_VARIABLES;
use std::collections::BTreeMap;
use tracing::debug;

/// Per-group running sums and non-absent counts, one slot per climate
/// variable
struct FineAccumulator {
    region: RegionAttributes,
    sums: Vec<f64>,
    counts: Vec<u32>,
}

impl FineAccumulator {
    fn new(region: RegionAttributes) -> Self {
        Self {
            region,
            sums: vec![0.0; CLIMATE_VARIABLES.len()],
            counts: vec![0; CLIMATE_VARIABLES.len()],
        }
    }

    fn add(&mut self, values: &[Option<f64>]) {
        for (slot, value) in values.iter().enumerate() {
            if let Some(v) = value {
                self.sums[slot] += v;
                self.counts[slot] += 1;
            }
        }
    }

    fn into_means(self) -> (RegionAttributes, Vec<Option<f64>>) {
        let means = self
            .sums
            .iter()
            .zip(&self.counts)
            .map(|(sum, count)| {
                if *count == 0 {
                    // Every observation in the group was absent for this
                    // variable; the mean is absent, never zero.
                    None
                } else {
                    Some(sum / f64::from(*count))
                }
            })
            .collect();
        (self.region, means)
    }
}

/// Left-join observations to the assignment table and average each variable
/// by (CSDUID, date).
///
/// Observations whose station has no assignment are counted in
/// `stats.missing_assignment` and contribute to no group. Output order is
/// (CSDUID ascending, date ascending).
pub fn fine_averages(
    observations: &[Observation],
    assignments: &AssignmentTable,
    stats: &mut AggregationStats,
) -> Vec<FineAverage> {
    let mut groups: BTreeMap<(i64, ObsDate), FineAccumulator> = BTreeMap::new();

    for observation in observations {
        let Some(region) = assignments.get(&observation.climate_id) else {
            debug!(
                "Observation from {} on {} has no subdivision assignment",
                observation.climate_id, observation.date
            );
            stats.missing_assignment += 1;
            continue;
        };

        groups
            .entry((region.csd_uid, observation.date))
            .or_insert_with(|| FineAccumulator::new(region.clone()))
            .add(&observation.values);
    }

    groups
        .into_iter()
        .map(|((_, date), accumulator)| {
            let (region, values) = accumulator.into_means();
            FineAverage {
                region,
                date,
                values,
                population: None,
            }
        })
        .collect()
}
