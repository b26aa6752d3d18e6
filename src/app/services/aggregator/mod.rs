//! Two-stage weighted aggregation service
//!
//! Stage 1 joins daily observations to the station assignment table and
//! averages each climate variable by (census subdivision, date). Stage 2
//! joins those subdivision averages to population estimates and computes
//! population-weighted averages by (census division, date).
//!
//! Missing joins are diagnostics, never failures: observations from
//! unassigned stations and subdivision-years without a population estimate
//! are counted and excluded, and an absent input value propagates as an
//! absent output value rather than as zero.

use crate::app::models::{AssignmentTable, CoarseAverage, FineAverage, Observation, WeightTable};

pub mod coarse;
pub mod fine;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use stats::AggregationStats;

/// Computes subdivision and division daily averages from one observation
/// batch
#[derive(Debug, Clone)]
pub struct WeightedAggregator<'a> {
    assignments: &'a AssignmentTable,
    weights: &'a WeightTable,
}

impl<'a> WeightedAggregator<'a> {
    /// Create an aggregator over a fixed assignment table and weight table
    pub fn new(assignments: &'a AssignmentTable, weights: &'a WeightTable) -> Self {
        Self {
            assignments,
            weights,
        }
    }

    /// Stage 1: unweighted per-variable daily means by subdivision, with
    /// the population weight for each subdivision-year attached (zero
    /// populations substituted with the minimum valid weight). Rows are
    /// sorted by (CSDUID, date).
    pub fn fine_averages(
        &self,
        observations: &[Observation],
        stats: &mut AggregationStats,
    ) -> Vec<FineAverage> {
        let mut rows = fine::fine_averages(observations, self.assignments, stats);
        coarse::attach_weights(&mut rows, self.weights, stats);
        stats.fine_rows = rows.len();
        rows
    }

    /// Stage 2: population-weighted per-variable daily means by census
    /// division. Rows are sorted by (CDUID, date).
    pub fn coarse_averages(
        &self,
        fine_rows: &[FineAverage],
        stats: &mut AggregationStats,
    ) -> Vec<CoarseAverage> {
        let rows = coarse::coarse_averages(fine_rows);
        stats.coarse_rows = rows.len();
        rows
    }

    /// Run both stages over one observation batch
    pub fn aggregate(
        &self,
        observations: &[Observation],
    ) -> (Vec<FineAverage>, Vec<CoarseAverage>, AggregationStats) {
        let mut stats = AggregationStats::new();
        stats.observations_in = observations.len();

        let fine_rows = self.fine_averages(observations, &mut stats);
        let coarse_rows = self.coarse_averages(&fine_rows, &mut stats);

        (fine_rows, coarse_rows, stats)
    }
}
