//! Statistics and data-quality diagnostics for the aggregation pipeline

/// Counts surfaced alongside the output tables after one aggregation run.
///
/// Missing joins are data-quality signals, not errors; a run completes and
/// reports them in its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationStats {
    /// Observations in the input batch
    pub observations_in: usize,
    /// Observations whose station has no subdivision assignment
    pub missing_assignment: usize,
    /// Rows in the subdivision averages table
    pub fine_rows: usize,
    /// Subdivision-date rows with no population estimate for their year
    pub missing_weight: usize,
    /// Rows in the division averages table
    pub coarse_rows: usize,
}

impl AggregationStats {
    /// Create empty aggregation statistics
    pub fn new() -> Self {
        Self {
            observations_in: 0,
            missing_assignment: 0,
            fine_rows: 0,
            missing_weight: 0,
            coarse_rows: 0,
        }
    }

    /// Observations that joined to an assignment
    pub fn observations_joined(&self) -> usize {
        self.observations_in - self.missing_assignment
    }

    /// Whether any join produced a data-quality diagnostic
    pub fn has_missing_joins(&self) -> bool {
        self.missing_assignment > 0 || self.missing_weight > 0
    }

    /// One-line summary of the aggregation outcome
    pub fn summary(&self) -> String {
        format!(
            "Aggregated {} of {} observations into {} subdivision rows and {} division rows \
             ({} without assignment, {} without population estimate)",
            self.observations_joined(),
            self.observations_in,
            self.fine_rows,
            self.coarse_rows,
            self.missing_assignment,
            self.missing_weight
        )
    }
}

impl Default for AggregationStats {
    fn default() -> Self {
        Self::new()
    }
}
