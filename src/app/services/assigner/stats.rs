//! Statistics for the station assignment scan

use std::time::Duration;

/// Outcome counts for one assignment run
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStats {
    /// Station rows seen before deduplication
    pub stations_in: usize,
    /// Distinct (climate id, x, y) points scanned
    pub distinct_points: usize,
    /// Stations inside a subdivision boundary
    pub contained: usize,
    /// Stations assigned to the nearest subdivision within the radius
    pub fallback_assigned: usize,
    /// Stations with no subdivision within the radius
    pub unassigned: usize,
    /// Wall time of the scan
    pub duration: Duration,
}

impl AssignmentStats {
    /// Create empty assignment statistics
    pub fn new() -> Self {
        Self {
            stations_in: 0,
            distinct_points: 0,
            contained: 0,
            fallback_assigned: 0,
            unassigned: 0,
            duration: Duration::ZERO,
        }
    }

    /// Total stations assigned through either path
    pub fn assigned(&self) -> usize {
        self.contained + self.fallback_assigned
    }

    /// Fraction of distinct points assigned, as a percentage
    pub fn assignment_rate(&self) -> f64 {
        if self.distinct_points == 0 {
            100.0
        } else {
            (self.assigned() as f64 / self.distinct_points as f64) * 100.0
        }
    }

    /// One-line summary of the scan outcome
    pub fn summary(&self) -> String {
        format!(
            "Assigned {} of {} stations, {:.1}% ({} contained, {} by fallback, {} unassigned) in {:.2}s",
            self.assigned(),
            self.distinct_points,
            self.assignment_rate(),
            self.contained,
            self.fallback_assigned,
            self.unassigned,
            self.duration.as_secs_f64()
        )
    }
}

impl Default for AssignmentStats {
    fn default() -> Self {
        Self::new()
    }
}
