//! Station-to-subdivision assignment service
//!
//! Determines, for each distinct weather station, the census subdivision
//! whose boundary contains it. Stations outside every subdivision are
//! assigned to the nearest subdivision if one lies within the fallback
//! radius; otherwise they are recorded as unassigned.
//!
//! The scan is brute force over subdivisions in shapefile record order.
//! That order is load-bearing: when boundaries overlap, the first record
//! containing the point wins, and distance ties in the fallback resolve to
//! the lowest record index. Downstream data produced by earlier runs
//! depends on this tie-break, so any replacement (e.g. an R-tree) must
//! preserve it.

use crate::app::models::{AssignmentTable, RegionAttributes, Station};
use geo::{Contains, Distance, Euclidean, MultiPolygon, Point};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::time::Instant;
use tracing::debug;

pub mod stats;

#[cfg(test)]
pub mod tests;

pub use stats::AssignmentStats;

/// A census subdivision boundary paired with its attribute record
#[derive(Debug, Clone)]
pub struct Subdivision {
    /// Boundary rings in WGS-84 (or any single shared planar CRS)
    pub boundary: MultiPolygon<f64>,
    /// The six census geography fields from the shapefile attribute table
    pub attributes: RegionAttributes,
}

/// Assigns stations to census subdivisions by containment, with a bounded
/// nearest-subdivision fallback
#[derive(Debug, Clone)]
pub struct StationAssigner {
    /// Subdivisions in canonical scan order (shapefile record order)
    subdivisions: Vec<Subdivision>,
    /// Maximum fallback distance in coordinate units
    fallback_radius: f64,
}

impl StationAssigner {
    /// Create an assigner over subdivisions in their load order
    pub fn new(subdivisions: Vec<Subdivision>, fallback_radius: f64) -> Self {
        Self {
            subdivisions,
            fallback_radius,
        }
    }

    /// Number of subdivisions in the scan set
    pub fn subdivision_count(&self) -> usize {
        self.subdivisions.len()
    }

    /// Assign every distinct station to a subdivision.
    ///
    /// Stations are deduplicated by (climate id, x, y) before the scan, and
    /// at most one record is produced per climate identifier (first
    /// coordinate wins). The result is deterministic for a given station
    /// order and subdivision order.
    pub fn assign(
        &self,
        stations: &[Station],
        progress: Option<&ProgressBar>,
    ) -> (AssignmentTable, AssignmentStats) {
        let start = Instant::now();
        let mut stats = AssignmentStats::new();
        stats.stations_in = stations.len();

        let distinct = deduplicate(stations);
        stats.distinct_points = distinct.len();

        if let Some(pb) = progress {
            pb.set_length(distinct.len() as u64);
        }

        let mut table = AssignmentTable::default();
        for station in distinct {
            if let Some(pb) = progress {
                pb.inc(1);
            }

            if table.records.contains_key(&station.climate_id) {
                // Same identifier at a second coordinate; the first
                // assignment stands.
                debug!(
                    "Station {} already assigned, skipping duplicate coordinates ({}, {})",
                    station.climate_id, station.x, station.y
                );
                continue;
            }

            let point = Point::new(station.x, station.y);
            if let Some(index) = self.containing_subdivision(&point) {
                stats.contained += 1;
                table
                    .records
                    .insert(station.climate_id.clone(), self.subdivisions[index].attributes.clone());
                continue;
            }

            match self.nearest_subdivision(&point) {
                Some((index, distance)) if distance < self.fallback_radius => {
                    debug!(
                        "Station {} outside every subdivision, nearest is {} at {:.3} units",
                        station.climate_id, self.subdivisions[index].attributes.csd_uid, distance
                    );
                    stats.fallback_assigned += 1;
                    table.records.insert(
                        station.climate_id.clone(),
                        self.subdivisions[index].attributes.clone(),
                    );
                }
                _ => {
                    if !table.unassigned.contains(&station.climate_id) {
                        table.unassigned.push(station.climate_id.clone());
                    }
                }
            }
        }

        // An identifier assigned from a later duplicate coordinate must not
        // also appear as unassigned.
        table.unassigned.retain(|id| !table.records.contains_key(id));
        stats.unassigned = table.unassigned.len();
        stats.duration = start.elapsed();

        (table, stats)
    }

    /// First subdivision in scan order whose boundary contains the point.
    /// Boundary points are excluded; a station exactly on a boundary falls
    /// through to the distance fallback.
    fn containing_subdivision(&self, point: &Point<f64>) -> Option<usize> {
        self.subdivisions
            .iter()
            .position(|sub| sub.boundary.contains(point))
    }

    /// Nearest subdivision by planar distance to the boundary. Ties resolve
    /// to the lowest scan index because only a strictly smaller distance
    /// replaces the current candidate.
    fn nearest_subdivision(&self, point: &Point<f64>) -> Option<(usize, f64)> {
        let mut nearest: Option<(usize, f64)> = None;
        for (index, sub) in self.subdivisions.iter().enumerate() {
            let distance = Euclidean.distance(point, &sub.boundary);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((index, distance)),
            }
        }
        nearest
    }
}

/// Deduplicate stations by (climate id, x, y), preserving first appearance
/// order
fn deduplicate(stations: &[Station]) -> Vec<&Station> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for station in stations {
        let key = (
            station.climate_id.clone(),
            station.x.to_bits(),
            station.y.to_bits(),
        );
        if seen.insert(key) {
            distinct.push(station);
        }
    }
    distinct
}
