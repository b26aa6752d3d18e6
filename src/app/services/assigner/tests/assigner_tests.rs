//! Containment, fallback, tie-break, and determinism tests for the
//! station assignment scan

use super::{attrs, square, station, subdivision};
use crate::app::services::assigner::StationAssigner;
use crate::constants::DEFAULT_FALLBACK_RADIUS;

#[test]
fn interior_station_gets_containing_subdivision() {
    let assigner = StationAssigner::new(
        vec![
            subdivision(3501005, square(0.0, 0.0, 10.0)),
            subdivision(3501011, square(20.0, 0.0, 10.0)),
        ],
        DEFAULT_FALLBACK_RADIUS,
    );

    let (table, stats) = assigner.assign(&[station("6158355", 25.0, 5.0)], None);

    assert_eq!(table.get("6158355"), Some(&attrs(3501011)));
    assert_eq!(stats.contained, 1);
    assert_eq!(stats.fallback_assigned, 0);
    assert_eq!(stats.unassigned, 0);
}

#[test]
fn overlapping_subdivisions_first_record_wins() {
    // Both squares contain (5, 5); the scan must stop at the first.
    let assigner = StationAssigner::new(
        vec![
            subdivision(3501005, square(0.0, 0.0, 10.0)),
            subdivision(3501011, square(0.0, 0.0, 10.0)),
        ],
        DEFAULT_FALLBACK_RADIUS,
    );

    let (table, _) = assigner.assign(&[station("6158355", 5.0, 5.0)], None);

    assert_eq!(table.get("6158355"), Some(&attrs(3501005)));
}

#[test]
fn station_outside_all_boundaries_falls_back_to_nearest_within_radius() {
    let assigner = StationAssigner::new(
        vec![
            subdivision(3501005, square(0.0, 0.0, 10.0)),
            subdivision(3501011, square(100.0, 0.0, 10.0)),
        ],
        DEFAULT_FALLBACK_RADIUS,
    );

    // 15 units right of the first square, 75 left of the second.
    let (table, stats) = assigner.assign(&[station("6158355", 25.0, 5.0)], None);

    assert_eq!(table.get("6158355"), Some(&attrs(3501005)));
    assert_eq!(stats.contained, 0);
    assert_eq!(stats.fallback_assigned, 1);
}

#[test]
fn station_beyond_fallback_radius_is_unassigned() {
    let assigner = StationAssigner::new(
        vec![subdivision(3501005, square(0.0, 0.0, 10.0))],
        DEFAULT_FALLBACK_RADIUS,
    );

    let (table, stats) = assigner.assign(&[station("7068940", 100.0, 5.0)], None);

    assert_eq!(table.get("7068940"), None);
    assert_eq!(table.unassigned, vec!["7068940".to_string()]);
    assert_eq!(stats.unassigned, 1);
    assert_eq!(stats.assigned(), 0);
}

#[test]
fn station_exactly_at_radius_is_unassigned() {
    // Distance test is strictly less-than, so exactly 50 units misses.
    let assigner = StationAssigner::new(
        vec![subdivision(3501005, square(0.0, 0.0, 10.0))],
        DEFAULT_FALLBACK_RADIUS,
    );

    let (table, _) = assigner.assign(&[station("7068940", 60.0, 5.0)], None);

    assert_eq!(table.get("7068940"), None);
}

#[test]
fn equidistant_fallback_resolves_to_lowest_scan_index() {
    // (15, 5) is 5 units from both squares.
    let subdivisions = vec![
        subdivision(3501005, square(0.0, 0.0, 10.0)),
        subdivision(3501011, square(20.0, 0.0, 10.0)),
    ];
    let assigner = StationAssigner::new(subdivisions.clone(), DEFAULT_FALLBACK_RADIUS);

    let (table, _) = assigner.assign(&[station("6158355", 15.0, 5.0)], None);
    assert_eq!(table.get("6158355"), Some(&attrs(3501005)));

    // Reversing the scan order flips the winner, confirming the tie-break
    // follows scan order rather than any property of the geometry.
    let reversed = StationAssigner::new(
        subdivisions.into_iter().rev().collect(),
        DEFAULT_FALLBACK_RADIUS,
    );
    let (table, _) = reversed.assign(&[station("6158355", 15.0, 5.0)], None);
    assert_eq!(table.get("6158355"), Some(&attrs(3501011)));
}

#[test]
fn boundary_station_is_excluded_from_containment_but_caught_by_fallback() {
    // (10, 5) sits exactly on the shared edge of the two squares. Neither
    // contains it (boundary excluded); the fallback sees distance 0 to both
    // and picks the lowest index.
    let assigner = StationAssigner::new(
        vec![
            subdivision(3501005, square(0.0, 0.0, 10.0)),
            subdivision(3501011, square(10.0, 0.0, 10.0)),
        ],
        DEFAULT_FALLBACK_RADIUS,
    );

    let (table, stats) = assigner.assign(&[station("6158355", 10.0, 5.0)], None);

    assert_eq!(table.get("6158355"), Some(&attrs(3501005)));
    assert_eq!(stats.contained, 0);
    assert_eq!(stats.fallback_assigned, 1);
}

#[test]
fn duplicate_station_rows_collapse_to_one_query() {
    let assigner = StationAssigner::new(
        vec![subdivision(3501005, square(0.0, 0.0, 10.0))],
        DEFAULT_FALLBACK_RADIUS,
    );

    let stations = vec![
        station("6158355", 5.0, 5.0),
        station("6158355", 5.0, 5.0),
        station("6158355", 5.0, 5.0),
    ];
    let (table, stats) = assigner.assign(&stations, None);

    assert_eq!(stats.stations_in, 3);
    assert_eq!(stats.distinct_points, 1);
    assert_eq!(table.assigned_count(), 1);
}

#[test]
fn duplicate_identifier_at_second_coordinate_keeps_first_assignment() {
    let assigner = StationAssigner::new(
        vec![
            subdivision(3501005, square(0.0, 0.0, 10.0)),
            subdivision(3501011, square(20.0, 0.0, 10.0)),
        ],
        DEFAULT_FALLBACK_RADIUS,
    );

    let stations = vec![station("6158355", 5.0, 5.0), station("6158355", 25.0, 5.0)];
    let (table, _) = assigner.assign(&stations, None);

    assert_eq!(table.assigned_count(), 1);
    assert_eq!(table.get("6158355"), Some(&attrs(3501005)));
}

#[test]
fn summary_reports_assignment_rate() {
    let assigner = StationAssigner::new(
        vec![subdivision(3501005, square(0.0, 0.0, 10.0))],
        DEFAULT_FALLBACK_RADIUS,
    );

    let stations = vec![station("6158355", 5.0, 5.0), station("7068940", 500.0, 5.0)];
    let (_, stats) = assigner.assign(&stations, None);

    assert_eq!(stats.assignment_rate(), 50.0);
    assert!(stats.summary().contains("50.0%"));
}

#[test]
fn assignment_is_deterministic_across_runs() {
    let assigner = StationAssigner::new(
        vec![
            subdivision(3501005, square(0.0, 0.0, 10.0)),
            subdivision(3501011, square(20.0, 0.0, 10.0)),
        ],
        DEFAULT_FALLBACK_RADIUS,
    );

    let stations = vec![
        station("6158355", 5.0, 5.0),
        station("7068940", 15.0, 5.0),
        station("8403505", 500.0, 500.0),
    ];

    let (first, _) = assigner.assign(&stations, None);
    let (second, _) = assigner.assign(&stations, None);

    assert_eq!(first, second);
}
