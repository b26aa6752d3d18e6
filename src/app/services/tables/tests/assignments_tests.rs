//! Tests for the assignment table cache

use super::write_fixture;
use crate::app::models::{AssignmentTable, RegionAttributes};
use crate::app::services::tables::assignments::{read_assignments, write_assignments};
use crate::Error;
use tempfile::TempDir;

fn attrs(csd_uid: i64) -> RegionAttributes {
    RegionAttributes {
        csd_uid,
        csd_name: format!("Subdivision {csd_uid}"),
        pr_uid: 35,
        pr_name: "Ontario".to_string(),
        cd_uid: csd_uid / 100,
        cd_name: format!("Division {}", csd_uid / 100),
    }
}

#[test]
fn cache_preserves_assigned_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stations_sd.csv");

    let mut table = AssignmentTable::default();
    table.records.insert("6158355".to_string(), attrs(3501005));
    table.records.insert("7068940".to_string(), attrs(3501011));
    table.unassigned.push("8403505".to_string());

    write_assignments(&path, &table).unwrap();
    let restored = read_assignments(&path).unwrap();

    assert_eq!(restored.records, table.records);
    // Unassigned stations are not cached; a fresh scan re-derives them.
    assert!(restored.unassigned.is_empty());
}

#[test]
fn cache_is_sorted_by_identifier_for_stable_diffs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stations_sd.csv");

    let mut table = AssignmentTable::default();
    table.records.insert("7068940".to_string(), attrs(3501011));
    table.records.insert("6158355".to_string(), attrs(3501005));

    write_assignments(&path, &table).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert!(lines[1].starts_with("6158355,"));
    assert!(lines[2].starts_with("7068940,"));
}

#[test]
fn rewriting_unchanged_table_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path_a = dir.path().join("a.csv");
    let path_b = dir.path().join("b.csv");

    let mut table = AssignmentTable::default();
    table.records.insert("6158355".to_string(), attrs(3501005));
    table.records.insert("7068940".to_string(), attrs(3501011));

    write_assignments(&path_a, &table).unwrap();
    write_assignments(&path_b, &table).unwrap();

    assert_eq!(
        std::fs::read(&path_a).unwrap(),
        std::fs::read(&path_b).unwrap()
    );
}

#[test]
fn malformed_region_code_is_fatal() {
    let dir = TempDir::new().unwrap();
    let contents = "CLIMATE_IDENTIFIER,CSDUID,CSDNAME,PRUID,PRNAME,CDUID,CDNAME\n\
                    6158355,not-a-code,Toronto,35,Ontario,3520,Toronto\n";
    let path = write_fixture(&dir, "stations_sd.csv", contents);

    let err = read_assignments(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidRow { .. }));
}
