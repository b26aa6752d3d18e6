//! Tests for the output table writers

use crate::app::models::{CoarseAverage, FineAverage, ObsDate, RegionAttributes};
use crate::app::services::tables::output::{write_coarse, write_fine};
use crate::constants::CLIMATE_VARIABLES;
use tempfile::TempDir;

fn fine_row() -> FineAverage {
    let mut values = vec![None; CLIMATE_VARIABLES.len()];
    values[0] = Some(15.5);
    FineAverage {
        region: RegionAttributes {
            csd_uid: 3501005,
            csd_name: "South Glengarry".to_string(),
            pr_uid: 35,
            pr_name: "Ontario".to_string(),
            cd_uid: 3501,
            cd_name: "Stormont-Dundas-Glengarry".to_string(),
        },
        date: ObsDate::new(2021, 6, 1).unwrap(),
        values,
        population: Some(13330.0),
    }
}

#[test]
fn fine_writer_emits_fixed_header_and_empty_absent_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("daily_csd_climate_2021.csv");

    write_fine(&path, &[fine_row()]).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert!(lines[0].starts_with("PRUID,PRNAME,CDUID,CDNAME,CSDUID,CSDNAME,LOCAL_DATE,"));
    assert!(lines[0].ends_with(",MAX_REL_HUMIDITY,POP"));

    let fields: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(fields[4], "3501005");
    assert_eq!(fields[6], "2021-06-01");
    assert_eq!(fields[10], "15.5"); // first climate variable
    assert_eq!(fields[11], ""); // absent stays empty, never zero
    assert_eq!(fields.last(), Some(&"13330"));
}

#[test]
fn coarse_writer_emits_division_rows_without_subdivision_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("daily_cd_climate_2021.csv");

    let mut values = vec![None; CLIMATE_VARIABLES.len()];
    values[0] = Some(16.0);
    let row = CoarseAverage {
        pr_uid: 35,
        pr_name: "Ontario".to_string(),
        cd_uid: 3501,
        cd_name: "Stormont-Dundas-Glengarry".to_string(),
        date: ObsDate::new(2021, 6, 1).unwrap(),
        values,
    };

    write_coarse(&path, &[row]).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert!(lines[0].starts_with("PRUID,PRNAME,CDUID,CDNAME,LOCAL_DATE,"));
    assert!(!lines[0].contains("CSDUID"));

    let fields: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(fields[2], "3501");
    assert_eq!(fields[8], "16");
}
