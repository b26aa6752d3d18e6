//! CSV cache for the station-to-subdivision assignment table
//!
//! The assignment table changes only when the station set or the boundary
//! file changes, so it is persisted after a fresh scan and reused on later
//! runs unless a refresh is requested. Only assigned stations are stored;
//! unassigned identifiers are re-derived by the next fresh scan.

use crate::app::models::{AssignmentTable, RegionAttributes};
use crate::constants::columns;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Column order of the cache file, fixed for reproducible diffs
const HEADER: &[&str] = &[
    columns::CLIMATE_IDENTIFIER,
    columns::CSDUID,
    columns::CSDNAME,
    columns::PRUID,
    columns::PRNAME,
    columns::CDUID,
    columns::CDNAME,
];

/// Write the assignment table, one row per assigned station, sorted by
/// climate identifier for byte-stable output
pub fn write_assignments(path: &Path, table: &AssignmentTable) -> Result<()> {
    let file_name = path.display().to_string();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to create assignment cache", Some(e)))?;

    writer
        .write_record(HEADER)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to write header", Some(e)))?;

    let mut rows: Vec<(&String, &RegionAttributes)> = table.records.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    for (climate_id, attrs) in rows {
        writer
            .write_record(&[
                climate_id.as_str(),
                &attrs.csd_uid.to_string(),
                &attrs.csd_name,
                &attrs.pr_uid.to_string(),
                &attrs.pr_name,
                &attrs.cd_uid.to_string(),
                &attrs.cd_name,
            ])
            .map_err(|e| Error::csv_parsing(&file_name, "failed to write row", Some(e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::io("failed to flush assignment cache", e))?;
    info!("Wrote {} station assignments to {}", table.assigned_count(), file_name);
    Ok(())
}

/// Read a previously written assignment table.
///
/// Every field is required; duplicate identifiers keep the first row, in
/// line with the one-record-per-identifier invariant.
pub fn read_assignments(path: &Path) -> Result<AssignmentTable> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let file_name = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to open assignment cache", Some(e)))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::csv_parsing(&file_name, "failed to read header row", Some(e)))?
        .clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::missing_column(&file_name, name))
    };

    let id_col = column(columns::CLIMATE_IDENTIFIER)?;
    let csd_uid_col = column(columns::CSDUID)?;
    let csd_name_col = column(columns::CSDNAME)?;
    let pr_uid_col = column(columns::PRUID)?;
    let pr_name_col = column(columns::PRNAME)?;
    let cd_uid_col = column(columns::CDUID)?;
    let cd_name_col = column(columns::CDNAME)?;

    let mut table = AssignmentTable::default();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record = record.map_err(|e| {
            Error::csv_parsing(&file_name, format!("failed to read row {line}"), Some(e))
        })?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();
        let code = |col: usize, name: &str| -> Result<i64> {
            field(col).parse::<i64>().map_err(|_| {
                Error::invalid_row(
                    &file_name,
                    line,
                    format!("malformed {name}='{}'", field(col)),
                )
            })
        };

        let climate_id = field(id_col);
        if climate_id.is_empty() {
            return Err(Error::invalid_row(&file_name, line, "empty station identifier"));
        }
        let attrs = RegionAttributes {
            csd_uid: code(csd_uid_col, columns::CSDUID)?,
            csd_name: field(csd_name_col).to_string(),
            pr_uid: code(pr_uid_col, columns::PRUID)?,
            pr_name: field(pr_name_col).to_string(),
            cd_uid: code(cd_uid_col, columns::CDUID)?,
            cd_name: field(cd_name_col).to_string(),
        };

        if table.records.contains_key(climate_id) {
            debug!("Duplicate assignment row for {climate_id}, keeping first");
            continue;
        }
        table.records.insert(climate_id.to_string(), attrs);
    }

    info!("Read {} cached station assignments from {}", table.assigned_count(), file_name);
    Ok(table)
}
