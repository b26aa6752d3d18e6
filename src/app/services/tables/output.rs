//! Writers for the derived subdivision and division average tables
//!
//! Columns appear in a fixed order and absent cells are written as empty
//! fields, never as zero or a sentinel. Rows are written in the order the
//! aggregator produced them (region code, then date), which together with
//! the fixed columns makes reruns on unchanged input byte-identical.

use crate::app::models::{CoarseAverage, FineAverage};
use crate::constants::{columns, CLIMATE_VARIABLES};
use crate::{Error, Result};
use std::path::Path;
use tracing::info;

/// Write the subdivision (fine) averages table
pub fn write_fine(path: &Path, rows: &[FineAverage]) -> Result<()> {
    let file_name = path.display().to_string();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to create output file", Some(e)))?;

    let mut header = vec![
        columns::PRUID,
        columns::PRNAME,
        columns::CDUID,
        columns::CDNAME,
        columns::CSDUID,
        columns::CSDNAME,
        columns::LOCAL_DATE,
        columns::LOCAL_YEAR,
        columns::LOCAL_MONTH,
        columns::LOCAL_DAY,
    ];
    header.extend_from_slice(CLIMATE_VARIABLES);
    header.push(columns::POP);
    writer
        .write_record(&header)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to write header", Some(e)))?;

    for row in rows {
        let mut record = vec![
            row.region.pr_uid.to_string(),
            row.region.pr_name.clone(),
            row.region.cd_uid.to_string(),
            row.region.cd_name.clone(),
            row.region.csd_uid.to_string(),
            row.region.csd_name.clone(),
            row.date.to_string(),
            row.date.year.to_string(),
            row.date.month.to_string(),
            row.date.day.to_string(),
        ];
        record.extend(row.values.iter().map(|v| optional_cell(*v)));
        record.push(optional_cell(row.population));
        writer
            .write_record(&record)
            .map_err(|e| Error::csv_parsing(&file_name, "failed to write row", Some(e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::io("failed to flush output file", e))?;
    info!("Wrote {} subdivision average rows to {}", rows.len(), file_name);
    Ok(())
}

/// Write the division (coarse) weighted averages table
pub fn write_coarse(path: &Path, rows: &[CoarseAverage]) -> Result<()> {
    let file_name = path.display().to_string();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to create output file", Some(e)))?;

    let mut header = vec![
        columns::PRUID,
        columns::PRNAME,
        columns::CDUID,
        columns::CDNAME,
        columns::LOCAL_DATE,
        columns::LOCAL_YEAR,
        columns::LOCAL_MONTH,
        columns::LOCAL_DAY,
    ];
    header.extend_from_slice(CLIMATE_VARIABLES);
    writer
        .write_record(&header)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to write header", Some(e)))?;

    for row in rows {
        let mut record = vec![
            row.pr_uid.to_string(),
            row.pr_name.clone(),
            row.cd_uid.to_string(),
            row.cd_name.clone(),
            row.date.to_string(),
            row.date.year.to_string(),
            row.date.month.to_string(),
            row.date.day.to_string(),
        ];
        record.extend(row.values.iter().map(|v| optional_cell(*v)));
        writer
            .write_record(&record)
            .map_err(|e| Error::csv_parsing(&file_name, "failed to write row", Some(e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::io("failed to flush output file", e))?;
    info!("Wrote {} division average rows to {}", rows.len(), file_name);
    Ok(())
}

/// Serialize an optional value; absent becomes an empty field
fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
