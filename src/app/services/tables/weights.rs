//! Reader for the subdivision population estimates table

use crate::app::models::WeightTable;
use crate::constants::columns;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Read population estimates from a CSV of (CSDUID, LOCAL_YEAR, POP) rows.
///
/// An empty POP field is an absent estimate and the row is not stored (the
/// aggregation stage counts the resulting join miss); a negative POP is a
/// fatal data error. Duplicate (CSDUID, LOCAL_YEAR) keys keep the last
/// row, matching a plain keyed join against the source file.
pub fn read_weights(path: &Path) -> Result<WeightTable> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let file_name = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to open weights table", Some(e)))?;

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

    let csd_col = column(columns::CSDUID)?;
    let year_col = column(columns::LOCAL_YEAR)?;
    let pop_col = column(columns::POP)?;

    let mut table = WeightTable::new();
    let mut absent_rows = 0usize;

    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record = record.map_err(|e| {
            Error::csv_parsing(&file_name, format!("failed to read row {line}"), Some(e))
        })?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let csd_uid = field(csd_col).parse::<i64>().map_err(|_| {
            Error::invalid_row(
                &file_name,
                line,
                format!("malformed {}='{}'", columns::CSDUID, field(csd_col)),
            )
        })?;
        let year = field(year_col).parse::<i32>().map_err(|_| {
            Error::invalid_row(
                &file_name,
                line,
                format!("malformed {}='{}'", columns::LOCAL_YEAR, field(year_col)),
            )
        })?;

        let raw_pop = field(pop_col);
        if raw_pop.is_empty() {
            absent_rows += 1;
            continue;
        }
        let population = raw_pop.parse::<f64>().map_err(|_| {
            Error::invalid_row(
                &file_name,
                line,
                format!("malformed {}='{raw_pop}'", columns::POP),
            )
        })?;
        if population < 0.0 {
            return Err(Error::invalid_row(
                &file_name,
                line,
                format!("negative population {population}"),
            ));
        }

        table.insert(csd_uid, year, population);
    }

    if absent_rows > 0 {
        debug!("{absent_rows} weight rows had no population estimate");
    }
    info!("Read {} population estimates from {}", table.len(), file_name);

    Ok(table)
}
