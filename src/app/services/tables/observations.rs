//! Reader for the daily climate observation batch
//!
//! The batch is a CSV export of the Environment Canada climate-daily feed:
//! one row per station per day, with the station coordinates repeated on
//! every row. The station point set is derived from those coordinate
//! columns and deduplicated, so no separate station list is needed.

use crate::app::models::{ObsDate, Observation, Station};
use crate::constants::{columns, CLIMATE_VARIABLES};
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// One parsed observation batch: the raw observations plus the distinct
/// station points they came from, in first appearance order
#[derive(Debug, Clone)]
pub struct ObservationBatch {
    pub observations: Vec<Observation>,
    pub stations: Vec<Station>,
}

impl ObservationBatch {
    /// Latest observation year in the batch, used to name output files
    pub fn latest_year(&self) -> Option<i32> {
        self.observations.iter().map(|o| o.date.year).max()
    }
}

/// Read an observation batch from a CSV file.
///
/// Required columns: CLIMATE_IDENTIFIER, x, y, LOCAL_YEAR, LOCAL_MONTH,
/// LOCAL_DAY, and every climate variable. A missing column or a malformed
/// key field aborts the read with row context; an empty variable field is
/// an absent measurement, not an error.
pub fn read_observations(path: &Path) -> Result<ObservationBatch> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let file_name = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::csv_parsing(&file_name, "failed to open observation batch", Some(e)))?;

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
    let x_col = column(columns::X)?;
    let y_col = column(columns::Y)?;
    let year_col = column(columns::LOCAL_YEAR)?;
    let month_col = column(columns::LOCAL_MONTH)?;
    let day_col = column(columns::LOCAL_DAY)?;
    let variable_cols = CLIMATE_VARIABLES
        .iter()
        .map(|name| column(name))
        .collect::<Result<Vec<usize>>>()?;

    let mut observations = Vec::new();
    let mut stations = Vec::new();
    let mut seen_stations = HashSet::new();

    for (index, record) in reader.records().enumerate() {
        let line = index + 2; // 1-based, after the header row
        let record = record.map_err(|e| {
            Error::csv_parsing(&file_name, format!("failed to read row {line}"), Some(e))
        })?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let climate_id = field(id_col);
        if climate_id.is_empty() {
            return Err(Error::invalid_row(&file_name, line, "empty station identifier"));
        }

        let x = parse_f64(&file_name, line, columns::X, field(x_col))?;
        let y = parse_f64(&file_name, line, columns::Y, field(y_col))?;

        let year: i32 = parse_int(&file_name, line, columns::LOCAL_YEAR, field(year_col))?;
        let month: u32 = parse_int(&file_name, line, columns::LOCAL_MONTH, field(month_col))?;
        let day: u32 = parse_int(&file_name, line, columns::LOCAL_DAY, field(day_col))?;
        let date = ObsDate::new(year, month, day).ok_or_else(|| {
            Error::invalid_row(
                &file_name,
                line,
                format!("invalid calendar date {year:04}-{month:02}-{day:02}"),
            )
        })?;

        let mut values = Vec::with_capacity(variable_cols.len());
        for (slot, col) in variable_cols.iter().enumerate() {
            let raw = field(*col);
            if raw.is_empty() {
                values.push(None);
            } else {
                values.push(Some(parse_f64(
                    &file_name,
                    line,
                    CLIMATE_VARIABLES[slot],
                    raw,
                )?));
            }
        }

        let station_key = (climate_id.to_string(), x.to_bits(), y.to_bits());
        if seen_stations.insert(station_key) {
            stations.push(Station {
                climate_id: climate_id.to_string(),
                x,
                y,
            });
        }

        observations.push(Observation {
            climate_id: climate_id.to_string(),
            date,
            values,
        });
    }

    info!(
        "Read {} observations from {} distinct stations in {}",
        observations.len(),
        stations.len(),
        file_name
    );

    Ok(ObservationBatch {
        observations,
        stations,
    })
}

fn parse_f64(file: &str, line: usize, name: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| {
        Error::invalid_row(file, line, format!("malformed numeric field {name}='{raw}'"))
    })
}

/// Parse into the target integer type directly, so an out-of-range date
/// component is rejected instead of wrapping into a valid-looking value
fn parse_int<T: std::str::FromStr>(file: &str, line: usize, name: &str, raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(|_| {
        Error::invalid_row(file, line, format!("malformed integer field {name}='{raw}'"))
    })
}
