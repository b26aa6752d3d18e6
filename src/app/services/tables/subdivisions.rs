//! Loader for the census subdivision boundary shapefile
//!
//! Reads polygon shapes and their dBASE attribute records together, in
//! file order. Record order matters downstream: it is the canonical scan
//! order for first-match-wins containment and fallback tie-breaks, so this
//! loader must never reorder or drop records.

use crate::app::models::RegionAttributes;
use crate::app::services::assigner::Subdivision;
use crate::constants::columns;
use crate::{Error, Result};
use geo::{LineString, MultiPolygon, Polygon};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Point as ShpPoint, Polygon as ShpPolygon, PolygonRing};
use std::path::Path;
use tracing::info;

/// Read subdivision boundaries and attributes from a shapefile.
///
/// Every record must carry the six census geography fields and at least one
/// well-formed boundary ring; anything less is a fatal shape error with the
/// record index.
pub fn read_subdivisions(path: &Path) -> Result<Vec<Subdivision>> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let file_name = path.display().to_string();

    let mut reader = shapefile::Reader::from_path(path)
        .map_err(|e| Error::shapefile(&file_name, e.to_string()))?;
    let shape_records = reader
        .read_as::<ShpPolygon, Record>()
        .map_err(|e| Error::shapefile(&file_name, e.to_string()))?;

    let mut subdivisions = Vec::with_capacity(shape_records.len());
    for (index, (shape, record)) in shape_records.into_iter().enumerate() {
        let boundary = multi_polygon_from_rings(shape.rings(), &file_name, index)?;
        let attributes = RegionAttributes {
            csd_uid: code_field(&record, columns::CSDUID, &file_name, index)?,
            csd_name: text_field(&record, columns::CSDNAME, &file_name, index)?,
            pr_uid: code_field(&record, columns::PRUID, &file_name, index)?,
            pr_name: text_field(&record, columns::PRNAME, &file_name, index)?,
            cd_uid: code_field(&record, columns::CDUID, &file_name, index)?,
            cd_name: text_field(&record, columns::CDNAME, &file_name, index)?,
        };
        subdivisions.push(Subdivision {
            boundary,
            attributes,
        });
    }

    info!("Loaded {} subdivision boundaries from {}", subdivisions.len(), file_name);
    Ok(subdivisions)
}

/// Convert shapefile polygon rings to a geo MultiPolygon, grouping each
/// outer ring with the inner rings that follow it (shapefile ring order).
pub(crate) fn multi_polygon_from_rings(
    rings: &[PolygonRing<ShpPoint>],
    file: &str,
    index: usize,
) -> Result<MultiPolygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let points = ring.points();
        if points.len() < 3 {
            return Err(Error::invalid_row(
                file,
                index,
                format!("boundary ring with fewer than 3 points ({})", points.len()),
            ));
        }
        let line = LineString::from(
            points
                .iter()
                .map(|point| (point.x, point.y))
                .collect::<Vec<_>>(),
        );
        match ring {
            PolygonRing::Outer(_) => {
                if let Some(outer) = exterior.take() {
                    polygons.push(Polygon::new(outer, std::mem::take(&mut holes)));
                }
                exterior = Some(line);
            }
            PolygonRing::Inner(_) => {
                if exterior.is_none() {
                    return Err(Error::invalid_row(
                        file,
                        index,
                        "inner ring precedes any outer ring",
                    ));
                }
                holes.push(line);
            }
        }
    }
    if let Some(outer) = exterior {
        polygons.push(Polygon::new(outer, holes));
    }

    if polygons.is_empty() {
        return Err(Error::invalid_row(file, index, "record has no boundary rings"));
    }
    Ok(MultiPolygon(polygons))
}

/// Extract a required text attribute from a dBASE record
pub(crate) fn text_field(record: &Record, name: &str, file: &str, index: usize) -> Result<String> {
    match record.get(name) {
        Some(FieldValue::Character(Some(value))) if !value.trim().is_empty() => {
            Ok(value.trim().to_string())
        }
        Some(FieldValue::Character(_)) => Err(Error::invalid_row(
            file,
            index,
            format!("empty attribute '{name}'"),
        )),
        Some(other) => Err(Error::invalid_row(
            file,
            index,
            format!("attribute '{name}' has unexpected type: {other:?}"),
        )),
        None => Err(Error::invalid_row(
            file,
            index,
            format!("missing attribute '{name}'"),
        )),
    }
}

/// Extract a required numeric region code from a dBASE record. StatsCan
/// files store UIDs as either character or numeric fields depending on
/// vintage.
pub(crate) fn code_field(record: &Record, name: &str, file: &str, index: usize) -> Result<i64> {
    match record.get(name) {
        Some(FieldValue::Character(Some(value))) => value.trim().parse::<i64>().map_err(|_| {
            Error::invalid_row(file, index, format!("attribute '{name}'='{value}' is not numeric"))
        }),
        Some(FieldValue::Numeric(Some(value))) => Ok(*value as i64),
        Some(FieldValue::Integer(value)) => Ok(i64::from(*value)),
        Some(FieldValue::Double(value)) => Ok(*value as i64),
        Some(FieldValue::Character(None)) | Some(FieldValue::Numeric(None)) => Err(
            Error::invalid_row(file, index, format!("empty attribute '{name}'")),
        ),
        Some(other) => Err(Error::invalid_row(
            file,
            index,
            format!("attribute '{name}' has unexpected type: {other:?}"),
        )),
        None => Err(Error::invalid_row(
            file,
            index,
            format!("missing attribute '{name}'"),
        )),
    }
}
