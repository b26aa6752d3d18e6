//! Tests for the station assignment service

use crate::app::models::{RegionAttributes, Station};
use crate::app::services::assigner::Subdivision;
use geo::{LineString, MultiPolygon, Polygon};

pub mod assigner_tests;

/// Axis-aligned square boundary with lower-left corner (x0, y0)
pub fn square(x0: f64, y0: f64, side: f64) -> MultiPolygon<f64> {
    let ring = LineString::from(vec![
        (x0, y0),
        (x0 + side, y0),
        (x0 + side, y0 + side),
        (x0, y0 + side),
        (x0, y0),
    ]);
    MultiPolygon(vec![Polygon::new(ring, vec![])])
}

/// Region attributes with distinguishable codes derived from the CSDUID
pub fn attrs(csd_uid: i64) -> RegionAttributes {
    RegionAttributes {
        csd_uid,
        csd_name: format!("Subdivision {csd_uid}"),
        pr_uid: 35,
        pr_name: "Ontario".to_string(),
        cd_uid: csd_uid / 100,
        cd_name: format!("Division {}", csd_uid / 100),
    }
}

pub fn subdivision(csd_uid: i64, boundary: MultiPolygon<f64>) -> Subdivision {
    Subdivision {
        boundary,
        attributes: attrs(csd_uid),
    }
}

pub fn station(climate_id: &str, x: f64, y: f64) -> Station {
    Station {
        climate_id: climate_id.to_string(),
        x,
        y,
    }
}
