//! Table readers and writers for the pipeline's external interfaces
//!
//! The core is agnostic to storage; these modules implement the concrete
//! formats in use: CSV for the observation batch, population estimates,
//! the assignment cache, and the output tables, and ESRI shapefile for the
//! subdivision boundaries.
//!
//! Schema problems (missing columns, malformed keys or coordinates) are
//! fatal for the affected source and carry file and row context; they are
//! never silently skipped, since assignment correctness depends on
//! complete keys.

pub mod assignments;
pub mod observations;
pub mod output;
pub mod subdivisions;
pub mod weights;

#[cfg(test)]
pub mod tests;

pub use assignments::{read_assignments, write_assignments};
pub use observations::{read_observations, ObservationBatch};
pub use output::{write_coarse, write_fine};
pub use subdivisions::read_subdivisions;
pub use weights::read_weights;
