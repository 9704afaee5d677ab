//! FlyBase Remap - genome assembly coordinate conversion for FlyBase data
//!
//! Converts `chr:start..end` coordinates between Drosophila assembly
//! releases using a table of aligned blocks, and reports when a range
//! crosses regions of change, lands on another scaffold or is inverted.
//! Also ships the small FlyBase ID and symbol lookup utilities.
//!
//! # Example
//!
//! ```ignore
//! use flybase_remap::{convert, IntervalTable, ParsedCoordinate};
//!
//! // Load mapping table
//! let table = IntervalTable::from_mapping_file("dmel_r5_to_r6.tsv")?;
//!
//! // Convert a coordinate
//! let coord = ParsedCoordinate::parse("3R:3,020,320")?;
//! let result = convert(&table, &coord);
//! assert_eq!(result.coordinate_text(), "3R:7194598");
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    convert, resolve_position, resolve_range, ConversionResult, CoordinateError, Interval,
    IntervalTable, LookupError, MappingFileError, MappingRecord, ParsedCoordinate, PositionQuery,
    RangeQuery, RemapError, Strand,
};
pub use formats::{coords, ids, symbols};
