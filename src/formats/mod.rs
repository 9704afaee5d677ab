//! Line-oriented file drivers
//!
//! Batch coordinate conversion plus the FlyBase gene ID updater and the
//! symbol to ID lookup.

pub mod coords;
pub mod ids;
pub mod symbols;

pub use coords::{
    convert_coordinates, convert_line, convert_line_bytes, ConversionStats, LineOutcome, RemapRecord,
};
pub use ids::{update_ids, IdTable, UpdateStats};
pub use symbols::{lookup_symbols, LookupStats, SymbolTable};
