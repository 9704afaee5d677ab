//! Core coordinate remapping functionality
//!
//! This module contains the mapping file parser, the interval table,
//! the position and range resolvers and the query orchestration.

pub mod converter;
mod coordinate;
mod error;
pub mod io;
mod mapping;
mod resolver;
mod table;

pub use converter::{
    convert, ConversionResult, MULTIPLE_SCAFFOLDS, NOTE_MULTIPLE_SCAFFOLDS, NOTE_UNRESOLVED,
};
pub use coordinate::ParsedCoordinate;
pub use error::{
    CoordinateError, CoordinateResult, LookupError, LookupResult, MappingFileError,
    MappingResult, RemapError, Result,
};
pub use io::{
    create_output, decode_line, detect_compression, open_input, open_reader, ByteLineIterator,
    CompressionFormat,
};
pub use mapping::{
    parse_mapping_bytes, parse_mapping_file, parse_mapping_reader, MappingFile, MappingRecord,
    Strand,
};
pub use resolver::{
    resolve_position, resolve_range, PositionQuery, RangeQuery, RangeResolution, ResolvedPosition,
};
pub use table::{strip_chr_prefix, Interval, IntervalTable};
