//! Assembly mapping file parsing
//!
//! # Mapping File Format
//!
//! ```text
//! chr start end newchr newstart newend strand
//! ```
//!
//! - One aligned block per row, whitespace or tab delimited, no header
//! - Start/end pairs may be given in either order and are normalized
//! - Strand is `+` or `-`; `-` marks a block inverted between releases
//! - Blank lines and `#` comments are ignored

use crate::core::error::{MappingFileError, MappingResult};
use crate::core::io::{decode_line, open_reader, ByteLineIterator};
use log::{debug, warn};
use std::io::BufRead;
use std::path::Path;

/// Number of leading fields every mapping row must carry
pub const MIN_FIELDS: usize = 6;

/// Largest coordinate accepted in a mapping row
///
/// Interval offsets are sums and differences of two coordinates; this bound
/// keeps them and every translated position within `i64`.
pub const MAX_COORDINATE: i64 = i64::MAX / 4;

/// Strand orientation of an aligned block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    /// Parse strand from a token
    ///
    /// # Examples
    /// ```
    /// use flybase_remap::core::Strand;
    /// assert_eq!(Strand::from_token("+"), Some(Strand::Plus));
    /// assert_eq!(Strand::from_token("-"), Some(Strand::Minus));
    /// assert_eq!(Strand::from_token("."), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }

    /// Whether the block is reversed in the destination assembly
    pub fn is_inverted(&self) -> bool {
        matches!(self, Strand::Minus)
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One row of the mapping file with both intervals normalized so start <= end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    /// Source chromosome name
    pub chrom: String,
    /// Source start (inclusive)
    pub start: i64,
    /// Source end (inclusive)
    pub end: i64,
    /// Destination chromosome name
    pub new_chrom: String,
    /// Destination start (inclusive)
    pub new_start: i64,
    /// Destination end (inclusive)
    pub new_end: i64,
    /// Block orientation
    pub strand: Strand,
}

impl MappingRecord {
    /// Parse a single mapping row
    ///
    /// The strand column is optional; a row with exactly six fields is
    /// treated as `+`. Any strand token other than `+` or `-` is rejected.
    pub fn parse(line: &str, line_number: usize) -> MappingResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() < MIN_FIELDS {
            return Err(MappingFileError::TooFewFields {
                line: line_number,
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }

        let start = parse_coord(fields[1], "start", line_number)?;
        let end = parse_coord(fields[2], "end", line_number)?;
        let new_start = parse_coord(fields[4], "new start", line_number)?;
        let new_end = parse_coord(fields[5], "new end", line_number)?;

        let strand = match fields.get(6) {
            Some(token) => Strand::from_token(token).ok_or_else(|| {
                MappingFileError::InvalidStrand {
                    line: line_number,
                    strand: token.to_string(),
                }
            })?,
            None => Strand::Plus,
        };

        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let (new_start, new_end) = if new_start > new_end {
            (new_end, new_start)
        } else {
            (new_start, new_end)
        };

        Ok(Self {
            chrom: fields[0].to_string(),
            start,
            end,
            new_chrom: fields[3].to_string(),
            new_start,
            new_end,
            strand,
        })
    }

    /// Source block length (end - start)
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_coord(value: &str, field: &'static str, line_number: usize) -> MappingResult<i64> {
    let parsed = value
        .parse::<u64>()
        .ok()
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(|| MappingFileError::InvalidNumber {
            line: line_number,
            field,
            value: value.to_string(),
        })?;

    if parsed > MAX_COORDINATE {
        return Err(MappingFileError::CoordinateOutOfRange {
            line: line_number,
            field,
            value: parsed,
            max: MAX_COORDINATE,
        });
    }
    Ok(parsed)
}

/// Result of reading a mapping file
#[derive(Debug, Default)]
pub struct MappingFile {
    /// Well-formed rows in file order
    pub records: Vec<MappingRecord>,
    /// Rows that were reported and excluded
    pub rejected: Vec<MappingFileError>,
}

impl MappingFile {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parse mapping rows from a reader
///
/// Malformed rows are logged and collected in `rejected`; they never
/// contribute a record. Only I/O failures abort the read.
pub fn parse_mapping_reader<R: BufRead>(reader: R) -> MappingResult<MappingFile> {
    let mut result = MappingFile::new();
    let mut lines = ByteLineIterator::new(reader);
    let mut line_number: usize = 0;

    while let Some(line_result) = lines.next_line() {
        line_number += 1;
        let parsed = match decode_line(line_result?) {
            Some(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                MappingRecord::parse(trimmed, line_number)
            }
            None => Err(MappingFileError::InvalidEncoding { line: line_number }),
        };

        match parsed {
            Ok(record) => result.records.push(record),
            Err(e) => {
                warn!("Skipping mapping row: {}", e);
                result.rejected.push(e);
            }
        }
    }

    debug!(
        "Read {} mapping rows ({} rejected)",
        result.records.len(),
        result.rejected.len()
    );
    Ok(result)
}

/// Parse a mapping file from a path
///
/// A missing file is a `FileNotFound` error: the interval table cannot be
/// built without it.
pub fn parse_mapping_file(path: &Path) -> MappingResult<MappingFile> {
    if !path.is_file() {
        return Err(MappingFileError::FileNotFound(path.to_path_buf()));
    }
    let reader = open_reader(path)?;
    parse_mapping_reader(reader)
}

/// Parse mapping rows from bytes (for testing)
pub fn parse_mapping_bytes(data: &[u8]) -> MappingResult<MappingFile> {
    parse_mapping_reader(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plus_row() {
        let record = MappingRecord::parse("2R\t1\t20000\t2R\t4112496\t4132495\t+", 1).unwrap();
        assert_eq!(record.chrom, "2R");
        assert_eq!(record.start, 1);
        assert_eq!(record.end, 20000);
        assert_eq!(record.new_chrom, "2R");
        assert_eq!(record.new_start, 4112496);
        assert_eq!(record.new_end, 4132495);
        assert_eq!(record.strand, Strand::Plus);
        assert_eq!(record.len(), 19999);
    }

    #[test]
    fn test_parse_normalizes_each_pair_independently() {
        let record = MappingRecord::parse("3RHet 1940000 1930000 3R 3582260 3592260 -", 7).unwrap();
        assert_eq!(record.start, 1930000);
        assert_eq!(record.end, 1940000);
        assert_eq!(record.new_start, 3582260);
        assert_eq!(record.new_end, 3592260);
        assert_eq!(record.strand, Strand::Minus);

        let record = MappingRecord::parse("3RHet 1930000 1940000 3R 3592260 3582260 -", 7).unwrap();
        assert_eq!(record.start, 1930000);
        assert_eq!(record.new_start, 3582260);
        assert_eq!(record.new_end, 3592260);
    }

    #[test]
    fn test_parse_missing_strand_defaults_plus() {
        let record = MappingRecord::parse("X 1 30000 X 103614 133613", 1).unwrap();
        assert_eq!(record.strand, Strand::Plus);
    }

    #[test]
    fn test_parse_too_few_fields() {
        let err = MappingRecord::parse("X 1 30000 X 103614", 4).unwrap_err();
        assert!(matches!(
            err,
            MappingFileError::TooFewFields { line: 4, expected: 6, found: 5 }
        ));
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_parse_non_numeric() {
        let err = MappingRecord::parse("X 1 abc X 103614 133613 +", 2).unwrap_err();
        assert!(matches!(err, MappingFileError::InvalidNumber { field: "end", .. }));

        let err = MappingRecord::parse("X -5 100 X 103614 133613 +", 2).unwrap_err();
        assert!(matches!(err, MappingFileError::InvalidNumber { field: "start", .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_strand() {
        let err = MappingRecord::parse("X 1 100 X 1 100 .", 3).unwrap_err();
        assert!(matches!(err, MappingFileError::InvalidStrand { line: 3, .. }));
    }

    #[test]
    fn test_reader_skips_bad_rows() {
        let data = b"\
# release 5 to release 6
2R\t1\t20000\t2R\t4112496\t4132495\t+

4\t40001\tsixty\t4\t19375\t39374\t+
4\t100001\t130000\t4\t79375\t109374\t+
";
        let file = parse_mapping_bytes(data).unwrap();
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.rejected.len(), 1);
        assert_eq!(file.rejected[0].line(), Some(4));
    }

    #[test]
    fn test_parse_rejects_coordinates_past_limit() {
        let err = MappingRecord::parse("X 9223372036854775000 9223372036854775800 X 1 900 -", 9)
            .unwrap_err();
        assert!(matches!(
            err,
            MappingFileError::CoordinateOutOfRange { line: 9, field: "start", .. }
        ));

        let limit = format!("X 1 {} X 1 900 +", MAX_COORDINATE);
        assert!(MappingRecord::parse(&limit, 1).is_ok());
        let past = format!("X 1 {} X 1 900 +", MAX_COORDINATE + 1);
        assert!(MappingRecord::parse(&past, 1).is_err());
    }

    #[test]
    fn test_reader_rejects_huge_rows_without_failing() {
        let data = b"\
X\t9223372036854775000\t9223372036854775800\tX\t1\t900\t-
X\t1\t30000\tX\t103614\t133613\t+
";
        let file = parse_mapping_bytes(data).unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.rejected.len(), 1);
        assert_eq!(file.rejected[0].line(), Some(1));
    }

    #[test]
    fn test_reader_rejects_invalid_utf8_row() {
        let data = b"2R\t1\t20000\t2R\t4112496\t4132495\t+\n\xff\xfe\t1\t2\n4\t40001\t60000\t4\t19375\t39374\t+\n";
        let file = parse_mapping_bytes(data).unwrap();
        assert_eq!(file.records.len(), 2);
        assert!(matches!(
            file.rejected.as_slice(),
            [MappingFileError::InvalidEncoding { line: 2 }]
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = parse_mapping_file(Path::new("/nonexistent/r5_to_r6.tsv")).unwrap_err();
        assert!(matches!(err, MappingFileError::FileNotFound(_)));
    }

    #[test]
    fn test_strand_display() {
        assert_eq!(format!("{}", Strand::Plus), "+");
        assert_eq!(format!("{}", Strand::Minus), "-");
        assert!(Strand::Minus.is_inverted());
        assert!(!Strand::Plus.is_inverted());
    }
}
