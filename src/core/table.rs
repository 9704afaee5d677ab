//! Interval table built from an assembly mapping file
//!
//! Each source chromosome owns a vector of intervals sorted by start. The
//! resolvers walk these vectors in order and stop early, so the ordering is
//! established once here and never changes afterwards.

use crate::core::error::MappingResult;
use crate::core::mapping::{parse_mapping_file, MappingFile, MappingRecord, Strand};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

/// An aligned block on a source chromosome with its translation offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Source start (inclusive)
    pub start: i64,
    /// Source end (inclusive), start + block length
    pub end: i64,
    /// Signed offset; `dest = pos - diff`, negated when the result is negative
    pub diff: i64,
    /// Destination chromosome name
    pub new_chrom: String,
    /// Block is reversed in the destination assembly
    pub inverted: bool,
}

impl Interval {
    /// Derive an interval from a normalized mapping row
    ///
    /// Plus strand: `diff = start - new_start`.
    /// Minus strand: `diff = start + new_end`, so `pos - diff` is negative
    /// and its magnitude counts down from `new_end`.
    ///
    /// Returns `None` when the offset, or the translation of either block
    /// end, does not fit in `i64`.
    pub fn from_record(record: &MappingRecord) -> Option<Self> {
        let diff = match record.strand {
            Strand::Plus => record.start.checked_sub(record.new_start)?,
            Strand::Minus => record.start.checked_add(record.new_end)?,
        };
        let end = record.start.checked_add(record.end.checked_sub(record.start)?)?;

        // translation is monotonic, so checking both ends covers the block
        for pos in [record.start, end] {
            pos.checked_sub(diff)?.checked_abs()?;
        }

        Some(Self {
            start: record.start,
            end,
            diff,
            new_chrom: record.new_chrom.clone(),
            inverted: record.strand.is_inverted(),
        })
    }

    /// Whether `pos` lies within [start, end]
    #[inline]
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether [start, end] lies entirely within this interval
    #[inline]
    pub fn encloses(&self, start: i64, end: i64) -> bool {
        self.start <= start && end <= self.end
    }

    /// Translate a source position; returns the position and an inversion flag
    ///
    /// `pos` must lie within the interval.
    #[inline]
    pub fn translate(&self, pos: i64) -> (i64, bool) {
        let raw = pos - self.diff;
        if raw < 0 {
            (-raw, true)
        } else {
            (raw, false)
        }
    }
}

/// Read-only table of intervals keyed by source chromosome
#[derive(Debug, Default)]
pub struct IntervalTable {
    /// Source chromosome -> intervals in ascending start order
    maps: HashMap<String, Vec<Interval>>,
    /// Normalized chromosome name mapping (lowercase, no "chr" -> original)
    chrom_aliases: HashMap<String, String>,
}

impl IntervalTable {
    /// Build the table from a mapping file on disk
    ///
    /// Fails when the file cannot be opened; malformed rows are excluded.
    pub fn from_mapping_file<P: AsRef<Path>>(path: P) -> MappingResult<Self> {
        let mapping = parse_mapping_file(path.as_ref())?;
        Ok(Self::from_mapping(&mapping))
    }

    /// Build the table from parsed mapping rows
    pub fn from_mapping(mapping: &MappingFile) -> Self {
        let table = Self::build(&mapping.records);
        info!(
            "Built interval table: {} chromosomes, {} intervals, {} rows rejected",
            table.maps.len(),
            table.total_intervals(),
            mapping.rejected.len()
        );
        table
    }

    /// Build the table from normalized rows
    ///
    /// Rows are sorted by (chromosome, start) with a stable sort so rows
    /// sharing a start keep their file order.
    pub fn build(records: &[MappingRecord]) -> Self {
        let mut sorted: Vec<&MappingRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.chrom.cmp(&b.chrom).then(a.start.cmp(&b.start)));

        let mut maps: HashMap<String, Vec<Interval>> = HashMap::new();
        for record in sorted {
            match Interval::from_record(record) {
                Some(interval) => maps.entry(record.chrom.clone()).or_default().push(interval),
                None => warn!(
                    "Skipping block {}:{}-{}: offset out of range",
                    record.chrom, record.start, record.end
                ),
            }
        }

        let chrom_aliases = maps
            .keys()
            .map(|chrom| (normalize_chrom_key(chrom), chrom.clone()))
            .collect();

        Self { maps, chrom_aliases }
    }

    /// Intervals for a chromosome in ascending start order
    ///
    /// Accepts the name as stored or with a "chr" prefix added or removed.
    pub fn intervals(&self, chrom: &str) -> Option<&[Interval]> {
        if let Some(v) = self.maps.get(chrom) {
            return Some(v.as_slice());
        }
        let original = self.chrom_aliases.get(&normalize_chrom_key(chrom))?;
        self.maps.get(original).map(|v| v.as_slice())
    }

    /// Check if a chromosome exists in the table
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.intervals(chrom).is_some()
    }

    /// Get all source chromosome names
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(|s| s.as_str())
    }

    /// Get the number of intervals for a chromosome
    pub fn interval_count(&self, chrom: &str) -> usize {
        self.intervals(chrom).map(|v| v.len()).unwrap_or(0)
    }

    /// Get total number of intervals across all chromosomes
    pub fn total_intervals(&self) -> usize {
        self.maps.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// Strip a leading "chr" (any case) from a chromosome name
///
/// # Examples
/// ```
/// use flybase_remap::core::strip_chr_prefix;
/// assert_eq!(strip_chr_prefix("ChrX"), "X");
/// assert_eq!(strip_chr_prefix("chr4"), "4");
/// assert_eq!(strip_chr_prefix("3RHet"), "3RHet");
/// ```
pub fn strip_chr_prefix(chrom: &str) -> &str {
    if chrom.len() > 3 && chrom.is_char_boundary(3) && chrom[..3].eq_ignore_ascii_case("chr") {
        &chrom[3..]
    } else {
        chrom
    }
}

pub(crate) fn normalize_chrom_key(chrom: &str) -> String {
    strip_chr_prefix(chrom).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::parse_mapping_bytes;

    fn create_test_table() -> IntervalTable {
        let data = b"\
4\t100001\t130000\t4\t79375\t109374\t+
4\t40001\t60000\t4\t19375\t39374\t+
3RHet\t1930000\t1940000\t3R\t3582260\t3592260\t-
X\t1\t30000\tX\t103614\t133613\t+
";
        IntervalTable::from_mapping(&parse_mapping_bytes(data).unwrap())
    }

    #[test]
    fn test_table_creation() {
        let table = create_test_table();
        assert!(table.has_chrom("4"));
        assert!(table.has_chrom("3RHet"));
        assert!(!table.has_chrom("2L"));
        assert_eq!(table.total_intervals(), 4);
        assert_eq!(table.interval_count("4"), 2);
        assert_eq!(table.interval_count("2L"), 0);
    }

    #[test]
    fn test_intervals_sorted_by_start() {
        let table = create_test_table();
        let intervals = table.intervals("4").unwrap();
        assert_eq!(intervals[0].start, 40001);
        assert_eq!(intervals[1].start, 100001);
    }

    #[test]
    fn test_stable_order_on_equal_starts() {
        let data = b"\
2L\t100\t200\t2L\t1100\t1200\t+
2L\t100\t150\t2R\t5100\t5150\t+
";
        let table = IntervalTable::from_mapping(&parse_mapping_bytes(data).unwrap());
        let intervals = table.intervals("2L").unwrap();
        assert_eq!(intervals[0].new_chrom, "2L");
        assert_eq!(intervals[1].new_chrom, "2R");
    }

    #[test]
    fn test_plus_strand_offset() {
        let table = create_test_table();
        let iv = &table.intervals("X").unwrap()[0];
        assert_eq!(iv.diff, 1 - 103614);
        assert_eq!(iv.end, 30000);
        assert!(!iv.inverted);
        assert_eq!(iv.translate(330), (103943, false));
    }

    #[test]
    fn test_minus_strand_offset_uses_new_end() {
        let table = create_test_table();
        let iv = &table.intervals("3RHet").unwrap()[0];
        assert_eq!(iv.diff, 1930000 + 3592260);
        assert!(iv.inverted);
        assert_eq!(iv.translate(1930000), (3592260, true));
        assert_eq!(iv.translate(1940000), (3582260, true));
    }

    #[test]
    fn test_build_skips_blocks_with_overflowing_offset() {
        let records = vec![
            MappingRecord {
                chrom: "X".to_string(),
                start: i64::MAX - 800,
                end: i64::MAX,
                new_chrom: "X".to_string(),
                new_start: 1,
                new_end: 900,
                strand: Strand::Minus,
            },
            MappingRecord {
                chrom: "X".to_string(),
                start: 1,
                end: 30000,
                new_chrom: "X".to_string(),
                new_start: 103614,
                new_end: 133613,
                strand: Strand::Plus,
            },
        ];

        let table = IntervalTable::build(&records);
        assert_eq!(table.interval_count("X"), 1);
        assert_eq!(table.intervals("X").unwrap()[0].start, 1);
        assert!(Interval::from_record(&records[0]).is_none());
    }

    #[test]
    fn test_huge_row_never_reaches_table() {
        let data = b"X 9223372036854775000 9223372036854775800 X 1 900 -\n";
        let mapping = parse_mapping_bytes(data).unwrap();
        let table = IntervalTable::from_mapping(&mapping);

        assert_eq!(mapping.rejected.len(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_chrom_aliases() {
        let table = create_test_table();
        assert!(table.has_chrom("chrX"));
        assert!(table.has_chrom("x"));
        assert!(table.has_chrom("CHR4"));
        assert!(table.has_chrom("3rhet"));
    }

    #[test]
    fn test_contains_and_encloses() {
        let iv = Interval {
            start: 100,
            end: 200,
            diff: 0,
            new_chrom: "2L".to_string(),
            inverted: false,
        };
        assert!(iv.contains(100));
        assert!(iv.contains(200));
        assert!(!iv.contains(201));
        assert!(iv.encloses(120, 180));
        assert!(!iv.encloses(90, 180));
    }

    #[test]
    fn test_strip_chr_prefix() {
        assert_eq!(strip_chr_prefix("chr2L"), "2L");
        assert_eq!(strip_chr_prefix("CHR2L"), "2L");
        assert_eq!(strip_chr_prefix("chr"), "chr");
        assert_eq!(strip_chr_prefix("2L"), "2L");
    }
}
