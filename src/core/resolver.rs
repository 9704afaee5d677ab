//! Position and range resolution against an interval table
//!
//! Both resolvers walk a chromosome's intervals in ascending start order and
//! stop as soon as an interval starts past the query. They are pure functions
//! of the table and the query; nothing is cached between calls.

use crate::core::table::{Interval, IntervalTable};

/// A single source position to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionQuery<'a> {
    pub chrom: &'a str,
    pub pos: i64,
}

/// A source range to resolve, with start <= end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery<'a> {
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
}

/// A position translated into the destination assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub chrom: String,
    pub pos: i64,
    pub inverted: bool,
}

/// Outcome of scanning the intervals overlapping a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeResolution {
    /// Destination chromosome of the enclosing interval, if any
    pub chrom: Option<String>,
    /// Partially overlapping intervals minus one; -1 when none overlap partially
    pub span_count: i64,
    /// Translated start from the enclosing interval
    pub start: Option<i64>,
    /// Translated end from the enclosing interval
    pub end: Option<i64>,
    /// Any enclosing or overlapping interval is inverted
    pub inverted: bool,
}

impl RangeResolution {
    /// Number of regions of change the range crosses, as shown to users
    pub fn regions_spanned(&self) -> usize {
        usize::try_from(self.span_count).unwrap_or(0)
    }
}

/// Resolve a single position
///
/// Returns `None` when the position falls in a gap between mapped blocks,
/// before the first block, after the last one, or on an unknown chromosome.
pub fn resolve_position(table: &IntervalTable, query: &PositionQuery) -> Option<ResolvedPosition> {
    let intervals = table.intervals(query.chrom)?;
    let interval = first_candidate(intervals, query.pos)?;

    let (pos, inverted) = interval.translate(query.pos);
    Some(ResolvedPosition {
        chrom: interval.new_chrom.clone(),
        pos,
        inverted,
    })
}

/// First interval not ending before `pos`, if it also starts at or before it
fn first_candidate(intervals: &[Interval], pos: i64) -> Option<&Interval> {
    intervals
        .iter()
        .find(|iv| iv.end >= pos)
        .filter(|iv| iv.start <= pos)
}

/// Resolve a range and classify how it relates to the mapped blocks
///
/// An interval enclosing the whole range supplies the destination
/// chromosome and coordinates. Every other overlapping interval is a
/// spanned block and increments the counter, whose baseline is -1.
pub fn resolve_range(table: &IntervalTable, query: &RangeQuery) -> RangeResolution {
    let mut resolution = RangeResolution {
        chrom: None,
        span_count: -1,
        start: None,
        end: None,
        inverted: false,
    };

    let Some(intervals) = table.intervals(query.chrom) else {
        return resolution;
    };

    for interval in intervals {
        if interval.start > query.end {
            break;
        }
        if interval.end < query.start {
            continue;
        }

        if interval.encloses(query.start, query.end) {
            let (start, start_inverted) = interval.translate(query.start);
            let (end, end_inverted) = interval.translate(query.end);
            let (start, end) = if start > end { (end, start) } else { (start, end) };

            resolution.chrom = Some(interval.new_chrom.clone());
            resolution.start = Some(start);
            resolution.end = Some(end);
            resolution.inverted |= start_inverted || end_inverted || interval.inverted;
        } else {
            resolution.span_count += 1;
            resolution.inverted |= interval.inverted;
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::parse_mapping_bytes;

    fn create_test_table() -> IntervalTable {
        let data = b"\
4\t40001\t60000\t4\t19375\t39374\t+
4\t100001\t130000\t4\t79375\t109374\t+
4\t150001\t160000\t4\t129375\t139374\t+
3RHet\t1930000\t1940000\t3R\t3582260\t3592260\t-
3RHet\t1960000\t1970000\t3R\t3518162\t3528162\t-
";
        IntervalTable::from_mapping(&parse_mapping_bytes(data).unwrap())
    }

    fn position(table: &IntervalTable, chrom: &str, pos: i64) -> Option<ResolvedPosition> {
        resolve_position(table, &PositionQuery { chrom, pos })
    }

    fn range(table: &IntervalTable, chrom: &str, start: i64, end: i64) -> RangeResolution {
        resolve_range(table, &RangeQuery { chrom, start, end })
    }

    #[test]
    fn test_position_inside_plus_block() {
        let table = create_test_table();
        let resolved = position(&table, "4", 43943).unwrap();
        assert_eq!(resolved.chrom, "4");
        assert_eq!(resolved.pos, 23317);
        assert!(!resolved.inverted);
    }

    #[test]
    fn test_position_on_block_bounds() {
        let table = create_test_table();
        assert_eq!(position(&table, "4", 40001).unwrap().pos, 19375);
        assert_eq!(position(&table, "4", 60000).unwrap().pos, 39374);
    }

    #[test]
    fn test_position_in_gap() {
        let table = create_test_table();
        assert!(position(&table, "4", 70000).is_none());
        assert!(position(&table, "4", 1).is_none());
        assert!(position(&table, "4", 999_999).is_none());
    }

    #[test]
    fn test_position_unknown_chrom() {
        let table = create_test_table();
        assert!(position(&table, "2L", 100).is_none());
    }

    #[test]
    fn test_position_inverted_block() {
        let table = create_test_table();
        let resolved = position(&table, "3RHet", 1936890).unwrap();
        assert_eq!(resolved.chrom, "3R");
        assert_eq!(resolved.pos, 3585370);
        assert!(resolved.inverted);
    }

    #[test]
    fn test_range_enclosed() {
        let table = create_test_table();
        let resolution = range(&table, "4", 43943, 50320);
        assert_eq!(resolution.chrom.as_deref(), Some("4"));
        assert_eq!(resolution.span_count, -1);
        assert_eq!(resolution.regions_spanned(), 0);
        assert_eq!(resolution.start, Some(23317));
        assert_eq!(resolution.end, Some(29694));
        assert!(!resolution.inverted);
    }

    #[test]
    fn test_range_enclosed_inverted_is_swapped() {
        let table = create_test_table();
        let resolution = range(&table, "3RHet", 1931000, 1932000);
        assert_eq!(resolution.start, Some(3590260));
        assert_eq!(resolution.end, Some(3591260));
        assert!(resolution.inverted);
    }

    #[test]
    fn test_range_spanning_two_blocks() {
        let table = create_test_table();
        let resolution = range(&table, "4", 50000, 110000);
        assert_eq!(resolution.chrom, None);
        assert_eq!(resolution.span_count, 1);
        assert_eq!(resolution.start, None);
        assert_eq!(resolution.end, None);
    }

    #[test]
    fn test_range_spanning_three_blocks() {
        let table = create_test_table();
        let resolution = range(&table, "4", 50000, 155000);
        assert_eq!(resolution.span_count, 2);
        assert_eq!(resolution.regions_spanned(), 2);
    }

    #[test]
    fn test_range_fully_in_gap() {
        let table = create_test_table();
        let resolution = range(&table, "4", 70000, 80000);
        assert_eq!(resolution.span_count, -1);
        assert_eq!(resolution.start, None);
        assert_eq!(resolution.regions_spanned(), 0);
    }

    #[test]
    fn test_range_partial_inverted_sets_flag() {
        let table = create_test_table();
        let resolution = range(&table, "3RHet", 1936890, 1964215);
        assert_eq!(resolution.span_count, 1);
        assert!(resolution.inverted);
    }

    #[test]
    fn test_range_single_partial_overlap() {
        let table = create_test_table();
        let resolution = range(&table, "4", 55000, 70000);
        assert_eq!(resolution.span_count, 0);
        assert_eq!(resolution.regions_spanned(), 0);
        assert_eq!(resolution.start, None);
    }
}
