//! Query orchestration: parsed coordinate in, conversion result out
//!
//! Both endpoints are resolved on their own first. If they land on different
//! destination chromosomes the query stops there. Otherwise the range
//! resolver classifies the range and the note is assembled from the result.

use crate::core::coordinate::ParsedCoordinate;
use crate::core::resolver::{resolve_position, resolve_range, PositionQuery, RangeQuery};
use crate::core::table::{normalize_chrom_key, IntervalTable};
use std::fmt;

/// Destination chromosome placeholder when endpoints land on different scaffolds
pub const MULTIPLE_SCAFFOLDS: &str = "-";

/// Note for a query whose endpoints map to different destination chromosomes
pub const NOTE_MULTIPLE_SCAFFOLDS: &str = "maps to more than one scaffold";

/// Note for a query with an endpoint in an unmapped gap
pub const NOTE_UNRESOLVED: &str = "failed: coordinates fully within region of change";

/// Result of converting one coordinate query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Destination chromosome, `-` for multiple scaffolds
    pub chrom: String,
    /// Destination start, `None` when unresolved
    pub start: Option<i64>,
    /// Destination end, `None` when unresolved
    pub end: Option<i64>,
    /// Range resolver span counter (-1 baseline)
    pub span_count: i64,
    pub inverted: bool,
    /// Copied from the query; controls output formatting only
    pub is_point: bool,
    /// Semicolon-joined description of the outcome
    pub note: String,
}

impl ConversionResult {
    /// Both endpoints resolved onto a single destination chromosome
    pub fn is_resolved(&self) -> bool {
        self.chrom != MULTIPLE_SCAFFOLDS && self.start.is_some() && self.end.is_some()
    }

    /// Converted coordinate text, `CHR:START` or `CHR:START..END`
    ///
    /// Unresolved endpoints are written as `?`.
    pub fn coordinate_text(&self) -> String {
        let fmt_pos = |p: Option<i64>| p.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
        if self.is_point && self.is_resolved() {
            format!("{}:{}", self.chrom, fmt_pos(self.start))
        } else {
            format!("{}:{}..{}", self.chrom, fmt_pos(self.start), fmt_pos(self.end))
        }
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.coordinate_text(), self.note)
    }
}

/// Convert a parsed coordinate through the interval table
pub fn convert(table: &IntervalTable, coord: &ParsedCoordinate) -> ConversionResult {
    let first = resolve_position(
        table,
        &PositionQuery {
            chrom: &coord.chrom,
            pos: coord.start,
        },
    );
    let last = resolve_position(
        table,
        &PositionQuery {
            chrom: &coord.chrom,
            pos: coord.end,
        },
    );

    if let (Some(a), Some(b)) = (&first, &last) {
        if a.chrom != b.chrom {
            return ConversionResult {
                chrom: MULTIPLE_SCAFFOLDS.to_string(),
                start: None,
                end: None,
                span_count: -1,
                inverted: a.inverted || b.inverted,
                is_point: coord.is_point,
                note: NOTE_MULTIPLE_SCAFFOLDS.to_string(),
            };
        }
    }

    let range = resolve_range(
        table,
        &RangeQuery {
            chrom: &coord.chrom,
            start: coord.start,
            end: coord.end,
        },
    );

    let inverted = range.inverted
        || first.as_ref().map_or(false, |p| p.inverted)
        || last.as_ref().map_or(false, |p| p.inverted);

    let (chrom, start, end) = match (&range.start, &range.end, &first, &last) {
        (Some(s), Some(e), _, _) => (range.chrom.clone(), Some(*s), Some(*e)),
        (_, _, Some(a), Some(b)) => {
            let (s, e) = if a.pos > b.pos { (b.pos, a.pos) } else { (a.pos, b.pos) };
            (Some(a.chrom.clone()), Some(s), Some(e))
        }
        (_, _, a, b) => (
            a.as_ref().or(b.as_ref()).map(|p| p.chrom.clone()),
            None,
            None,
        ),
    };
    let chrom = chrom.unwrap_or_else(|| coord.chrom.clone());

    let note = build_note(
        start.is_some() && end.is_some(),
        range.regions_spanned(),
        !same_chrom(&chrom, &coord.chrom),
        inverted,
    );

    ConversionResult {
        chrom,
        start,
        end,
        span_count: range.span_count,
        inverted,
        is_point: coord.is_point,
        note,
    }
}

/// Chromosome names match once any `chr` prefix and case are ignored
fn same_chrom(a: &str, b: &str) -> bool {
    a == b || normalize_chrom_key(a) == normalize_chrom_key(b)
}

/// Assemble the note in fixed precedence
///
/// An unresolved endpoint is terminal. Otherwise a span clause, a scaffold
/// change and an inversion are each appended when they apply.
fn build_note(resolved: bool, regions_spanned: usize, different_scaffold: bool, inverted: bool) -> String {
    if !resolved {
        return NOTE_UNRESOLVED.to_string();
    }

    let mut clauses: Vec<String> = Vec::with_capacity(3);
    match regions_spanned {
        0 => {}
        1 => clauses.push("spans 1 region of change".to_string()),
        n => clauses.push(format!("spans {} regions of change", n)),
    }
    if different_scaffold {
        clauses.push("different scaffold".to_string());
    }
    if inverted {
        clauses.push("inversion".to_string());
    }
    clauses.join("; ")
}
