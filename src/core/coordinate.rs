//! Coordinate query parsing
//!
//! Accepts `CHR:POS`, `CHR:START..END` and `CHR:START-END`. Commas are
//! thousands separators, a leading `chr` (any case) is dropped, and ranges
//! are normalized so start <= end.

use crate::core::error::{CoordinateError, CoordinateResult};
use crate::core::table::strip_chr_prefix;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref COORDINATE_REGEX: Regex =
        Regex::new(r"^\s*([^\s:]+):([0-9]+(?:,[0-9]+)*)(?:(?:\.\.|-)([0-9]+(?:,[0-9]+)*))?\s*$")
            .expect("coordinate regex is valid");
}

/// A validated coordinate query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCoordinate {
    /// Chromosome name with any "chr" prefix removed
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    /// Input named a single position rather than a range
    pub is_point: bool,
}

impl ParsedCoordinate {
    /// Parse a coordinate token
    ///
    /// # Examples
    /// ```
    /// use flybase_remap::core::ParsedCoordinate;
    ///
    /// let coord = ParsedCoordinate::parse("Chr3R:3,020,320").unwrap();
    /// assert_eq!(coord.chrom, "3R");
    /// assert_eq!((coord.start, coord.end), (3020320, 3020320));
    /// assert!(coord.is_point);
    ///
    /// let coord = ParsedCoordinate::parse("2L:5000..10").unwrap();
    /// assert_eq!((coord.start, coord.end), (10, 5000));
    /// ```
    pub fn parse(text: &str) -> CoordinateResult<Self> {
        let invalid = || CoordinateError::InvalidFormat(text.trim().to_string());

        let caps = COORDINATE_REGEX.captures(text).ok_or_else(invalid)?;
        let chrom = strip_chr_prefix(&caps[1]).to_string();
        let start = parse_grouped_number(&caps[2]).ok_or_else(invalid)?;

        let (end, is_point) = match caps.get(3) {
            Some(m) => (parse_grouped_number(m.as_str()).ok_or_else(invalid)?, false),
            None => (start, true),
        };

        let (start, end) = if start > end { (end, start) } else { (start, end) };

        Ok(Self {
            chrom,
            start,
            end,
            is_point,
        })
    }
}

impl FromStr for ParsedCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ParsedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point {
            write!(f, "{}:{}", self.chrom, self.start)
        } else {
            write!(f, "{}:{}..{}", self.chrom, self.start, self.end)
        }
    }
}

/// Parse digits with optional comma separators
fn parse_grouped_number(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits.parse::<i64>().ok()
}
