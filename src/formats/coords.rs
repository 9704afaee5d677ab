//! Batch coordinate conversion
//!
//! One coordinate per input line, one `input \t converted \t note` record per
//! valid line, in input order. Failed conversions can be routed to a
//! separate writer; unparseable lines are counted and dropped.

use crate::core::{
    convert, decode_line, ByteLineIterator, ConversionResult, IntervalTable, ParsedCoordinate,
    Result,
};
use log::{debug, warn};
use rayon::prelude::*;
use std::io::{self, BufRead, Write};

/// Lines handed to each rayon task
const CHUNK_SIZE: usize = 10_000;

/// Conversion statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub total: usize,
    pub resolved: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// A converted line, ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRecord {
    /// Input text as submitted (trimmed)
    pub input: String,
    pub result: ConversionResult,
}

impl RemapRecord {
    /// Tab-separated output line without a trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\t{}", self.input, self.result)
    }
}

/// What a single input line turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Resolved(RemapRecord),
    Failed(RemapRecord),
    /// Unparseable coordinate text, or a line that is not UTF-8
    Skipped(String),
    /// Blank line or comment
    Ignored,
}

/// Convert one input line
pub fn convert_line(table: &IntervalTable, line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return LineOutcome::Ignored;
    }

    let coord = match ParsedCoordinate::parse(trimmed) {
        Ok(coord) => coord,
        Err(e) => {
            warn!("Skipping line: {}", e);
            return LineOutcome::Skipped(trimmed.to_string());
        }
    };

    let result = convert(table, &coord);
    let record = RemapRecord {
        input: trimmed.to_string(),
        result,
    };
    if record.result.is_resolved() {
        LineOutcome::Resolved(record)
    } else {
        debug!("Unresolved: {}", record.to_line());
        LineOutcome::Failed(record)
    }
}

/// Convert one raw input line
///
/// Bytes that are not valid UTF-8 are reported and skipped like any other
/// unparseable text.
pub fn convert_line_bytes(table: &IntervalTable, line: &[u8]) -> LineOutcome {
    match decode_line(line) {
        Some(text) => convert_line(table, text),
        None => {
            let lossy = String::from_utf8_lossy(line).trim().to_string();
            warn!("Skipping line: not valid UTF-8: {}", lossy);
            LineOutcome::Skipped(lossy)
        }
    }
}

/// Convert every coordinate line from `reader`
///
/// Resolved records go to `output`. Failed records go to `unmapped` when it
/// is given and to `output` otherwise. With `threads > 1` lines are read up
/// front and converted in parallel chunks; output order is unchanged.
pub fn convert_coordinates<R: BufRead>(
    reader: R,
    output: &mut dyn Write,
    unmapped: Option<&mut dyn Write>,
    table: &IntervalTable,
    threads: usize,
) -> Result<ConversionStats> {
    let stats = if threads > 1 {
        convert_parallel(reader, output, unmapped, table, threads)?
    } else {
        convert_sequential(reader, output, unmapped, table)?
    };
    output.flush()?;
    Ok(stats)
}

fn write_outcome(
    outcome: LineOutcome,
    output: &mut dyn Write,
    unmapped: &mut Option<&mut dyn Write>,
    stats: &mut ConversionStats,
) -> io::Result<()> {
    match outcome {
        LineOutcome::Resolved(record) => {
            stats.total += 1;
            stats.resolved += 1;
            writeln!(output, "{}", record.to_line())?;
        }
        LineOutcome::Failed(record) => {
            stats.total += 1;
            stats.failed += 1;
            match unmapped {
                Some(w) => writeln!(w, "{}", record.to_line())?,
                None => writeln!(output, "{}", record.to_line())?,
            }
        }
        LineOutcome::Skipped(_) => {
            stats.total += 1;
            stats.skipped += 1;
        }
        LineOutcome::Ignored => {}
    }
    Ok(())
}

fn convert_sequential<R: BufRead>(
    reader: R,
    output: &mut dyn Write,
    mut unmapped: Option<&mut dyn Write>,
    table: &IntervalTable,
) -> Result<ConversionStats> {
    let mut stats = ConversionStats::default();
    let mut lines = ByteLineIterator::new(reader);

    while let Some(line) = lines.next_line() {
        let outcome = convert_line_bytes(table, line?);
        write_outcome(outcome, output, &mut unmapped, &mut stats)?;
    }

    if let Some(w) = unmapped {
        w.flush()?;
    }
    Ok(stats)
}

fn convert_parallel<R: BufRead>(
    reader: R,
    output: &mut dyn Write,
    mut unmapped: Option<&mut dyn Write>,
    table: &IntervalTable,
    threads: usize,
) -> Result<ConversionStats> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to create thread pool: {}", e)))?;

    let lines: Vec<Vec<u8>> = reader.split(b'\n').collect::<io::Result<_>>()?;

    let results: Vec<Vec<LineOutcome>> = pool.install(|| {
        lines
            .par_chunks(CHUNK_SIZE)
            .map(|chunk| chunk.iter().map(|line| convert_line_bytes(table, line)).collect())
            .collect()
    });
    debug!("Converted {} lines on {} threads", lines.len(), threads);

    let mut stats = ConversionStats::default();
    for outcome in results.into_iter().flatten() {
        write_outcome(outcome, output, &mut unmapped, &mut stats)?;
    }

    if let Some(w) = unmapped {
        w.flush()?;
    }
    Ok(stats)
}
