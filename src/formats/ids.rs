//! FlyBase gene ID updater
//!
//! Maps submitted FBgn IDs to their current IDs using the
//! FBgn <=> Annotation ID table (`fbgn_annotation_ID_*.tsv`).
//!
//! ```text
//! ##gene_symbol  organism_abbreviation  primary_FBgn#  secondary_FBgn#(s)  ...
//! ```

use crate::core::{decode_line, open_reader, ByteLineIterator, LookupError, LookupResult};
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::{BufRead, Write};
use std::path::Path;

/// Columns required before the secondary ID list
const MIN_COLUMNS: usize = 4;

/// Current gene IDs and the secondary -> primary lookup
#[derive(Debug, Default)]
pub struct IdTable {
    current: HashSet<String>,
    /// Secondary ID -> primary IDs it was merged into
    secondaries: HashMap<String, BTreeSet<String>>,
}

/// Update statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateStats {
    pub total: usize,
    pub current: usize,
    pub updated: usize,
    pub unknown: usize,
}

impl IdTable {
    /// Load the table from a path (plain or compressed)
    pub fn from_file<P: AsRef<Path>>(path: P) -> LookupResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LookupError::FileNotFound(path.to_path_buf()));
        }
        Self::from_reader(open_reader(path)?)
    }

    /// Load the table from a reader
    ///
    /// Comment lines and lines without an FBgn are ignored. Rows with too few
    /// columns are logged and skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> LookupResult<Self> {
        let mut table = Self::default();

        let mut lines = ByteLineIterator::new(reader);
        let mut line_number: usize = 0;

        while let Some(raw) = lines.next_line() {
            line_number += 1;
            let Some(line) = decode_line(raw?) else {
                warn!("Skipping line {}: not valid UTF-8", line_number);
                continue;
            };
            if line.starts_with('#') || !line.contains("FBgn") {
                continue;
            }

            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < MIN_COLUMNS {
                warn!(
                    "{}",
                    LookupError::TooFewColumns {
                        line: line_number,
                        expected: MIN_COLUMNS,
                        found: cols.len(),
                    }
                );
                continue;
            }

            let primary = cols[2];
            table.current.insert(primary.to_string());
            for secondary in cols[3].split(',').filter(|s| !s.is_empty()) {
                table
                    .secondaries
                    .entry(secondary.to_string())
                    .or_default()
                    .insert(primary.to_string());
            }
        }

        debug!(
            "Loaded {} current IDs and {} secondary IDs",
            table.current.len(),
            table.secondaries.len()
        );
        Ok(table)
    }

    /// Whether the ID is a current primary ID
    pub fn is_current(&self, id: &str) -> bool {
        self.current.contains(id)
    }

    /// Output line for a submitted ID
    ///
    /// Current IDs are echoed, retired IDs are followed by every current ID
    /// they map to, and unknown IDs are followed by `None`.
    pub fn update_line(&self, id: &str) -> String {
        if self.is_current(id) {
            return id.to_string();
        }
        match self.secondaries.get(id) {
            Some(primaries) => {
                let ids: Vec<&str> = primaries.iter().map(|s| s.as_str()).collect();
                format!("{}\t{}", id, ids.join("\t"))
            }
            None => format!("{}\tNone", id),
        }
    }
}

/// Write the updater header followed by one line per submitted ID
pub fn update_ids<R: BufRead, W: Write>(
    reader: R,
    output: &mut W,
    table: &IdTable,
    input_name: &str,
    reference_name: &str,
) -> LookupResult<UpdateStats> {
    writeln!(output, "# FlyBase ID Updater")?;
    writeln!(output, "# Input = {}", input_name)?;
    writeln!(output, "# ID Reference = {}", reference_name)?;
    writeln!(output, "# Submitted_ID\tUpdated_ID(s)")?;

    let mut stats = UpdateStats::default();
    let mut lines = ByteLineIterator::new(reader);
    while let Some(raw) = lines.next_line() {
        let Some(line) = decode_line(raw?) else {
            warn!("Skipping submitted line: not valid UTF-8");
            continue;
        };
        let id = line.trim();
        if id.is_empty() {
            continue;
        }

        stats.total += 1;
        if table.is_current(id) {
            stats.current += 1;
        } else if table.secondaries.contains_key(id) {
            stats.updated += 1;
        } else {
            stats.unknown += 1;
        }
        writeln!(output, "{}", table.update_line(id))?;
    }

    output.flush()?;
    Ok(stats)
}
