//! Gene and transcript symbol to FlyBase ID lookup
//!
//! Built from the FlyBase synonyms table. Only `FBgn`/`FBtr` rows for
//! *D. melanogaster* (`Dmel`) are indexed.
//!
//! ```text
//! primary_FBid  organism  current_symbol  current_fullname  fullname_synonym(s)  symbol_synonym(s)
//! ```

use crate::core::{decode_line, open_reader, ByteLineIterator, LookupError, LookupResult};
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, Write};
use std::path::Path;

const SPECIES: &str = "Dmel";

/// Symbol, name or synonym -> FlyBase IDs carrying it
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, BTreeSet<String>>,
}

/// Lookup statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupStats {
    pub total: usize,
    pub found: usize,
    pub missing: usize,
}

impl SymbolTable {
    /// Load the table from a path (plain or compressed)
    pub fn from_file<P: AsRef<Path>>(path: P) -> LookupResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LookupError::FileNotFound(path.to_path_buf()));
        }
        Self::from_reader(open_reader(path)?)
    }

    /// Load the table from a reader
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
            if !(line.starts_with("FBgn") || line.starts_with("FBtr")) {
                continue;
            }

            let mut cols = line.split('\t');
            let fbid = cols.next().unwrap_or_default();
            let cols: Vec<&str> = cols.collect();
            if cols.len() < 2 {
                warn!(
                    "Formatting problem found: {}",
                    LookupError::TooFewColumns {
                        line: line_number,
                        expected: 3,
                        found: cols.len() + 1,
                    }
                );
                continue;
            }
            if cols[0] != SPECIES {
                continue;
            }

            table.insert(cols[1], fbid);
            if let Some(fullname) = cols.get(2) {
                table.insert(fullname, fbid);
            }
            for synonyms in cols.iter().skip(3).take(2) {
                for synonym in split_synonyms(synonyms) {
                    table.insert(synonym, fbid);
                }
            }
        }

        debug!("Indexed {} symbols", table.symbols.len());
        Ok(table)
    }

    fn insert(&mut self, symbol: &str, fbid: &str) {
        if symbol.is_empty() {
            return;
        }
        self.symbols
            .entry(symbol.to_string())
            .or_default()
            .insert(fbid.to_string());
    }

    /// IDs for a symbol, in sorted order
    pub fn lookup(&self, symbol: &str) -> Option<Vec<&str>> {
        self.symbols
            .get(symbol)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Split a synonym list on commas that are not followed by whitespace
///
/// `"my gene1,my gene2"` is two names; `"my gene1, my gene2"` is one.
pub fn split_synonyms(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != ',' {
            continue;
        }
        let followed_by_space = chars.peek().map_or(false, |(_, next)| next.is_whitespace());
        if !followed_by_space {
            parts.push(&text[start..i]);
            start = i + 1;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Write one line per submitted symbol: `symbol \t id1,id2` or `symbol`
pub fn lookup_symbols<R: BufRead, W: Write>(
    reader: R,
    output: &mut W,
    table: &SymbolTable,
) -> LookupResult<LookupStats> {
    let mut stats = LookupStats::default();

    let mut lines = ByteLineIterator::new(reader);
    while let Some(raw) = lines.next_line() {
        let Some(line) = decode_line(raw?) else {
            warn!("Skipping submitted line: not valid UTF-8");
            continue;
        };
        let symbol = line.trim();
        if symbol.is_empty() {
            continue;
        }

        stats.total += 1;
        match table.lookup(symbol) {
            Some(ids) => {
                stats.found += 1;
                writeln!(output, "{}\t{}", symbol, ids.join(","))?;
            }
            None => {
                stats.missing += 1;
                writeln!(output, "{}", symbol)?;
            }
        }
    }

    output.flush()?;
    Ok(stats)
}
