use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use log::{debug, info};

use crate::parsers::{
    csv_parser::DelimitedParser,
    parser::{Line, ReadError},
};

pub const LOOKUP_DELIMITER: u8 = b',';

/// Number of columns in a lookup row: `dstport,protocol,tag`.
const LOOKUP_COLUMNS: usize = 3;

/// A normalized port/protocol combination, held in its joined form
/// `"<port>,<protocol>"` with the protocol lower-cased.
///
/// Two keys are equal exactly when their joined strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey(String);

impl LookupKey {
    /// Builds a key from a raw port and protocol. The port is kept verbatim.
    pub fn new(port: &str, protocol: &str) -> Self {
        LookupKey(format!("{},{}", port, protocol.to_lowercase()))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the key back into its port and protocol for display.
    ///
    /// Only the first two comma-separated parts are returned, so a port that
    /// itself contains a comma is not recovered intact.
    pub fn parts(&self) -> (&str, &str) {
        let mut parts = self.0.split(',');
        let port = parts.next().unwrap_or("");
        let protocol = parts.next().unwrap_or("");
        (port, protocol)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps each port/protocol combination to the set of lower-cased tags the
/// lookup table assigns to it. Every key carries at least one tag.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<LookupKey, HashSet<String>>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a lookup table from a comma-separated file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let lines = DelimitedParser::new(LOOKUP_DELIMITER).parse_file(path)?;
        Self::from_lines(lines)
    }

    #[cfg(test)]
    pub fn from_reader<R: std::io::Read + 'static>(reader: R) -> Result<Self, ReadError> {
        let lines = DelimitedParser::new(LOOKUP_DELIMITER).parse(reader);
        Self::from_lines(lines)
    }

    fn from_lines<I>(lines: I) -> Result<Self, ReadError>
    where
        I: Iterator<Item = Result<Line, ReadError>>,
    {
        let mut table = LookupTable::new();
        let mut rows_read = 0u64;
        let mut rows_skipped = 0u64;

        for line in lines {
            let line = line?;
            rows_read += 1;

            match line.fields.as_slice() {
                [port, protocol, tag] => table.insert(port, protocol, tag),
                fields => {
                    debug!(
                        "Skipping lookup row {}: expected {} columns, found {}",
                        line.number,
                        LOOKUP_COLUMNS,
                        fields.len()
                    );
                    rows_skipped += 1;
                }
            }
        }

        info!(
            "Loaded lookup table: {} rows read, {} skipped, {} combinations",
            rows_read,
            rows_skipped,
            table.len()
        );

        Ok(table)
    }

    /// Adds `tag` to the combination `(port, protocol)`. Protocol and tag are
    /// lower-cased; inserting the same tag twice has no effect.
    pub fn insert(&mut self, port: &str, protocol: &str, tag: &str) {
        self.entries
            .entry(LookupKey::new(port, protocol))
            .or_default()
            .insert(tag.to_lowercase());
    }

    pub fn tags(&self, key: &LookupKey) -> Option<&HashSet<String>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&LookupKey, &HashSet<String>)> {
        self.entries.iter()
    }

    /// Builds the inverse mapping, from each tag to every combination that
    /// carries it.
    pub fn reverse(&self) -> TagIndex {
        let mut index = TagIndex::default();

        for (key, tags) in &self.entries {
            for tag in tags {
                index
                    .entries
                    .entry(tag.clone())
                    .or_default()
                    .insert(key.clone());
            }
        }

        index
    }
}

/// Tag to port/protocol combinations, the inverse of a [`LookupTable`].
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: HashMap<String, HashSet<LookupKey>>,
}

impl TagIndex {
    #[cfg(test)]
    pub fn combinations(&self, tag: &str) -> Option<&HashSet<LookupKey>> {
        self.entries.get(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HashSet<LookupKey>)> {
        self.entries.iter()
    }
}
