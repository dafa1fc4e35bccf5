use std::path::Path;

use log::{debug, info};

use crate::{
    flow_counts::FlowCounts,
    lookup_table::{LookupKey, LookupTable},
    parsers::{
        csv_parser::DelimitedParser,
        parser::{Line, ReadError},
    },
};

pub const FLOW_LOG_DELIMITER: u8 = b' ';

/// The only flow-log format version that is counted.
pub const SUPPORTED_VERSION: &str = "2";

/// Tag applied to records whose combination is missing from the lookup
/// table. Unlike lookup tags it is not lower-cased, so it never merges with a
/// lookup tag spelled `untagged`.
pub const UNTAGGED: &str = "Untagged";

const MIN_FIELDS: usize = 8;
const VERSION_FIELD: usize = 0;
const DST_PORT_FIELD: usize = 5;
const PROTOCOL_FIELD: usize = 7;

/// The parts of a flow-log line used for tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowLogRecord {
    pub dst_port: String,
    pub protocol: String,
}

/// Why a flow-log line was left out of the counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooFewFields(usize),
    UnsupportedVersion(String),
}

impl FlowLogRecord {
    /// Extracts a record from a split line.
    ///
    /// The line needs at least eight fields and must start with the version
    /// marker `2`. The field count is checked first.
    pub fn from_fields(fields: &[String]) -> Result<Self, SkipReason> {
        if fields.len() < MIN_FIELDS {
            return Err(SkipReason::TooFewFields(fields.len()));
        }

        let version = &fields[VERSION_FIELD];
        if version != SUPPORTED_VERSION {
            return Err(SkipReason::UnsupportedVersion(version.clone()));
        }

        Ok(FlowLogRecord {
            dst_port: fields[DST_PORT_FIELD].clone(),
            protocol: fields[PROTOCOL_FIELD].clone(),
        })
    }

    pub fn key(&self) -> LookupKey {
        LookupKey::new(&self.dst_port, &self.protocol)
    }
}

/// Record statistics for one scan. Blank lines are not records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub records_read: u64,
    pub records_counted: u64,
    pub too_few_fields: u64,
    pub unsupported_version: u64,
}

impl ScanSummary {
    pub fn lines_skipped(&self) -> u64 {
        self.too_few_fields + self.unsupported_version
    }
}

/// Scans the flow log at `path`, adding every counted record to `counts`.
pub fn scan_flow_logs<P: AsRef<Path>>(
    path: P,
    table: &LookupTable,
    counts: &mut FlowCounts,
) -> Result<ScanSummary, ReadError> {
    let lines = DelimitedParser::new(FLOW_LOG_DELIMITER).parse_file(path)?;
    scan_lines(lines, table, counts)
}

#[cfg(test)]
pub fn scan_flow_log_reader<R: std::io::Read + 'static>(
    reader: R,
    table: &LookupTable,
    counts: &mut FlowCounts,
) -> Result<ScanSummary, ReadError> {
    let lines = DelimitedParser::new(FLOW_LOG_DELIMITER).parse(reader);
    scan_lines(lines, table, counts)
}

fn scan_lines<I>(
    lines: I,
    table: &LookupTable,
    counts: &mut FlowCounts,
) -> Result<ScanSummary, ReadError>
where
    I: Iterator<Item = Result<Line, ReadError>>,
{
    let mut summary = ScanSummary::default();

    for line in lines {
        let line = line?;
        summary.records_read += 1;

        match FlowLogRecord::from_fields(&line.fields) {
            Ok(record) => {
                tally_record(&record, table, counts);
                summary.records_counted += 1;
            }
            Err(SkipReason::TooFewFields(found)) => {
                debug!(
                    "Skipping flow log line {}: {} fields, need at least {}",
                    line.number, found, MIN_FIELDS
                );
                summary.too_few_fields += 1;
            }
            Err(SkipReason::UnsupportedVersion(version)) => {
                debug!(
                    "Skipping flow log line {}: version {:?} is not {}",
                    line.number, version, SUPPORTED_VERSION
                );
                summary.unsupported_version += 1;
            }
        }
    }

    info!(
        "Scanned flow log: {} records read, {} counted, {} skipped ({} short, {} wrong version)",
        summary.records_read,
        summary.records_counted,
        summary.lines_skipped(),
        summary.too_few_fields,
        summary.unsupported_version
    );

    Ok(summary)
}

/// Counts one record: every resolved tag once, and its combination once.
pub fn tally_record(record: &FlowLogRecord, table: &LookupTable, counts: &mut FlowCounts) {
    let key = record.key();

    match table.tags(&key) {
        Some(tags) => {
            for tag in tags {
                counts.increment_tag(tag);
            }
        }
        None => counts.increment_tag(UNTAGGED),
    }

    counts.increment_combination(&key);
}
