use super::parser::{Line, ReadError};
use csv::{ByteRecord, ReaderBuilder, Terminator};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Splits line-oriented text on a single-byte delimiter.
///
/// The reader runs with quoting disabled and no header row, so every line is
/// data and every delimiter byte separates two fields. Lines end at `\n`; a
/// `\r` before it is dropped.
pub struct DelimitedParser {
    delimiter: u8,
}

fn to_line(number: u64, record: &ByteRecord) -> Line {
    let last = record.len().saturating_sub(1);
    let fields = record
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let field = if index == last {
                field.strip_suffix(b"\r").unwrap_or(field)
            } else {
                field
            };
            String::from_utf8_lossy(field).into_owned()
        })
        .collect();

    Line::new(number, fields)
}

impl DelimitedParser {
    pub fn new(delimiter: u8) -> Self {
        DelimitedParser { delimiter }
    }

    pub fn parse_file<P>(
        &self,
        file_path: P,
    ) -> Result<Box<dyn Iterator<Item = Result<Line, ReadError>>>, ReadError>
    where
        P: AsRef<Path>,
    {
        let path = file_path.as_ref();
        debug!("Opening {:?} ...", path);

        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(self.parse(file))
    }

    /// Yields every line that has at least one non-empty field, numbered by
    /// its position in the input. Blank lines are skipped but still counted.
    pub fn parse<R>(&self, reader: R) -> Box<dyn Iterator<Item = Result<Line, ReadError>>>
    where
        R: Read + 'static,
    {
        // The extra newline terminates a final unterminated line, so after
        // each record the reader's line count is one past that record.
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader.chain(&b"\n"[..]));
        let mut record = ByteRecord::new();

        let iter = std::iter::from_fn(move || loop {
            match rdr.read_byte_record(&mut record) {
                Ok(false) => return None,
                Ok(true) => {
                    let number = rdr.position().line().saturating_sub(1);
                    let line = to_line(number, &record);
                    if !line.fields.is_empty() {
                        return Some(Ok(line));
                    }
                }
                Err(err) => return Some(Err(ReadError::Csv(err))),
            }
        });

        Box::new(iter)
    }
}
