use std::{
    collections::HashMap,
    hash::Hash,
    io::{self, BufWriter, Write},
};

use crate::{args::ReportOrder, flow_counts::FlowCounts, lookup_table::TagIndex};
use log::debug;

/// Writes the three report sections: tag counts, port/protocol counts and
/// the tag to combination index.
pub struct ReportWriter<W: Write> {
    order: ReportOrder,
    writer: BufWriter<W>,
}

/// Collects map entries, sorting them by key when `order` asks for it.
fn ordered<K, V>(map: &HashMap<K, V>, order: ReportOrder) -> Vec<(&K, &V)>
where
    K: Ord + Hash,
{
    let mut entries: Vec<(&K, &V)> = map.iter().collect();
    if order == ReportOrder::Sorted {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    entries
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W, order: ReportOrder) -> Self {
        ReportWriter {
            order,
            writer: BufWriter::new(writer),
        }
    }

    pub fn write_report(&mut self, counts: &FlowCounts, index: &TagIndex) -> io::Result<()> {
        debug!("Writing report ({} order)", self.order);
        self.write_tag_counts(counts)?;
        writeln!(self.writer)?;
        self.write_port_protocol_counts(counts)?;
        writeln!(self.writer)?;
        self.write_tag_index(index)
    }

    pub fn write_tag_counts(&mut self, counts: &FlowCounts) -> io::Result<()> {
        writeln!(self.writer, "Tag Counts:")?;
        writeln!(self.writer, "Tag,Count")?;
        for (tag, count) in ordered(counts.tag_counts(), self.order) {
            writeln!(self.writer, "{},{}", tag, count)?;
        }
        Ok(())
    }

    pub fn write_port_protocol_counts(&mut self, counts: &FlowCounts) -> io::Result<()> {
        writeln!(self.writer, "Port/Protocol Combination Counts:")?;
        writeln!(self.writer, "Port,Protocol,Count")?;
        for (key, count) in ordered(counts.port_protocol_counts(), self.order) {
            let (port, protocol) = key.parts();
            writeln!(self.writer, "{},{},{}", port, protocol, count)?;
        }
        Ok(())
    }

    pub fn write_tag_index(&mut self, index: &TagIndex) -> io::Result<()> {
        writeln!(self.writer, "Tag to Port/Protocol Combinations:")?;

        let mut tags: Vec<_> = index.iter().collect();
        if self.order == ReportOrder::Sorted {
            tags.sort_by(|a, b| a.0.cmp(b.0));
        }

        for (tag, combinations) in tags {
            writeln!(self.writer, "Tag: {}", tag)?;

            let mut combinations: Vec<_> = combinations.iter().collect();
            if self.order == ReportOrder::Sorted {
                combinations.sort();
            }
            for combination in combinations {
                writeln!(self.writer, " - {}", combination)?;
            }
        }
        Ok(())
    }

    /// Flushes the buffered report to the underlying writer.
    pub fn flush_and_close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
