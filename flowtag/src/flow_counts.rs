use std::collections::HashMap;

use crate::lookup_table::LookupKey;

/// Tallies collected while scanning a flow log: hits per tag and records per
/// port/protocol combination.
#[derive(Clone, Debug, Default)]
pub struct FlowCounts {
    tag_counts: HashMap<String, u64>,
    port_protocol_counts: HashMap<LookupKey, u64>,
}

impl FlowCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_tag(&mut self, tag: &str) {
        match self.tag_counts.get_mut(tag) {
            Some(count) => *count += 1,
            None => {
                self.tag_counts.insert(tag.to_string(), 1);
            }
        }
    }

    pub fn increment_combination(&mut self, key: &LookupKey) {
        *self.port_protocol_counts.entry(key.clone()).or_insert(0) += 1;
    }

    #[cfg(test)]
    pub fn tag_count(&self, tag: &str) -> u64 {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub fn combination_count(&self, key: &LookupKey) -> u64 {
        self.port_protocol_counts.get(key).copied().unwrap_or(0)
    }

    pub fn tag_counts(&self) -> &HashMap<String, u64> {
        &self.tag_counts
    }

    pub fn port_protocol_counts(&self) -> &HashMap<LookupKey, u64> {
        &self.port_protocol_counts
    }

    /// Sum of all tag counters. A record with several tags adds one per tag.
    pub fn total_tag_hits(&self) -> u64 {
        self.tag_counts.values().sum()
    }

    /// Sum of all combination counters, i.e. the number of records counted.
    pub fn total_records(&self) -> u64 {
        self.port_protocol_counts.values().sum()
    }
}
