//! Aggregator: fold item outcomes into the final keyed menu.

use std::collections::HashMap;

use tracing::warn;

use crate::detail::ItemOutcome;
use crate::record::MenuRecord;

/// Accumulates item outcomes into a map keyed by item name.
///
/// Names repeat across sections on real storefronts (a drink listed under
/// both "Drinks" and "Popular Items"); the later occurrence in walk order
/// wins and the overwrite is logged.
pub struct Aggregator {
    records: HashMap<String, MenuRecord>,
    last_section: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            last_section: HashMap::new(),
        }
    }

    pub fn absorb(&mut self, section: usize, outcome: ItemOutcome) {
        let record = match outcome {
            ItemOutcome::Detailed {
                name,
                description,
                groups,
            } => MenuRecord {
                name,
                description,
                price: String::new(),
                option_groups: Some(groups),
            },
            ItemOutcome::Fallback {
                name,
                description,
                price,
            } => MenuRecord {
                name,
                description,
                price,
                option_groups: None,
            },
        };

        if let Some(&earlier) = self.last_section.get(&record.name) {
            warn!(
                item = %record.name,
                earlier_section = earlier,
                section,
                "duplicate item name, keeping the later occurrence"
            );
        }
        self.last_section.insert(record.name.clone(), section);
        self.records.insert(record.name.clone(), record);
    }

    pub fn into_records(self) -> HashMap<String, MenuRecord> {
        self.records
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
