use serde::{Deserialize, Serialize};

/// Maximum number of retained calculations; the oldest entry is dropped first.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    #[serde(rename = "calculation")]
    pub expression: String,
    pub result: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
        }
    }

    /// Build a history from stored entries, enforcing the size cap.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        History { entries }
    }

    // Entries are kept newest-first.
    pub fn record(&mut self, expression: String, result: String) {
        self.entries.insert(0, HistoryEntry { expression, result });
        if self.entries.len() > HISTORY_LIMIT {
            log::debug!("history full, dropping oldest entry");
            self.entries.truncate(HISTORY_LIMIT);
        }
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
