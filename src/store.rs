// Record Store - immutable snapshot for one view session

use crate::record::{RawRecord, Record};

/// Snapshot of normalized records.
/// Nothing hands out `&mut Record`; views borrow from here.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    source: Option<String>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            source: None,
        }
    }

    /// Normalize raw feed rows into a snapshot
    pub fn from_raw<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        Self::new(rows.into_iter().map(Record::from_raw).collect())
    }

    /// Tag the snapshot with where it came from (file path, feed name)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_normalizes_every_row() {
        let rows = vec![
            RawRecord {
                name: Some("Ann".to_string()),
                risk_score: Some(30.0),
                ..Default::default()
            },
            RawRecord::default(),
        ];

        let store = RecordStore::from_raw(rows).with_source("feed.json");

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].risk_score, 30.0);
        assert_eq!(store.records()[1].risk_score, 50.0);
        assert_eq!(store.source(), Some("feed.json"));
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::default();
        assert!(store.is_empty());
        assert_eq!(store.source(), None);
    }
}
