use crate::domain::{PhoneId, PhoneRecord};
use std::collections::HashMap;

/// Live values of the snapshot, kept current as the pass mutates records.
///
/// Buckets hold ids in the order they took the value, so the first id in a
/// bucket is the record that claimed it earliest.
#[derive(Debug, Default)]
pub(crate) struct ValueIndex {
    by_value: HashMap<String, Vec<PhoneId>>,
}

impl ValueIndex {
    pub(crate) fn from_records(records: &[PhoneRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            index.insert(record.id, &record.value);
        }
        index
    }

    pub(crate) fn find_other(&self, value: &str, exclude: PhoneId) -> Option<PhoneId> {
        self.by_value
            .get(value)?
            .iter()
            .copied()
            .find(|id| *id != exclude)
    }

    pub(crate) fn relabel(&mut self, id: PhoneId, from: &str, to: &str) {
        self.remove(id, from);
        self.insert(id, to);
    }

    pub(crate) fn remove(&mut self, id: PhoneId, value: &str) {
        if let Some(ids) = self.by_value.get_mut(value) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.by_value.remove(value);
            }
        }
    }

    fn insert(&mut self, id: PhoneId, value: &str) {
        self.by_value.entry(value.to_string()).or_default().push(id);
    }
}
