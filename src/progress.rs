use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::{ResultExt, ensure};

use crate::clock::Timestamp;
use crate::due::due_items;
use crate::error::{InvalidRecordSnafu, Result, SerializationSnafu};
use crate::record::ReviewRecord;
use crate::scheduler::next_record;

/// The caller-owned map of item id to scheduling record.
///
/// Items without a record have never been reviewed. Keys are kept sorted so
/// the serialized form is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    records: BTreeMap<String, ReviewRecord>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &str) -> Option<&ReviewRecord> {
        self.records.get(item_id)
    }

    pub fn get_mut(&mut self, item_id: &str) -> Option<&mut ReviewRecord> {
        self.records.get_mut(item_id)
    }

    pub fn has_record(&self, item_id: &str) -> bool {
        self.records.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.records.values()
    }

    /// Stores `record` under its own item id, replacing any previous one.
    pub fn apply(&mut self, record: ReviewRecord) -> &ReviewRecord {
        match self.records.entry(record.item_id.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(record);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(record),
        }
    }

    /// Reviews one item against its stored record and stores the result.
    pub fn review(&mut self, item_id: &str, quality: i32, now: Timestamp) -> &ReviewRecord {
        let record = next_record(item_id, self.get(item_id), quality, now);
        self.apply(record)
    }

    /// Folds in the results of a finished session; its records win.
    pub fn merge(&mut self, session: Progress) {
        debug!("merging {} session records", session.len());
        self.records.extend(session.records);
    }

    pub fn due(&self, now: Timestamp) -> Vec<&ReviewRecord> {
        due_items(self.records.values(), now)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context(SerializationSnafu)
    }

    /// Parses and validates a saved payload. Any bad record fails the whole
    /// load.
    pub fn from_json(json: &str) -> Result<Self> {
        let progress: Progress = serde_json::from_str(json).context(SerializationSnafu)?;
        for (key, record) in &progress.records {
            check_entry(key, record)?;
        }
        Ok(progress)
    }

    /// Lenient load: records that fail to parse or validate are dropped one
    /// by one, and an unreadable payload yields an empty store.
    pub fn from_json_or_default(json: &str) -> Self {
        let entries: BTreeMap<String, Value> = match serde_json::from_str(json) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("discarding saved progress: {err}");
                return Self::default();
            }
        };
        entries
            .into_iter()
            .filter_map(|(key, value)| match parse_entry(&key, value) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("dropping saved record {key:?}: {err}");
                    None
                }
            })
            .collect()
    }
}

fn check_entry(key: &str, record: &ReviewRecord) -> Result<()> {
    ensure!(
        key == record.item_id(),
        InvalidRecordSnafu {
            item_id: key,
            reason: format!("stored under a different id {:?}", record.item_id()),
        }
    );
    record.validate()
}

fn parse_entry(key: &str, value: Value) -> Result<ReviewRecord> {
    let record: ReviewRecord = serde_json::from_value(value).context(SerializationSnafu)?;
    check_entry(key, &record)?;
    Ok(record)
}

impl FromIterator<ReviewRecord> for Progress {
    fn from_iter<T: IntoIterator<Item = ReviewRecord>>(iter: T) -> Self {
        let mut progress = Progress::default();
        for record in iter {
            progress.apply(record);
        }
        progress
    }
}

impl<'a> IntoIterator for &'a Progress {
    type Item = &'a ReviewRecord;
    type IntoIter = std::collections::btree_map::Values<'a, String, ReviewRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
