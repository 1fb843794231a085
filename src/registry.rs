use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::FactionRecord;

/// Looks up faction records by key.
pub trait FactionRegistry: Send + Sync {
    /// The record for `key`, or for a faction that lists `key` among its
    /// alternative codes. Must be side-effect free.
    fn faction_record_or_fallback(&self, key: &str) -> Option<Arc<FactionRecord>>;
}

/// In-memory registry keyed by faction key.
#[derive(Debug, Default, Clone)]
pub struct FactionCatalog {
    records: BTreeMap<String, Arc<FactionRecord>>,
}

impl FactionCatalog {
    pub fn new(records: impl IntoIterator<Item = FactionRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.key.clone(), Arc::new(r)))
            .collect();
        Self { records }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<FactionRecord>> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FactionRecord>> {
        self.records.values()
    }
}

impl FactionRegistry for FactionCatalog {
    fn faction_record_or_fallback(&self, key: &str) -> Option<Arc<FactionRecord>> {
        if let Some(record) = self.records.get(key) {
            return Some(record.clone());
        }
        // BTreeMap order keeps the fallback choice stable between calls
        let fallback = self.records.values().find(|r| r.answers_to(key)).cloned();
        if let Some(record) = &fallback {
            tracing::debug!(
                requested = key,
                resolved = %record.key,
                "faction resolved through alternative code"
            );
        }
        fallback
    }
}
