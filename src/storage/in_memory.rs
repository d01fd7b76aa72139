use super::MovieStore;
use crate::error::{Result, ScraperError};
use crate::types::{IdentityKey, KeyCount, MovieRecord};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct Collection {
    next_id: u64,
    documents: BTreeMap<u64, MovieRecord>,
}

/// In-memory store for dry runs and tests. Ids are sequential from 1.
#[derive(Default)]
pub struct InMemoryStore {
    collection: Mutex<Collection>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored document in id order.
    pub fn documents(&self) -> Result<Vec<(u64, MovieRecord)>> {
        let collection = self.lock()?;
        Ok(collection
            .documents
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collection>> {
        self.collection
            .lock()
            .map_err(|_| ScraperError::store("in-memory collection lock poisoned"))
    }
}

fn matches_key(record: &MovieRecord, key: &IdentityKey) -> bool {
    key.title.as_deref() == Some(record.title.as_str()) && key.year == record.year
}

#[async_trait]
impl MovieStore for InMemoryStore {
    type Id = u64;

    async fn find_id_by_key(&self, key: &IdentityKey) -> Result<Option<u64>> {
        let collection = self.lock()?;
        Ok(collection
            .documents
            .iter()
            .find(|(_, record)| matches_key(record, key))
            .map(|(id, _)| *id))
    }

    async fn insert(&self, record: &MovieRecord) -> Result<u64> {
        let mut collection = self.lock()?;
        collection.next_id += 1;
        let id = collection.next_id;
        collection.documents.insert(id, record.clone());

        debug!("Stored '{}' with id {}", record.title, id);
        Ok(id)
    }

    async fn ids_for_key(&self, key: &IdentityKey) -> Result<Vec<u64>> {
        let collection = self.lock()?;
        Ok(collection
            .documents
            .iter()
            .filter(|(_, record)| matches_key(record, key))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn delete_ids(&self, ids: &[u64]) -> Result<u64> {
        let mut collection = self.lock()?;
        let mut deleted = 0;
        for id in ids {
            if collection.documents.remove(id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn duplicate_key_counts(&self) -> Result<Vec<KeyCount>> {
        let collection = self.lock()?;
        let mut order: Vec<IdentityKey> = Vec::new();
        let mut counts: HashMap<IdentityKey, u64> = HashMap::new();
        for record in collection.documents.values() {
            let key = record.identity_key();
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }

        Ok(order
            .into_iter()
            .filter_map(|key| {
                let count = counts.get(&key).copied().unwrap_or(0);
                (count > 1).then_some(KeyCount { key, count })
            })
            .collect())
    }

    async fn count_documents(&self) -> Result<u64> {
        Ok(self.lock()?.documents.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut collection = self.lock()?;
        let deleted = collection.documents.len() as u64;
        collection.documents.clear();
        Ok(deleted)
    }
}
