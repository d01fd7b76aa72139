// Document store collaborator and its implementations

pub mod in_memory;
#[cfg(feature = "mongo")]
pub mod mongo;

pub use in_memory::InMemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

use crate::error::Result;
use crate::types::{IdentityKey, KeyCount, MovieRecord};
use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// The persisted movie collection.
///
/// Ids are assigned by the store on insert and must sort in insertion order,
/// since reconciliation keeps the lowest id of each duplicate group.
#[async_trait]
pub trait MovieStore: Send + Sync {
    type Id: Clone + Ord + Display + Debug + Send + Sync;

    /// Id of any document stored under `key`.
    async fn find_id_by_key(&self, key: &IdentityKey) -> Result<Option<Self::Id>>;

    async fn insert(&self, record: &MovieRecord) -> Result<Self::Id>;

    /// Ids of every document stored under `key`.
    async fn ids_for_key(&self, key: &IdentityKey) -> Result<Vec<Self::Id>>;

    /// Deletes the documents with the given ids, returning how many went away.
    async fn delete_ids(&self, ids: &[Self::Id]) -> Result<u64>;

    /// Keys held by more than one document, with their document counts.
    async fn duplicate_key_counts(&self) -> Result<Vec<KeyCount>>;

    async fn count_documents(&self) -> Result<u64>;

    async fn delete_all(&self) -> Result<u64>;
}
