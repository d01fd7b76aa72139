use super::MovieStore;
use crate::config::MongoConfig;
use crate::error::{Result, ScraperError};
use crate::types::{IdentityKey, KeyCount, MovieRecord};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Client, Collection};
use tracing::{debug, info};

/// MongoDB-backed movie collection. `ObjectId`s sort by creation time, which
/// stands in for insertion order.
pub struct MongoStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connects and pings the server so an unreachable store fails here, not mid-run.
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let uri = config.require_uri()?;
        info!("Connecting to MongoDB collection {}.{}", config.database, config.collection);

        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| ScraperError::connectivity(format!("Failed to open client: {e}")))?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| ScraperError::connectivity(format!("Ping failed: {e}")))?;

        let collection = database.collection::<Document>(&config.collection);
        Ok(Self { client, collection })
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Splits driver errors into run-ending connectivity failures and per-operation rejections.
fn classify(err: mongodb::error::Error) -> ScraperError {
    match *err.kind {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => ScraperError::connectivity(err.to_string()),
        _ => ScraperError::store(err.to_string()),
    }
}

fn key_filter(key: &IdentityKey) -> Document {
    doc! { "title": key.title.clone(), "year": key.year }
}

fn id_only() -> Document {
    doc! { "_id": 1 }
}

fn object_id(document: &Document) -> Result<ObjectId> {
    document
        .get_object_id("_id")
        .map_err(|e| ScraperError::store(format!("Document without ObjectId _id: {e}")))
}

fn key_count(document: &Document) -> Result<KeyCount> {
    let group = document
        .get_document("_id")
        .map_err(|e| ScraperError::store(format!("Malformed group key: {e}")))?;

    let title = match group.get("title") {
        Some(Bson::String(title)) => Some(title.clone()),
        _ => None,
    };
    let year = match group.get("year") {
        Some(Bson::Int32(year)) => Some(*year),
        Some(Bson::Int64(year)) => i32::try_from(*year).ok(),
        Some(Bson::Double(year)) if year.fract() == 0.0 && year.abs() <= f64::from(i32::MAX) => {
            Some(*year as i32)
        }
        _ => None,
    };
    let count = match document.get("count") {
        Some(Bson::Int32(count)) => *count as u64,
        Some(Bson::Int64(count)) => *count as u64,
        other => return Err(ScraperError::store(format!("Malformed group count: {other:?}"))),
    };

    Ok(KeyCount {
        key: IdentityKey { title, year },
        count,
    })
}

/// Groups by identity key and keeps groups with more than one document.
///
/// A missing field and an explicit null land in the same group, matching how
/// `key_filter` selects them.
fn duplicate_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": {
                "title": { "$ifNull": ["$title", Bson::Null] },
                "year": { "$ifNull": ["$year", Bson::Null] },
            },
            "count": { "$sum": 1 },
        }},
        doc! { "$match": { "count": { "$gt": 1 } } },
    ]
}

#[async_trait]
impl MovieStore for MongoStore {
    type Id = ObjectId;

    async fn find_id_by_key(&self, key: &IdentityKey) -> Result<Option<ObjectId>> {
        let options = FindOneOptions::builder().projection(id_only()).build();
        let found = self
            .collection
            .find_one(key_filter(key), options)
            .await
            .map_err(classify)?;
        found.as_ref().map(object_id).transpose()
    }

    async fn insert(&self, record: &MovieRecord) -> Result<ObjectId> {
        let document = bson::to_document(record)
            .map_err(|e| ScraperError::store(format!("Failed to encode '{}': {e}", record.title)))?;
        let result = self
            .collection
            .insert_one(document, None)
            .await
            .map_err(classify)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ScraperError::store("Insert returned a non-ObjectId _id"))
    }

    async fn ids_for_key(&self, key: &IdentityKey) -> Result<Vec<ObjectId>> {
        let options = FindOptions::builder()
            .projection(id_only())
            .sort(doc! { "_id": 1 })
            .build();
        let documents: Vec<Document> = self
            .collection
            .find(key_filter(key), options)
            .await
            .map_err(classify)?
            .try_collect()
            .await
            .map_err(classify)?;
        documents.iter().map(object_id).collect()
    }

    async fn delete_ids(&self, ids: &[ObjectId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let filter = doc! { "_id": { "$in": ids.to_vec() } };
        let result = self.collection.delete_many(filter, None).await.map_err(classify)?;
        debug!("Deleted {} of {} requested documents", result.deleted_count, ids.len());
        Ok(result.deleted_count)
    }

    async fn duplicate_key_counts(&self) -> Result<Vec<KeyCount>> {
        let groups: Vec<Document> = self
            .collection
            .aggregate(duplicate_pipeline(), None)
            .await
            .map_err(classify)?
            .try_collect()
            .await
            .map_err(classify)?;
        groups.iter().map(key_count).collect()
    }

    async fn count_documents(&self) -> Result<u64> {
        self.collection
            .count_documents(doc! {}, None)
            .await
            .map_err(classify)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = self.collection.delete_many(doc! {}, None).await.map_err(classify)?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_rows_decode_null_components() {
        let row = doc! { "_id": { "title": "Dune", "year": Bson::Null }, "count": 3 };
        let parsed = key_count(&row).unwrap();
        assert_eq!(parsed.key, IdentityKey { title: Some("Dune".into()), year: None });
        assert_eq!(parsed.count, 3);

        let row = doc! { "_id": { "year": 2021_i64 }, "count": 2_i64 };
        let parsed = key_count(&row).unwrap();
        assert_eq!(parsed.key.title, None);
        assert_eq!(parsed.key.year, Some(2021));
    }

    #[test]
    fn whole_double_years_decode() {
        let row = doc! { "_id": { "title": "Dune", "year": 2021.0 }, "count": 2 };
        assert_eq!(key_count(&row).unwrap().key, IdentityKey::new("Dune", Some(2021)));

        let row = doc! { "_id": { "title": "Dune", "year": 2021.5 }, "count": 2 };
        assert_eq!(key_count(&row).unwrap().key.year, None);
    }

    #[test]
    fn grouping_folds_missing_fields_into_null() {
        let pipeline = duplicate_pipeline();
        let group = pipeline[0].get_document("$group").unwrap();
        let id = group.get_document("_id").unwrap();
        for field in ["title", "year"] {
            let expr = id.get_document(field).unwrap();
            let args = expr.get_array("$ifNull").unwrap();
            assert_eq!(args[0], Bson::String(format!("${field}")));
            assert_eq!(args[1], Bson::Null);
        }
    }

    #[test]
    fn key_filter_keeps_nulls() {
        let filter = key_filter(&IdentityKey { title: Some("Heat".into()), year: None });
        assert_eq!(filter.get("year"), Some(&Bson::Null));
        assert_eq!(filter.get_str("title").unwrap(), "Heat");
    }
}
