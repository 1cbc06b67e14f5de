//! # Document Sources
//!
//! Read-only access to the collections behind the dashboard.
//!
//! ## MongoDB
//!
//! - One client per process, connection pooling handled by the driver
//! - Connection is verified with a `ping` up front so a bad URI fails at startup, not on the first request
//! - Every fetch is a full `find({})` on the collection, there is no projection or paging
//! - Nothing is ever written back
//!
//! ## Handles
//!
//! Each source exposes a handle string that identifies the connection (hosts and database name,
//! never credentials). Caches key on it so two databases never share entries.
use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Database,
    bson::{Document, doc},
    options::ClientOptions,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{collection::Collection, normalize::normalize_document};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to connect to the document store: {0}")]
    Connect(#[source] mongodb::error::Error),

    #[error("Failed to fetch collection {collection}: {source}")]
    Fetch {
        collection: Collection,
        #[source]
        source: mongodb::error::Error,
    },
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn handle(&self) -> &str;

    /// Raw documents of one collection. A collection that does not exist yields an empty list.
    async fn fetch(&self, collection: Collection) -> Result<Vec<Document>, SourceError>;
}

/// Fetches a collection and normalizes every document in it.
pub async fn load_collection(
    source: &dyn DocumentSource,
    collection: Collection,
) -> Result<Vec<Document>, SourceError> {
    let documents = source.fetch(collection).await?;
    debug!("Fetched {} documents from {collection}", documents.len());

    Ok(documents.into_iter().map(normalize_document).collect())
}

pub struct MongoSource {
    database: Database,
    handle: String,
}

impl MongoSource {
    pub async fn connect(options: ClientOptions, database_name: &str) -> Result<Self, SourceError> {
        let hosts = options
            .hosts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let client = Client::with_options(options).map_err(SourceError::Connect)?;
        let database = client.database(database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(SourceError::Connect)?;

        let handle = format!("{hosts}/{database_name}");
        info!("Connected to {handle}");

        Ok(Self { database, handle })
    }
}

#[async_trait]
impl DocumentSource for MongoSource {
    fn handle(&self) -> &str {
        &self.handle
    }

    async fn fetch(&self, collection: Collection) -> Result<Vec<Document>, SourceError> {
        let into_error = |source: mongodb::error::Error| SourceError::Fetch { collection, source };

        self.database
            .collection::<Document>(collection.name())
            .find(doc! {})
            .await
            .map_err(into_error)?
            .try_collect()
            .await
            .map_err(into_error)
    }
}

/// In-memory source, for tests and offline runs.
#[derive(Default)]
pub struct MemorySource {
    handle: String,
    collections: HashMap<Collection, Vec<Document>>,
}

impl MemorySource {
    pub fn new(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            collections: HashMap::new(),
        }
    }

    pub fn with_collection(mut self, collection: Collection, documents: Vec<Document>) -> Self {
        self.collections.insert(collection, documents);
        self
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    fn handle(&self) -> &str {
        &self.handle
    }

    async fn fetch(&self, collection: Collection) -> Result<Vec<Document>, SourceError> {
        Ok(self
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, oid::ObjectId};

    use super::{DocumentSource, MemorySource, load_collection};
    use crate::collection::Collection;

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let source = MemorySource::new("memory");

        let documents = source.fetch(Collection::Messages).await.unwrap();

        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_load_collection_normalizes() {
        let id = ObjectId::new();
        let source = MemorySource::new("memory").with_collection(
            Collection::Orders,
            vec![doc! { "_id": id, "restaurante_id": ObjectId::new() }],
        );

        let documents = load_collection(&source, Collection::Orders).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].get_str("_id").unwrap(), id.to_hex());
        assert!(documents[0].get_str("restaurante_id").is_ok());
    }
}
