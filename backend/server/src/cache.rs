//! # Cache
//!
//! Time-based memoization of store reads.
//!
//! - Collection fetches keyed by (connection handle, collection)
//! - Full snapshots keyed by connection handle
//! - Fixed TTL, no invalidation other than expiry
//! - Concurrent misses may both fetch, last write wins
use std::{future::Future, hash::Hash, sync::Arc, time::Duration};

use dashmap::DashMap;
use mongodb::bson::Document;
use tokio::time::Instant;
use tracing::{debug, info};
use warehouse::{
    Collection, Tables,
    source::{DocumentSource, SourceError, load_collection},
};

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;

        (entry.stored_at.elapsed() < self.ttl).then(|| entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = init().await?;
        self.insert(key, value.clone());

        Ok(value)
    }

    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

}

pub struct Cache {
    collections: TtlCache<(String, Collection), Arc<Vec<Document>>>,
    snapshots: TtlCache<String, Arc<Tables>>,
}

impl Cache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            collections: TtlCache::new(ttl),
            snapshots: TtlCache::new(ttl),
        }
    }

    pub async fn collection(
        &self,
        source: &dyn DocumentSource,
        collection: Collection,
    ) -> Result<Arc<Vec<Document>>, SourceError> {
        let key = (source.handle().to_string(), collection);

        self.collections
            .get_or_try_insert_with(key, || async {
                debug!("Cache miss for {collection}");
                load_collection(source, collection).await.map(Arc::new)
            })
            .await
    }

    /// Every collection of the source, as one snapshot.
    pub async fn snapshot(&self, source: &dyn DocumentSource) -> Result<Arc<Tables>, SourceError> {
        let handle = source.handle().to_string();

        self.snapshots
            .get_or_try_insert_with(handle, || async {
                self.collections.purge_expired();
                self.snapshots.purge_expired();

                let mut tables = Tables::new();
                for collection in Collection::ALL {
                    let documents = self.collection(source, collection).await?;
                    tables.insert(collection, documents);
                }

                info!("Loaded snapshot from {}", source.handle());
                Ok(Arc::new(tables))
            })
            .await
    }
}
