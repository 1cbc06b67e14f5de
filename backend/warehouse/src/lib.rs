//! # Warehouse
//!
//! Read-only snapshot of the restaurant platform's document store.
//!
//! Core purpose is to pull whole collections, rewrite store-specific identifier types into plain strings
//! and hand the rest of the system a table per collection.
//!
//! ## Requirements
//!
//! - Never write back to the source
//! - Tolerate missing collections and missing or ill-typed fields
//! - Identifiers comparable as strings at every depth
//!
//! ## Implementation
//!
//! - [`source::DocumentSource`]: async trait over a store, MongoDB in production and in-memory in tests
//! - [`normalize`]: recursive `ObjectId` to hex string rewrite
//! - [`Tables`]: normalized documents keyed by [`Collection`], with typed views over them
pub mod collection;
pub mod fields;
pub mod models;
pub mod normalize;
pub mod source;

use std::{collections::HashMap, sync::Arc};

use mongodb::bson::Document;

pub use collection::Collection;
use models::{Dish, Order, Restaurant, Review};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    collections: HashMap<Collection, Arc<Vec<Document>>>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts owned documents or a shared list, e.g. one held by a cache.
    pub fn insert(&mut self, collection: Collection, documents: impl Into<Arc<Vec<Document>>>) {
        self.collections.insert(collection, documents.into());
    }

    pub fn documents(&self, collection: Collection) -> &[Document] {
        self.collections
            .get(&collection)
            .map(|documents| documents.as_slice())
            .unwrap_or_default()
    }

    /// Document count per collection, in [`Collection::ALL`] order.
    pub fn counts(&self) -> Vec<(Collection, usize)> {
        Collection::ALL
            .into_iter()
            .map(|collection| (collection, self.documents(collection).len()))
            .collect()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.view(Collection::Orders, Order::from_document)
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.view(Collection::Restaurants, Restaurant::from_document)
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.view(Collection::Reviews, Review::from_document)
    }

    pub fn dishes(&self) -> Vec<Dish> {
        self.view(Collection::Dishes, Dish::from_document)
    }

    fn view<T>(&self, collection: Collection, read: fn(&Document) -> T) -> Vec<T> {
        self.documents(collection).iter().map(read).collect()
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::{Collection, Tables};

    #[test]
    fn test_missing_collection() {
        let tables = Tables::new();

        assert!(tables.documents(Collection::Orders).is_empty());
        assert!(tables.orders().is_empty());
    }

    #[test]
    fn test_counts() {
        let mut tables = Tables::new();
        tables.insert(Collection::Dishes, vec![doc! { "nome": "Pastel" }, doc! {}]);

        let counts = tables.counts();

        assert_eq!(counts.len(), Collection::ALL.len());
        assert!(counts.contains(&(Collection::Dishes, 2)));
        assert!(counts.contains(&(Collection::Users, 0)));
    }
}
