//! # MongoDB
//!
//! Document database holding the restaurant platform data.
//!
//! Core purpose is to serve whole collections to the dashboard. Reads only.
//!
//! ## Requirements
//!
//! - Fail fast at startup when the URI is wrong or the cluster is unreachable
//! - Small dataset, full collection scans are acceptable
//! - Nine fixed collections, see [`warehouse::Collection`]
//!
//! ## Implementation
//!
//! - Short server selection and connect timeouts, the driver retries reads once on its own
//! - Connection string comes from the secret store, see [`crate::config`]
//! - Results are memoized for the configured TTL, see [`crate::cache`]
use std::time::Duration;

use mongodb::options::ClientOptions;
use warehouse::source::{MongoSource, SourceError};

const APP_NAME: &str = "restaurant-dashboard";

pub async fn init_mongo(uri: &str, database: &str) -> Result<MongoSource, SourceError> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(SourceError::Connect)?;

    options.app_name = Some(APP_NAME.to_string());
    options.connect_timeout = Some(Duration::from_secs(5));
    options.server_selection_timeout = Some(Duration::from_secs(5));

    MongoSource::connect(options, database).await
}
