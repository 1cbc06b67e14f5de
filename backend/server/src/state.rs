use std::sync::Arc;

use warehouse::{
    Tables,
    source::{DocumentSource, SourceError},
};

use super::{cache::Cache, config::Config, database::init_mongo, error::ServerError};

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn DocumentSource>,
    pub cache: Cache,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, ServerError> {
        let config = Config::load()?;
        let source = init_mongo(&config.mongodb_uri, &config.database).await?;

        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: Config, source: Arc<dyn DocumentSource>) -> Arc<Self> {
        let cache = Cache::new(config.cache_ttl);

        Arc::new(Self {
            config,
            source,
            cache,
        })
    }

    pub async fn snapshot(&self) -> Result<Arc<Tables>, SourceError> {
        self.cache.snapshot(self.source.as_ref()).await
    }
}
