use std::sync::Arc;

use tracing::warn;

use crate::{
    config::{Config, StoreKind},
    database::init_mongo,
    store::{MemoryStore, Store},
};

pub struct State {
    pub config: Config,
    pub store: Arc<dyn Store>,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store: Arc<dyn Store> = match config.store {
            StoreKind::Mongo => Arc::new(
                init_mongo(&config.mongo_url, &config.mongo_db)
                    .await
                    .expect("MongoDB misconfigured!"),
            ),
            StoreKind::Memory => {
                warn!("Using in-memory store, records will not survive a restart");
                Arc::new(MemoryStore::default())
            }
        };

        Arc::new(Self { config, store })
    }

    /// State over an explicit store, used by the contract tests.
    pub fn with_store(store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self {
            config: Config::load(),
            store,
        })
    }
}
