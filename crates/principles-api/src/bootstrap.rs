//! Store connection at startup
//!
//! A failed connection never stops the process. The API still starts, the
//! home route answers, and data routes report the store as unavailable.

use std::sync::Arc;

use principles_core::{MongoPrincipleStore, ServiceSettings};

/// Connect to MongoDB, logging the outcome
pub async fn connect_store(settings: &ServiceSettings) -> Option<Arc<MongoPrincipleStore>> {
    match MongoPrincipleStore::connect(settings).await {
        Ok(store) => {
            tracing::info!(
                database = store.database(),
                collection = %settings.collection,
                "Successfully connected to MongoDB"
            );
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!(
                kind = %e.kind(),
                error = %e,
                "Could not connect to MongoDB, data routes will be unavailable"
            );
            None
        }
    }
}
