//! In-memory principle store
//!
//! Keeps documents in insertion order behind an async `RwLock`. Used for
//! local runs without a database and as the backing store in tests.

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IdCodec, PrincipleStore};
use crate::error::{StoreError, StoreResult};
use crate::model::{NewPrinciple, StoredDocument};

#[derive(Debug, Default)]
pub struct InMemoryPrincipleStore {
    documents: RwLock<Vec<StoredDocument<Uuid>>>,
}

impl InMemoryPrincipleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl IdCodec for InMemoryPrincipleStore {
    type Id = Uuid;

    fn parse_id(raw: &str) -> StoreResult<Uuid> {
        Uuid::parse_str(raw).map_err(|e| StoreError::InvalidId(format!("{}: {}", raw, e)))
    }

    fn render_id(id: &Uuid) -> String {
        id.to_string()
    }
}

#[async_trait::async_trait]
impl PrincipleStore for InMemoryPrincipleStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, principle: NewPrinciple) -> StoreResult<Uuid> {
        let id = Uuid::new_v4();
        self.documents
            .write()
            .await
            .push(StoredDocument::new(id, principle.into_fields()));
        Ok(id)
    }

    async fn find_all(&self) -> StoreResult<Vec<StoredDocument<Uuid>>> {
        Ok(self.documents.read().await.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<StoredDocument<Uuid>>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|doc| doc.id == *id)
            .cloned())
    }
}
