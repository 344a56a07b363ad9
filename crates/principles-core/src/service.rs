//! Principle service
//!
//! Implements create, list and get-by-id on top of a [`PrincipleStore`].
//! The store is optional: when no connection was established at startup the
//! service still exists and every data operation fails with
//! [`ServiceError::StoreUnavailable`].

use std::sync::Arc;

use crate::error::{Result, ServiceError, NOT_FOUND_MESSAGE};
use crate::model::{serialize_document, Fields, NewPrinciple};
use crate::store::PrincipleStore;

pub struct PrincipleService<S> {
    store: Option<Arc<S>>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for PrincipleService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: PrincipleStore> PrincipleService<S> {
    /// Service backed by a connected store
    pub fn new(store: Arc<S>) -> Self {
        Self { store: Some(store) }
    }

    /// Service without a store; data operations report unavailability
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn from_option(store: Option<Arc<S>>) -> Self {
        Self { store }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Fail with [`ServiceError::StoreUnavailable`] when there is no store
    pub fn ensure_available(&self) -> Result<()> {
        self.store().map(|_| ())
    }

    fn store(&self) -> Result<&S> {
        self.store.as_deref().ok_or(ServiceError::StoreUnavailable)
    }

    /// Validate a raw request body and insert it
    ///
    /// Availability is checked before the body is looked at. Returns the
    /// new identifier rendered as a string.
    pub async fn create(&self, body: &[u8]) -> Result<String> {
        let store = self.store()?;
        let principle = NewPrinciple::from_slice(body)?;

        let id = store.insert(principle).await.map_err(|e| {
            tracing::error!(store = store.name(), error = %e, "Insert failed");
            ServiceError::from(e)
        })?;

        let id = S::render_id(&id);
        tracing::info!(id = %id, "Principle created");
        Ok(id)
    }

    /// Every principle, with string identifiers
    pub async fn list(&self) -> Result<Vec<Fields>> {
        let store = self.store()?;

        let documents = store.find_all().await.map_err(|e| {
            tracing::error!(store = store.name(), error = %e, "Listing failed");
            ServiceError::from(e)
        })?;

        tracing::debug!(count = documents.len(), "Listed principles");
        Ok(documents
            .into_iter()
            .map(|doc| serialize_document(doc, S::render_id))
            .collect())
    }

    /// A single principle by its external identifier
    pub async fn get(&self, raw_id: &str) -> Result<Fields> {
        let store = self.store()?;
        let id = S::parse_id(raw_id)?;

        let found = store.find_by_id(&id).await.map_err(|e| {
            tracing::error!(store = store.name(), id = raw_id, error = %e, "Lookup failed");
            ServiceError::from(e)
        })?;

        found
            .map(|doc| serialize_document(doc, S::render_id))
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, INVALID_ID_MESSAGE, MISSING_FIELDS_MESSAGE};
    use crate::store::InMemoryPrincipleStore;
    use serde_json::json;

    fn service() -> (PrincipleService<InMemoryPrincipleStore>, Arc<InMemoryPrincipleStore>) {
        let store = Arc::new(InMemoryPrincipleStore::new());
        (PrincipleService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (service, _) = service();
        assert!(service.ensure_available().is_ok());
        let id = service
            .create(br#"{"title":"Honesty","description":"Be truthful"}"#)
            .await
            .unwrap();

        let doc = service.get(&id).await.unwrap();
        assert_eq!(doc["_id"], json!(id));
        assert_eq!(doc["title"], json!("Honesty"));
        assert_eq!(doc["description"], json!("Be truthful"));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (service, store) = service();
        let err = service.create(br#"{"title":"Honesty"}"#).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_errors() {
        let (service, _) = service();

        let err = service.get("not-a-valid-id").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), INVALID_ID_MESSAGE);

        let err = service
            .get(&uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_counts_creations() {
        let (service, _) = service();
        for i in 0..3 {
            let body = json!({"title": format!("p{i}"), "description": "d"}).to_string();
            service.create(body.as_bytes()).await.unwrap();
        }

        let docs = service.list().await.unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs.iter().all(|d| d["_id"].is_string()));
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let service = PrincipleService::<InMemoryPrincipleStore>::unavailable();
        assert!(!service.is_available());
        assert_eq!(
            service.ensure_available().unwrap_err().kind(),
            ErrorKind::StoreUnavailable
        );

        let body = br#"{"title":"a","description":"b"}"#;
        assert_eq!(
            service.create(body).await.unwrap_err().kind(),
            ErrorKind::StoreUnavailable
        );
        assert_eq!(
            service.list().await.unwrap_err().kind(),
            ErrorKind::StoreUnavailable
        );
        assert_eq!(
            service.get("anything").await.unwrap_err().kind(),
            ErrorKind::StoreUnavailable
        );
    }

    #[tokio::test]
    async fn test_unavailable_is_checked_before_body() {
        let service = PrincipleService::<InMemoryPrincipleStore>::unavailable();
        let err = service.create(b"{broken").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }
}
