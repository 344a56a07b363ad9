//! Document store abstraction
//!
//! Route logic never sees a concrete identifier type. A store declares its
//! native id through [`IdCodec`] and the service only ever parses external
//! ids and renders native ones as strings through it.
//!
//! Two stores are provided:
//! - [`MongoPrincipleStore`]: the production store, ids are `ObjectId`s
//! - [`InMemoryPrincipleStore`]: process-local store, ids are UUIDs

pub mod memory;
pub mod mongo;

pub use memory::InMemoryPrincipleStore;
pub use mongo::MongoPrincipleStore;

use std::fmt;

use crate::error::StoreResult;
use crate::model::{NewPrinciple, StoredDocument};

/// Conversion between external (string) and native identifiers
pub trait IdCodec {
    /// Native identifier type of the store
    type Id: Clone + fmt::Debug + Send + Sync + 'static;

    /// Parse a client-supplied identifier
    ///
    /// Returns `StoreError::InvalidId` when the string is not in the
    /// store's native format.
    fn parse_id(raw: &str) -> StoreResult<Self::Id>;

    /// Render a native identifier for clients
    fn render_id(id: &Self::Id) -> String;
}

/// Storage backend for the principles collection
///
/// Implementations must be cheap to share behind an `Arc`; every request
/// handler holds a reference to the same instance.
#[async_trait::async_trait]
pub trait PrincipleStore: IdCodec + Send + Sync + fmt::Debug + 'static {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Lightweight round trip to confirm the store is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Insert a new document and return the identifier the store assigned
    async fn insert(&self, principle: NewPrinciple) -> StoreResult<Self::Id>;

    /// Every document in the collection, in the store's natural order
    async fn find_all(&self) -> StoreResult<Vec<StoredDocument<Self::Id>>>;

    /// The document with the given identifier, if any
    async fn find_by_id(&self, id: &Self::Id) -> StoreResult<Option<StoredDocument<Self::Id>>>;
}
