//! Principles Core
//!
//! Domain logic for the principles collection: a flat set of JSON documents
//! that each carry at least a `title` and a `description`.
//!
//! ## Architecture
//!
//! 1. **Model** (`model`): creation payload validation and the rendering of
//!    stored documents with string identifiers.
//!
//! 2. **Store** (`store`): the [`PrincipleStore`] trait with MongoDB and
//!    in-memory implementations. Identifier parsing and rendering live
//!    behind [`IdCodec`].
//!
//! 3. **Service** (`service`): create, list and get-by-id, including the
//!    "store unavailable" mode used when startup could not connect.
//!
//! 4. **Errors** (`error`): one [`ErrorKind`] per failure class with a pure
//!    mapping to HTTP status codes.
//!
//! 5. **Config** (`config`): `.env` loading and [`ServiceSettings`].

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use config::{DotEnv, ServiceSettings};
pub use error::{ErrorKind, Result, ServiceError, StoreError, StoreResult};
pub use model::{serialize_document, Fields, NewPrinciple, StoredDocument};
pub use service::PrincipleService;
pub use store::{IdCodec, InMemoryPrincipleStore, MongoPrincipleStore, PrincipleStore};
