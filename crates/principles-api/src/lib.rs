//! Principles API
//!
//! REST server exposing create and read operations over the principles
//! collection. Domain logic lives in `principles-core`; this crate maps it
//! onto HTTP.
//!
//! # Routes
//! - `GET /` - greeting, always available
//! - `POST /principles` - create (201)
//! - `GET /principles` - list
//! - `GET /principles/:id` - fetch one

pub mod bootstrap;
pub mod handler;
pub mod server;

pub use bootstrap::connect_store;
pub use handler::{create_router, ApiError, AppState};
pub use server::serve;
