//! HTTP handler for the principles API
//!
//! Every response body is a JSON object carrying a `status` field:
//! - `running` for the home route
//! - `success` for completed data operations
//! - `error` for every failure, together with a `message`

mod routes;

pub use routes::{create_router, create_principle, get_principle, home, list_principles};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use principles_core::{ErrorKind, Fields, PrincipleService, PrincipleStore, ServiceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Greeting returned by `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to the Ahourai Project API!";

/// Message returned after a successful insert
pub const CREATED_MESSAGE: &str = "Principle added successfully.";

/// Message returned for unknown routes
pub const UNKNOWN_ROUTE_MESSAGE: &str = "Resource not found.";

/// Message returned when a known path is called with an unsupported method
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed.";

/// Application state shared by all handlers
///
/// Built once at startup and never mutated afterwards.
pub struct AppState<S> {
    pub service: PrincipleService<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S: PrincipleStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            service: PrincipleService::new(store),
        }
    }

    /// State for a process whose store connection failed
    pub fn unavailable() -> Self {
        Self {
            service: PrincipleService::unavailable(),
        }
    }

    pub fn from_option(store: Option<Arc<S>>) -> Self {
        Self {
            service: PrincipleService::from_option(store),
        }
    }
}

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Success,
    Error,
}

/// `GET /` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
    pub status: Status,
}

/// `POST /principles` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub status: Status,
    pub message: String,
    pub inserted_id: String,
}

/// `GET /principles` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub status: Status,
    pub count: usize,
    pub data: Vec<Fields>,
}

/// `GET /principles/{id}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub status: Status,
    pub data: Fields,
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

/// Route-boundary error
///
/// Wraps a [`ServiceError`]; the status code comes from its [`ErrorKind`].
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.kind().is_client_error() {
            tracing::debug!(kind = %self.kind(), message = %self.0, "Request rejected");
        } else {
            tracing::warn!(kind = %self.kind(), message = %self.0, "Request failed");
        }

        let body = ErrorResponse {
            status: Status::Error,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
