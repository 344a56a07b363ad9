//! Route definitions for the principles API
//!
//! - GET  /                 - Service greeting, no store access
//! - POST /principles       - Create a principle
//! - GET  /principles       - List every principle
//! - GET  /principles/:id   - Fetch one principle
//!
//! Unknown paths fall through to a JSON 404 and unsupported methods on known
//! paths get a JSON 405.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use principles_core::error::INVALID_ID_MESSAGE;
use principles_core::{PrincipleStore, ServiceError};
use tower_http::trace::TraceLayer;

use super::{
    ApiError, AppState, CreatedResponse, ErrorResponse, HomeResponse, ItemResponse,
    ListResponse, Status, CREATED_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE, UNKNOWN_ROUTE_MESSAGE,
    WELCOME_MESSAGE,
};

/// Create the router with all routes
pub fn create_router<S: PrincipleStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(home).fallback(method_not_allowed))
        .route(
            "/principles",
            get(list_principles::<S>)
                .post(create_principle::<S>)
                .fallback(method_not_allowed),
        )
        .route(
            "/principles/:id",
            get(get_principle::<S>).fallback(method_not_allowed),
        )
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Service greeting
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: WELCOME_MESSAGE.to_string(),
        status: Status::Running,
    })
}

/// POST /principles - Create a principle
///
/// The raw body is taken so that availability is checked before parsing
/// and malformed JSON is reported in the standard error envelope.
pub async fn create_principle<S: PrincipleStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let inserted_id = state.service.create(&body).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            status: Status::Success,
            message: CREATED_MESSAGE.to_string(),
            inserted_id,
        }),
    ))
}

/// GET /principles - List every principle
pub async fn list_principles<S: PrincipleStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<ListResponse>, ApiError> {
    let data = state.service.list().await?;

    Ok(Json(ListResponse {
        status: Status::Success,
        count: data.len(),
        data,
    }))
}

/// GET /principles/:id - Fetch one principle
///
/// A segment that does not decode to UTF-8 can never be a valid identifier
/// and is reported like any other malformed id.
pub async fn get_principle<S: PrincipleStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => {
            state.service.ensure_available()?;
            tracing::debug!(error = %rejection, "Rejected principle id");
            return Err(ServiceError::validation(INVALID_ID_MESSAGE).into());
        }
    };
    let data = state.service.get(&id).await?;

    Ok(Json(ItemResponse {
        status: Status::Success,
        data,
    }))
}

async fn unknown_route() -> ApiError {
    ApiError(ServiceError::not_found(UNKNOWN_ROUTE_MESSAGE))
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            status: Status::Error,
            message: METHOD_NOT_ALLOWED_MESSAGE.to_string(),
        }),
    )
}
