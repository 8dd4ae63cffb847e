//! Axum router and all HTTP handlers for mg-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers so tests can drive the bare router.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use mg_expedition::{expedition_items, summarize, DateWindow, ExpeditionError};
use mg_schemas::{ExpeditionItem, ExpeditionSummary};
use tracing::{error, info, warn};

use crate::{
    api_types::{ErrorResponse, ExpeditionParams, HealthResponse},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/expedition", get(expedition))
        .route("/v1/expedition/summary", get(expedition_summary))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Maps [`ExpeditionError`] onto a status code and an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError(ExpeditionError);

impl From<ExpeditionError> for ApiError {
    fn from(error: ExpeditionError) -> Self {
        Self(error)
    }
}

/// A query string serde cannot shape into [`ExpeditionParams`] (for example a
/// repeated `start`) is a bad date input like any other.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ExpeditionError::InvalidDate {
            field: "query",
            value: rejection.body_text(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            warn!(code = self.0.code(), error = %self.0, "expedition request rejected");
            StatusCode::BAD_REQUEST
        } else {
            error!(code = self.0.code(), error = %self.0, "expedition query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: self.0.code().to_string(),
            }),
        )
            .into_response()
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
            config_hash: st.config_hash.clone(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/expedition
// ---------------------------------------------------------------------------

/// Scheduled deliveries in `[start, end]` with their blocked/released
/// verdicts, ordered by date then item id. Empty windows return `[]`.
pub(crate) async fn expedition(
    State(st): State<Arc<AppState>>,
    params: Result<Query<ExpeditionParams>, QueryRejection>,
) -> Result<Json<Vec<ExpeditionItem>>, ApiError> {
    let Query(params) = params?;
    let window = DateWindow::parse(params.start.as_deref(), params.end.as_deref())?;
    let items = expedition_items(st.store.as_ref(), &window).await?;

    info!(
        start = %window.start(),
        end = %window.end(),
        items = items.len(),
        blocked = items.iter().filter(|i| i.is_blocked()).count(),
        store = st.store.source_name(),
        "expedition query"
    );

    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// GET /v1/expedition/summary
// ---------------------------------------------------------------------------

pub(crate) async fn expedition_summary(
    State(st): State<Arc<AppState>>,
    params: Result<Query<ExpeditionParams>, QueryRejection>,
) -> Result<Json<ExpeditionSummary>, ApiError> {
    let Query(params) = params?;
    let window = DateWindow::parse(params.start.as_deref(), params.end.as_deref())?;
    let items = expedition_items(st.store.as_ref(), &window).await?;
    let summary = summarize(&window, &items);

    info!(
        start = %window.start(),
        end = %window.end(),
        total = summary.total,
        blocked = summary.blocked,
        "expedition summary"
    );

    Ok(Json(summary))
}
