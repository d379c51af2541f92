use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use gsmloc_core::ProviderStatus;
use gsmloc_provider::ProviderError;
use serde::Serialize;

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct StatusData {
    status: ProviderStatus,
}

#[derive(Debug, Serialize)]
pub(super) struct ShutdownData {
    shutting_down: bool,
}

pub(super) async fn status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        req_id.0,
        StatusData {
            status: state.provider.status(),
        },
    ))
}

pub(super) async fn info(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(req_id.0, state.provider.info()))
}

pub(super) async fn position(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    match state.provider.position().await {
        Ok(position) => Ok(Json(ApiResponse::new(req_id.0, position))),
        Err(ProviderError::NotAvailable(message)) => {
            Err(ApiError::new(req_id.0, "not_available", message))
        }
        Err(e) => {
            tracing::error!(error = %e, "position request failed");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "position request failed",
            ))
        }
    }
}

pub(super) async fn shutdown(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    state.provider.shutdown();
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(
            req_id.0,
            ShutdownData {
                shutting_down: true,
            },
        )),
    )
}
