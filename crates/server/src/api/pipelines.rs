//! Pipeline API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bellhop_core::{ChainReport, NotifierReport, PipelineError};

use crate::state::AppState;

/// Request body for submitting a pipeline
#[derive(Debug, Deserialize)]
pub struct SubmitPipelineBody {
    /// Correlation id carried by all three chain stages
    pub correlation_id: String,
}

/// Response for a submitted pipeline
#[derive(Debug, Serialize)]
pub struct SubmitPipelineResponse {
    pub chain_id: String,
    pub correlation_id: String,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn submit_pipeline(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitPipelineBody>,
) -> impl IntoResponse {
    let chain = match state.orchestrator().build_chain(&body.correlation_id) {
        Ok(chain) => chain,
        Err(e @ PipelineError::Configuration(_)) => {
            return error_response(StatusCode::BAD_REQUEST, e);
        }
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    };

    let chain_id = chain.chain_id.clone();
    let correlation_id = chain.correlation_id.clone();

    match state.orchestrator().submit(chain).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(SubmitPipelineResponse {
                chain_id,
                correlation_id,
            }),
        )
            .into_response(),
        Err(e @ PipelineError::ChainExists(_)) => error_response(StatusCode::CONFLICT, e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

pub async fn list_pipelines(State(state): State<Arc<AppState>>) -> Json<Vec<ChainReport>> {
    Json(state.orchestrator().list_chains().await)
}

pub async fn get_pipeline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator().chain_report(&id).await {
        Some(report) => (StatusCode::OK, Json(report)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("chain not found: {}", id)),
    }
}

pub async fn list_notifiers(State(state): State<Arc<AppState>>) -> Json<Vec<NotifierReport>> {
    Json(state.orchestrator().notifier_reports().await)
}
