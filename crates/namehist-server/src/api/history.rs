use axum::{
    extract::{Query, State},
    Extension, Json,
};
use namehist_core::AggregatedResult;
use namehist_lookup::HistoryReport;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_lookup_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct HistoryParams {
    pub username: Option<String>,
    pub id: Option<String>,
    /// Include per-provider reports in the response.
    #[serde(default)]
    pub debug: bool,
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<AggregatedResult>>, ApiError> {
    let mut result = state
        .lookup
        .aggregate(params.username.as_deref(), params.id.as_deref())
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    if !params.debug {
        result.sources.clear();
    }

    Ok(Json(ApiResponse::new(req_id.0, result)))
}

pub(super) async fn username_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<HistoryReport>>, ApiError> {
    let report = state
        .lookup
        .history(params.username.as_deref(), params.id.as_deref())
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, report)))
}
