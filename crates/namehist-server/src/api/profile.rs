use axum::{
    extract::{Query, State},
    Extension, Json,
};
use namehist_core::ProfileInfo;
use namehist_lookup::Suggestion;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_lookup_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProfileParams {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AutocompleteData {
    suggestions: Vec<Suggestion>,
}

pub(super) async fn profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<ApiResponse<ProfileInfo>>, ApiError> {
    let profile = state
        .lookup
        .enrich(params.username.as_deref().unwrap_or_default())
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, profile)))
}

pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<AutocompleteParams>,
) -> Json<ApiResponse<AutocompleteData>> {
    let suggestions = state
        .lookup
        .suggest(params.q.as_deref().unwrap_or_default())
        .await;

    Json(ApiResponse::new(req_id.0, AutocompleteData { suggestions }))
}
