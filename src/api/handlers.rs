use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CatalogSection, CatalogView, MovieStatus, StatusCounts},
    services::{
        presentation::Notice,
        sync::{LoadReport, StatusChange},
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize, Default)]
pub struct ViewQuery {
    /// Overrides the stored toggle for this read only
    pub hide_special_screenings: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Status the caller believes the movie is in
    pub from: MovieStatus,
    pub status: MovieStatus,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FilterSetting {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnchorRequest {
    pub code: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All sections plus the counts line
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<CatalogView> {
    Json(state.controller.view(query.hide_special_screenings))
}

/// One status section
pub async fn get_section(
    State(state): State<AppState>,
    Path(status): Path<u8>,
    Query(query): Query<ViewQuery>,
) -> AppResult<Json<CatalogSection>> {
    let status = MovieStatus::try_from(status).map_err(AppError::InvalidInput)?;
    Ok(Json(
        state
            .controller
            .section(status, query.hide_special_screenings),
    ))
}

pub async fn get_counts(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<StatusCounts> {
    Json(state.controller.counts(query.hide_special_screenings))
}

/// Runs the load protocol
pub async fn refresh(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<LoadReport> {
    tracing::info!(request_id = %request_id, "Manual refresh requested");
    Json(state.controller.load().await)
}

/// Runs the status-change protocol
///
/// A remote refusal still answers 200 with a `rolled_back` outcome; only a stale
/// request (404) or a no-op change (400) is an error.
pub async fn change_status(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(code): Path<String>,
    Json(request): Json<ChangeStatusRequest>,
) -> AppResult<Json<StatusChange>> {
    tracing::info!(
        request_id = %request_id,
        code = %code,
        from = %request.from,
        to = %request.status,
        "Status change requested"
    );

    let outcome = state
        .controller
        .change_status(&code, request.from, request.status)
        .await?;
    Ok(Json(outcome))
}

pub async fn set_hide_special_screenings(
    State(state): State<AppState>,
    Json(setting): Json<FilterSetting>,
) -> Json<FilterSetting> {
    state.controller.set_hide_special_screenings(setting.enabled);
    Json(FilterSetting {
        enabled: state.controller.hide_special_screenings(),
    })
}

/// Records the movie the renderer is scrolled to
pub async fn set_anchor(
    State(state): State<AppState>,
    Json(request): Json<AnchorRequest>,
) -> StatusCode {
    state.board.set_anchor(request.code);
    StatusCode::NO_CONTENT
}

pub async fn get_notices(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.board.notices())
}
