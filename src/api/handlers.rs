use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::services::{home, BannerSlide, DetailOverlay, RowKind, RowRender};

use super::AppState;

// Response types

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub banner: Option<BannerSlide>,
    pub rows: Vec<HomeRow>,
}

#[derive(Debug, Serialize)]
pub struct HomeRow {
    pub row: RowKind,
    #[serde(flatten)]
    pub render: RowRender,
}

/// `200` with the body, or `204` when there is nothing to show
fn json_or_no_content<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn parse_row(slug: &str) -> AppResult<RowKind> {
    RowKind::from_slug(slug).ok_or_else(|| AppError::NotFound(format!("Unknown row '{}'", slug)))
}

fn parse_item_id(raw: &str) -> AppResult<u64> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("Item id '{}' is not a number", raw)))
}

fn not_loaded(kind: RowKind) -> AppError {
    AppError::NotFound(format!("Row '{}' has not been loaded", kind.slug()))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Landing page: refetches every row and returns them with the current banner slide
pub async fn landing_page(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<HomeResponse> {
    let loaded = home::load_rows(state.catalog.as_ref()).await;

    let rows = {
        let mut stored = state.rows.write().await;
        stored.clear();
        let mut rows = Vec::new();
        for (kind, view) in loaded {
            if let Some(render) = view.render(&state.images) {
                rows.push(HomeRow { row: kind, render });
            }
            stored.insert(kind, view);
        }
        rows
    };

    let banner = state.banner.slide().await;

    tracing::info!(
        request_id = %request_id,
        rows = rows.len(),
        banner = banner.is_some(),
        "Landing page rendered"
    );

    Json(HomeResponse { banner, rows })
}

/// Current banner slide
pub async fn get_banner(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.slide().await)
}

pub async fn banner_next(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.next().await)
}

pub async fn banner_prev(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.prev().await)
}

/// Pointer entered the banner; pauses rotation
pub async fn banner_hover_start(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.hover_start().await)
}

/// Pointer left the banner; resumes rotation
pub async fn banner_hover_end(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.hover_end().await)
}

/// Looks up and opens the trailer for the current banner item
pub async fn play_trailer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let overlay = state.banner.play_trailer().await;

    tracing::info!(
        request_id = %request_id,
        found = overlay.is_some(),
        "Trailer lookup completed"
    );

    json_or_no_content(overlay)
}

pub async fn close_trailer(State(state): State<AppState>) -> StatusCode {
    state.banner.close_trailer().await;
    StatusCode::NO_CONTENT
}

pub async fn get_banner_info(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.info().await)
}

pub async fn open_banner_info(State(state): State<AppState>) -> Response {
    json_or_no_content(state.banner.open_info().await)
}

pub async fn close_banner_info(State(state): State<AppState>) -> StatusCode {
    state.banner.close_info().await;
    StatusCode::NO_CONTENT
}

/// Selects a thumbnail in a row and returns its detail overlay
pub async fn select_item(
    State(state): State<AppState>,
    Path((row, id)): Path<(String, String)>,
) -> AppResult<Json<DetailOverlay>> {
    let kind = parse_row(&row)?;
    let id = parse_item_id(&id)?;
    let mut rows = state.rows.write().await;
    let view = rows.get_mut(&kind).ok_or_else(|| not_loaded(kind))?;

    Ok(Json(view.select(id)?))
}

/// Detail overlay of the row's selected item, `204` when nothing is selected
pub async fn get_selection(
    State(state): State<AppState>,
    Path(row): Path<String>,
) -> AppResult<Response> {
    let kind = parse_row(&row)?;
    let rows = state.rows.read().await;
    let view = rows.get(&kind).ok_or_else(|| not_loaded(kind))?;
    Ok(json_or_no_content(view.detail()))
}

/// Closes the row's detail overlay
pub async fn dismiss_selection(
    State(state): State<AppState>,
    Path(row): Path<String>,
) -> AppResult<StatusCode> {
    let kind = parse_row(&row)?;
    let mut rows = state.rows.write().await;
    rows.get_mut(&kind).ok_or_else(|| not_loaded(kind))?.dismiss();
    Ok(StatusCode::NO_CONTENT)
}
