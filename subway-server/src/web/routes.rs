//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{LineId, SectionError, StationId};
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_stations))
        .route("/stations/:id", get(get_station).delete(delete_station))
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route("/lines/:id/sections", post(add_section))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Register a station.
async fn create_station(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: StationRequest = parse_json(&body)?;
    let station = state.stations.create_station(&req.name).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/stations/{}", station.id()))],
        Json(StationResponse::from_station(&station)),
    )
        .into_response())
}

/// List all stations.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.stations.stations().await;
    Json(stations.iter().map(StationResponse::from_station).collect())
}

/// Get one station.
async fn get_station(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<StationResponse>, AppError> {
    let Path(id) = path?;
    let station = state.stations.station(StationId(id)).await?;
    Ok(Json(StationResponse::from_station(&station)))
}

/// Delete a station.
async fn delete_station(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    state.stations.delete_station(StationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a line, optionally with its first section.
async fn create_line(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: LineRequest = parse_json(&body)?;
    let new_line = req.into_new_line().map_err(|message| AppError::BadRequest {
        message: message.to_string(),
    })?;
    let line = state.lines.create_line(new_line).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/lines/{}", line.id()))],
        Json(LineResponse::from_line(&line)),
    )
        .into_response())
}

/// List all lines.
async fn list_lines(State(state): State<AppState>) -> Json<Vec<LineResponse>> {
    let lines = state.lines.lines().await;
    Json(lines.iter().map(LineResponse::from_line).collect())
}

/// Get one line with its stations in order.
async fn get_line(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<LineResponse>, AppError> {
    let Path(id) = path?;
    let line = state.lines.line(LineId(id)).await?;
    Ok(Json(LineResponse::from_line(&line)))
}

/// Edit a line's name and color.
async fn update_line(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let req: LineEditRequest = parse_json(&body)?;
    state
        .lines
        .update_line(LineId(id), &req.name, &req.color)
        .await?;
    Ok(StatusCode::OK)
}

/// Delete a line.
async fn delete_line(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    state.lines.delete_line(LineId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a section to a line.
async fn add_section(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    let req: SectionRequest = parse_json(&body)?;
    let line = state.lines.add_section(LineId(id), req.into()).await?;

    Ok((StatusCode::CREATED, Json(LineResponse::from_line(&line))).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            _ if e.is_not_found() => AppError::NotFound { message },
            ServiceError::Section(SectionError::InconsistentChain(_))
            | ServiceError::Snapshot(_) => AppError::Internal { message },
            _ => AppError::BadRequest { message },
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
