//! Route Handlers
//!
//! - `POST /shorten` - Create or reuse a short code
//! - `GET /stats/:short_code` - Read access statistics
//! - `GET /:short_code` - Redirect to the long URL (302)
//! - `DELETE /:short_code` - Remove a mapping

use crate::http::error::{ApiError, Result};
use crate::http::model::{ShortenRequest, ShortenResponse, StatsResponse};
use crate::http::AppState;
use crate::service::Resolution;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected shorten payload");
        ApiError::BadRequest("Invalid request payload".to_string())
    })?;

    let short_code = state
        .service
        .shorten(&request.url, request.expiry_in_mins)?
        .into_code();

    let base = state.public_base(&headers);
    Ok(Json(ShortenResponse {
        short_url: format!("{}/{}", base, short_code),
        short_code,
    }))
}

pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<StatsResponse>> {
    match state.service.stats(&short_code) {
        Some(record) => Ok(Json(record.into())),
        // Expired but not yet swept
        None if state.service.store().contains_code(&short_code) => Err(ApiError::NotFound(
            "Short URL not found or has expired".to_string(),
        )),
        None => Err(ApiError::NotFound("Short URL not found".to_string())),
    }
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response> {
    match state.service.resolve(&short_code) {
        Resolution::Redirect(long_url) => {
            Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]).into_response())
        }
        Resolution::Expired => Err(ApiError::Gone("Short URL has expired".to_string())),
        Resolution::NotFound => Err(ApiError::NotFound("Short URL not found".to_string())),
    }
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<StatusCode> {
    if state.service.remove(&short_code) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Short URL not found".to_string()))
    }
}
