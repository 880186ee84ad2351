//! HTTP Module
//!
//! This module exposes the shortener service over HTTP with axum.
//!
//! ## Routes
//!
//! ```text
//! POST   /shorten              {"url": "...", "expiry_in_mins": 10}
//!                              -> 200 {"short_url": "...", "short_code": "..."}
//! GET    /stats/:short_code    -> 200 stats | 404
//! GET    /:short_code          -> 302 Location | 404 | 410
//! DELETE /:short_code          -> 204 | 404
//! ```
//!
//! Errors are returned as `{"error": "<message>"}`.

pub mod error;
pub mod handlers;
pub mod model;

use crate::service::ShortenerService;
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::{delete_handler, redirect_handler, shorten_handler, stats_handler};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    service: ShortenerService,
    /// Public prefix for short URLs; falls back to `http://<Host>`
    base_url: Option<String>,
}

impl AppState {
    pub fn new(service: ShortenerService, base_url: Option<String>) -> Self {
        Self {
            service,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    pub fn service(&self) -> &ShortenerService {
        &self.service
    }

    /// Returns the prefix short URLs are built on, without a trailing slash.
    fn public_base(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.base_url {
            return base.clone();
        }
        headers
            .get(header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(|host| format!("http://{}", host))
            .unwrap_or_default()
    }
}

/// Builds the router with all routes and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/:short_code", get(stats_handler))
        .route("/:short_code", get(redirect_handler).delete(delete_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
