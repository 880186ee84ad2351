//! Shortener Service
//!
//! This module implements the operations the HTTP layer calls: shorten a URL,
//! resolve a code for redirecting, read statistics and delete a mapping.
//!
//! ## Flow
//!
//! ```text
//! shorten(url, ttl)                 resolve(code)
//!       │                                 │
//!       ▼                                 ▼
//!  validate URL                  store.access (one write lock)
//!       │                                 │
//!       ▼                                 ├──missing──> NotFound
//!  shorten_with ──live──> Existing        ├──expired──> removed, Expired
//!       │                                 │
//!       ▼                                 ▼
//!  strategy.generate ──> Created   access_count += 1 ──> Redirect(url)
//! ```

use crate::codegen::{CodeStrategy, EncodingError, HashGenerator};
use crate::storage::{Access, MappingStore, Shortened, UrlRecord};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Errors returned by [`ShortenerService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The submitted URL is not an absolute http(s) URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Code generation failed
    #[error("code generation failed: {0}")]
    Encoding(#[from] EncodingError),
}

/// Result of resolving a short code for a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The code is live; its access count has been incremented
    Redirect(String),
    /// The code existed but had expired; it has been removed
    Expired,
    /// No record for the code
    NotFound,
}

/// The shortening service, shared by all request handlers.
#[derive(Clone)]
pub struct ShortenerService {
    /// The mapping store
    store: Arc<MappingStore>,
    /// How new codes are generated
    strategy: Arc<dyn CodeStrategy>,
}

impl std::fmt::Debug for ShortenerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortenerService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ShortenerService {
    /// Creates a service using the hash-based code strategy.
    pub fn new(store: Arc<MappingStore>) -> Self {
        Self::with_strategy(store, Arc::new(HashGenerator::default()))
    }

    /// Creates a service with a specific code strategy.
    pub fn with_strategy(store: Arc<MappingStore>, strategy: Arc<dyn CodeStrategy>) -> Self {
        Self { store, strategy }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<MappingStore> {
        &self.store
    }

    /// Shortens `long_url`, or returns its existing code.
    ///
    /// `ttl_minutes` of `None`, zero or a negative value means the record never expires.
    pub fn shorten(
        &self,
        long_url: &str,
        ttl_minutes: Option<i64>,
    ) -> Result<Shortened, ServiceError> {
        validate_url(long_url)?;

        let expires_at = match ttl_minutes {
            Some(minutes) if minutes > 0 => expiry_from_now(minutes),
            _ => None,
        };

        let outcome = self.store.shorten_with(long_url, expires_at, |exists| {
            self.strategy.generate(long_url, exists)
        })?;

        match &outcome {
            Shortened::Created(code) => {
                info!(short_code = %code, long_url = %long_url, expires_at = ?expires_at, "Created short URL")
            }
            Shortened::Existing(code) => {
                debug!(short_code = %code, long_url = %long_url, "Reusing existing short URL")
            }
        }

        Ok(outcome)
    }

    /// Resolves a code for redirecting.
    ///
    /// A live hit increments the access count. An expired hit is deleted.
    pub fn resolve(&self, short_code: &str) -> Resolution {
        match self.store.access(short_code) {
            Access::Granted(long_url) => {
                debug!(short_code = %short_code, long_url = %long_url, "Redirecting");
                Resolution::Redirect(long_url)
            }
            Access::Expired => {
                info!(short_code = %short_code, "Removed expired short URL on access");
                Resolution::Expired
            }
            Access::Missing => Resolution::NotFound,
        }
    }

    /// Returns the live record for a code, for statistics.
    pub fn stats(&self, short_code: &str) -> Option<UrlRecord> {
        self.store
            .get_by_code(short_code)
            .filter(|record| !record.is_expired())
    }

    /// Deletes a mapping.
    ///
    /// # Returns
    ///
    /// Returns `true` if a record was removed.
    pub fn remove(&self, short_code: &str) -> bool {
        let removed = self.store.delete(short_code);
        if removed {
            info!(short_code = %short_code, "Deleted short URL");
        }
        removed
    }

    /// Removes all expired records now.
    pub fn sweep(&self) -> usize {
        self.store.sweep_expired()
    }
}

/// Converts a TTL in minutes to an absolute expiry.
///
/// A TTL too large to represent is treated as no expiry.
fn expiry_from_now(minutes: i64) -> Option<DateTime<Utc>> {
    Duration::try_minutes(minutes).and_then(|ttl| Utc::now().checked_add_signed(ttl))
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
pub fn validate_url(input: &str) -> Result<(), ServiceError> {
    let parsed = Url::parse(input).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ServiceError::InvalidUrl(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ServiceError::InvalidUrl("missing host".to_string())),
    }
}
