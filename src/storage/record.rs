//! URL Record

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One shortening mapping.
///
/// Everything except `access_count` is fixed at insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    /// The original absolute URL
    pub long_url: String,
    /// The generated identifier, unique among live records
    pub short_code: String,
    /// When the record was inserted
    pub created_at: DateTime<Utc>,
    /// When the record expires (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Number of redirects served
    pub access_count: u64,
}

impl UrlRecord {
    /// Creates a record with a zero access count, created now.
    pub fn new(
        long_url: impl Into<String>,
        short_code: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            long_url: long_url.into(),
            short_code: short_code.into(),
            created_at: Utc::now(),
            expires_at,
            access_count: 0,
        }
    }

    /// Checks if this record had expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }

    /// Checks if this record has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
