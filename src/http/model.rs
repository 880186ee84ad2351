//! Request and response bodies

use crate::storage::UrlRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /shorten`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    /// Optional TTL; absent, zero or negative means the link never expires
    #[serde(default)]
    pub expiry_in_mins: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
}

/// Body of `GET /stats/:short_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub long_url: String,
    pub short_code: String,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            long_url: record.long_url,
            short_code: record.short_code,
            access_count: record.access_count,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
