//! Service Module
//!
//! This module sits between the HTTP layer and the storage layer. It owns the
//! generate-or-reuse flow for new links and the lazy-expiry redirect path.
//!
//! ## Architecture
//!
//! ```text
//! HTTP request
//!       │
//!       ▼
//! ┌──────────────────┐
//! │ ShortenerService │  (this module)
//! │                  │
//! │  - Validate URL  │
//! │  - Generate code │
//! │  - Resolve code  │
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  MappingStore    │  (storage module)
//! └──────────────────┘
//! ```

pub mod shortener;

// Re-export the service and its result types
pub use shortener::{validate_url, Resolution, ServiceError, ShortenerService};
