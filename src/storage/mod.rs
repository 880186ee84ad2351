//! Storage Module
//!
//! This module provides the mapping store for Shorty: a thread-safe
//! bidirectional index between short codes and URL records, plus a
//! background expiry sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MappingStore                           │
//! │        RwLock { code → UrlRecord, long URL → code }         │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │ sweep_expired()
//!              ┌─────────────┴─────────────┐
//!              │     ExpirySweeper         │
//!              │  (Background Tokio Task)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **RwLock**: Multiple concurrent readers, exclusive writers
//! - **Consistent Indexes**: Both indexes change in the same critical section
//! - **TTL Support**: Records can carry an absolute expiry time
//! - **Active Expiry**: Background sweeper removes expired records
//!
//! ## Example
//!
//! ```
//! use shorty::storage::MappingStore;
//! use chrono::{Duration, Utc};
//!
//! let store = MappingStore::new();
//! store.add("https://a.example", "aB3xZ9", Some(Utc::now() - Duration::hours(1)));
//!
//! // Still physically present until swept
//! assert_eq!(store.get_by_code("aB3xZ9").unwrap().access_count, 0);
//!
//! assert_eq!(store.sweep_expired(), 1);
//! assert!(store.get_by_code("aB3xZ9").is_none());
//! ```

pub mod expiry;
pub mod record;
pub mod store;

// Re-export commonly used types
pub use expiry::{start_expiry_sweeper, ExpiryConfig, ExpirySweeper};
pub use record::UrlRecord;
pub use store::{Access, MappingStore, Shortened, StoreStats};
