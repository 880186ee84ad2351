//! # Shorty - An In-Memory URL Shortener
//!
//! Shorty turns long URLs into short base-62 codes and redirects visitors
//! back to the original address. Mappings live in memory and may carry an
//! expiry time.
//!
//! ## Features
//!
//! - **Deterministic Codes**: SHA-256 of the URL, base-62 encoded, with a
//!   counter-suffix rehash on collision
//! - **Idempotent Shortening**: Submitting a URL twice returns the same code
//! - **TTL Support**: Links can expire, lazily on access and by a background sweep
//! - **Async HTTP**: Built on Tokio and axum
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               Shorty                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐              │
//! │  │ HTTP Router │───>│  Handlers   │───>│ ShortenerService│              │
//! │  │   (axum)    │    │             │    │                 │              │
//! │  └─────────────┘    └─────────────┘    └───┬─────────┬───┘              │
//! │                                            │         │                  │
//! │                                            ▼         ▼                  │
//! │  ┌──────────────────────┐    ┌──────────────────────────────────────┐   │
//! │  │    CodeStrategy      │    │            MappingStore              │   │
//! │  │  HashGenerator       │    │  RwLock { code → record, url → code }│   │
//! │  │  SequentialGenerator │    └──────────────────────────────────────┘   │
//! │  └──────────────────────┘                    ▲                          │
//! │                                              │                          │
//! │                     ┌────────────────────────┴────────────────────────┐ │
//! │                     │                ExpirySweeper                    │ │
//! │                     │           (Background Tokio Task)               │ │
//! │                     └─────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use shorty::http::{router, AppState};
//! use shorty::service::ShortenerService;
//! use shorty::storage::{start_expiry_sweeper, MappingStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MappingStore::new());
//!     let _sweeper = start_expiry_sweeper(Arc::clone(&store), Duration::from_secs(3600));
//!
//!     let state = AppState::new(ShortenerService::new(store), None);
//!     let listener = TcpListener::bind("127.0.0.1:8081").await.unwrap();
//!     axum::serve(listener, router(state)).await.unwrap();
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`codegen`]: SHA-256 hashing, base-62 encoding and code strategies
//! - [`storage`]: Thread-safe mapping store with TTL support
//! - [`service`]: Shorten, resolve, stats and delete operations
//! - [`http`]: axum routes and JSON bodies
//! - [`config`]: Command-line and environment configuration
//!
//! ## Design Highlights
//!
//! ### Atomic Shortening
//!
//! The lookup for an existing code, the generation of a new one and the
//! insert all happen under a single write lock, so two concurrent requests
//! for the same URL always end up with one record.
//!
//! ### Lazy + Active Expiry
//!
//! Records with a TTL are expired in two ways:
//! 1. **Lazy**: Resolving an expired code deletes it and reports it as gone
//! 2. **Active**: A background task periodically sweeps expired records

pub mod codegen;
pub mod config;
pub mod http;
pub mod service;
pub mod storage;

// Re-export commonly used types for convenience
pub use codegen::{encode, generate_code, hash, CodeStrategy, EncodingError, HashGenerator};
pub use config::{Config, StrategyKind};
pub use http::{router, AppState};
pub use service::{Resolution, ServiceError, ShortenerService};
pub use storage::{start_expiry_sweeper, ExpirySweeper, MappingStore, UrlRecord};

/// The default port Shorty listens on
pub const DEFAULT_PORT: u16 = 8081;

/// The default host Shorty binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of Shorty
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
