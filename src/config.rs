//! Server configuration
//!
//! Every option can be given on the command line or through the environment.

use crate::codegen::{CodeStrategy, HashGenerator, SequentialGenerator};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

/// Which code generator new links use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// SHA-256 of the URL, base-62 encoded, with counter-suffix rehash on collision
    Hash,
    /// Base-62 encoded atomic counter
    Sequential,
}

impl StrategyKind {
    pub fn build(self) -> Arc<dyn CodeStrategy> {
        match self {
            StrategyKind::Hash => Arc::new(HashGenerator::default()),
            StrategyKind::Sequential => Arc::new(SequentialGenerator::new()),
        }
    }
}

/// Shorty - an in-memory URL shortener
#[derive(Debug, Clone, Parser)]
#[command(name = "shorty", version, about)]
pub struct Config {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = crate::DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = crate::DEFAULT_PORT)]
    pub port: u16,

    /// Seconds between sweeps of expired links
    #[arg(long, env = "CLEANUP_INTERVAL_SECS", default_value_t = 3600,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub cleanup_interval_secs: u64,

    /// Public prefix for short URLs (defaults to http://<Host header>)
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Code generation strategy
    #[arg(long, env = "CODE_STRATEGY", value_enum, default_value_t = StrategyKind::Hash)]
    pub strategy: StrategyKind,
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
