//! Short Code Generation Module
//!
//! This module turns long URLs into short, printable identifiers.
//!
//! ## Pipeline
//!
//! ```text
//! long URL ──> SHA-256 ──> first N bytes ──> base-62 ──> N-char code
//!                                                          │
//!                                   taken? ──yes──> append counter, rehash
//! ```
//!
//! The primary strategy derives the code from a hash of the URL, so the same URL
//! tends toward the same code. Collisions are resolved by hashing `url + "1"`,
//! `url + "2"` and so on until a free code is found.
//!
//! [`SequentialGenerator`] is the simpler alternative: it base-62 encodes an
//! atomically incremented counter and needs no collision loop.
//!
//! ## Alphabet
//!
//! The alphabet order (`0-9`, `a-z`, `A-Z`) is a contract: any decoder must use
//! the same ordering.
//!
//! ## Example
//!
//! ```
//! use shorty::codegen::{encode, generate_code, hash};
//!
//! let digest = hash("hello");
//! assert_eq!(encode(&digest, 6).unwrap(), "3gxwti");
//!
//! // Nothing is taken, so the first candidate wins
//! let code = generate_code("hello", |_| false).unwrap();
//! assert_eq!(code, "3gxwti");
//! ```

pub mod encoding;
pub mod strategy;

pub use encoding::{encode, encode_hex, encode_u64, hash, hash_hex, EncodingError, ALPHABET};
pub use strategy::{
    generate_code, CodeStrategy, HashGenerator, SequentialGenerator, DEFAULT_CODE_LENGTH,
};
