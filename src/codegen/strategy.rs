//! Code Generation Strategies
//!
//! Both strategies take an `exists` predicate so they can be driven from inside
//! the store's write lock, where the predicate reads the locked code index.

use crate::codegen::encoding::{encode, encode_u64, hash, EncodingError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Length of hash-derived short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Produces a short code for a long URL that the `exists` predicate reports as unused.
pub trait CodeStrategy: Send + Sync + 'static {
    /// Generates a short code for `long_url`.
    ///
    /// `exists` must return `true` for every code that is already taken.
    fn generate(
        &self,
        long_url: &str,
        exists: &dyn Fn(&str) -> bool,
    ) -> Result<String, EncodingError>;
}

/// Derives codes from the SHA-256 hash of the URL.
///
/// On collision the input becomes `url + counter` (counter starting at 1) and is
/// rehashed, so every retry hashes a distinguishable input. There is no retry
/// cap; the codespace (62^6) is far larger than any expected number of records.
#[derive(Debug, Clone, Copy)]
pub struct HashGenerator {
    length: usize,
}

impl HashGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeStrategy for HashGenerator {
    fn generate(
        &self,
        long_url: &str,
        exists: &dyn Fn(&str) -> bool,
    ) -> Result<String, EncodingError> {
        let code = encode(&hash(long_url), self.length)?;
        if !exists(&code) {
            return Ok(code);
        }

        let mut counter: u64 = 1;
        loop {
            let candidate = encode(&hash(&format!("{}{}", long_url, counter)), self.length)?;
            if !exists(&candidate) {
                tracing::trace!(attempts = counter, code = %candidate, "Resolved short code collision");
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

/// Generates a hash-derived code of [`DEFAULT_CODE_LENGTH`] characters.
///
/// # Example
///
/// ```
/// use shorty::codegen::generate_code;
///
/// let first = generate_code("hello", |_| false).unwrap();
/// let second = generate_code("hello", |code| code == first).unwrap();
/// assert_ne!(first, second);
/// ```
pub fn generate_code<F>(long_url: &str, exists: F) -> Result<String, EncodingError>
where
    F: Fn(&str) -> bool,
{
    HashGenerator::default().generate(long_url, &exists)
}

/// Encodes an atomically incremented counter in base 62.
///
/// Codes are unique by construction within one generator. Codes that are
/// already present in the store (for example ones inserted directly) are skipped.
#[derive(Debug, Default)]
pub struct SequentialGenerator {
    counter: AtomicU64,
}

impl SequentialGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first code encodes `offset + 1`.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    /// Returns the next counter value, encoded.
    pub fn next_code(&self) -> String {
        encode_u64(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl CodeStrategy for SequentialGenerator {
    fn generate(
        &self,
        _long_url: &str,
        exists: &dyn Fn(&str) -> bool,
    ) -> Result<String, EncodingError> {
        loop {
            let code = self.next_code();
            if !exists(&code) {
                return Ok(code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate_code("https://a.example", |_| false).unwrap();
        let b = generate_code("https://a.example", |_| false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "mS4TLu");
        assert_eq!(a.len(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_collision_rehashes_with_counter_suffix() {
        let url = "https://www.example.com";
        let first = generate_code(url, |_| false).unwrap();
        assert_eq!(first, "XTA0MX");

        let second = generate_code(url, |code| code == first).unwrap();
        assert_eq!(second, encode(&hash("https://www.example.com1"), 6).unwrap());
        assert_eq!(second, "MKUN7W");

        let taken: HashSet<String> = [first.clone(), second.clone()].into();
        let third = generate_code(url, |code| taken.contains(code)).unwrap();
        assert_eq!(third, encode(&hash("https://www.example.com2"), 6).unwrap());
    }

    #[test]
    fn test_generation_loop_yields_unique_codes() {
        let mut taken = HashSet::new();
        for i in 0..500 {
            // Resubmitting two URLs forces a longer collision walk each time
            let url = if i % 2 == 0 { "https://same.example" } else { "https://other.example" };
            let code = generate_code(url, |c| taken.contains(c)).unwrap();
            assert!(taken.insert(code));
        }
        assert_eq!(taken.len(), 500);
    }

    #[test]
    fn test_custom_length() {
        let generator = HashGenerator::new(10);
        let code = generator.generate("hello", &|_| false).unwrap();
        assert_eq!(code.len(), 10);
        assert_eq!(generator.length(), 10);
    }

    #[test]
    fn test_length_beyond_digest_is_an_error() {
        let generator = HashGenerator::new(33);
        assert!(matches!(
            generator.generate("hello", &|_| false),
            Err(EncodingError::InsufficientDigest { needed: 33, available: 32 })
        ));
    }

    #[test]
    fn test_sequential_codes() {
        let generator = SequentialGenerator::new();
        assert_eq!(generator.next_code(), "1");
        assert_eq!(generator.next_code(), "2");

        let generator = SequentialGenerator::with_offset(61);
        assert_eq!(generator.next_code(), "10");
    }

    #[test]
    fn test_sequential_skips_taken_codes() {
        let generator = SequentialGenerator::new();
        let code = generator
            .generate("ignored", &|c| c == "1" || c == "2")
            .unwrap();
        assert_eq!(code, "3");
    }

    #[test]
    fn test_sequential_concurrent_uniqueness() {
        let generator = Arc::new(SequentialGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..250).map(|_| generator.next_code()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for code in handle.join().unwrap() {
                assert!(all.insert(code));
            }
        }
        assert_eq!(all.len(), 2000);
    }

    #[test]
    fn test_strategies_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HashGenerator>();
        assert_send_sync::<SequentialGenerator>();
    }
}
