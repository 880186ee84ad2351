//! Concurrent Mapping Store
//!
//! This module implements the authoritative short code ↔ long URL mapping.
//! It keeps two indexes that must always agree with each other.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: Both indexes live behind a single `RwLock`, so no reader can
//!    observe one index updated without the other.
//! 2. **Lazy + Active Expiry**: Reads never purge. Expired records are removed on
//!    redirect (`remove_if_expired`) or by the background sweeper.
//! 3. **Atomic Shorten**: `shorten_with` runs the reuse check, the collision loop
//!    and the insert inside one write lock.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    MappingStore                      │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │                    RwLock                      │  │
//! │  │  by_code: HashMap<code, UrlRecord>             │  │
//! │  │  by_url:  HashMap<long URL, code>              │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::storage::record::UrlRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Both indexes, always mutated together.
#[derive(Debug, Default)]
struct Indexes {
    by_code: HashMap<String, UrlRecord>,
    by_url: HashMap<String, String>,
}

impl Indexes {
    /// Removes the record stored under `code` and its reverse entry.
    fn unlink_code(&mut self, code: &str) -> Option<UrlRecord> {
        let record = self.by_code.remove(code)?;
        if self.by_url.get(&record.long_url).is_some_and(|c| c == code) {
            self.by_url.remove(&record.long_url);
        }
        Some(record)
    }

    /// Removes the record that `long_url` points to and its reverse entry.
    fn unlink_url(&mut self, long_url: &str) -> Option<UrlRecord> {
        let code = self.by_url.remove(long_url)?;
        self.by_code.remove(&code)
    }

    /// Inserts `record`, first unlinking whatever occupied its code or its URL.
    fn link(&mut self, record: UrlRecord) {
        self.unlink_code(&record.short_code);
        self.unlink_url(&record.long_url);
        self.by_url
            .insert(record.long_url.clone(), record.short_code.clone());
        self.by_code.insert(record.short_code.clone(), record);
    }
}

/// Outcome of [`MappingStore::access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The record is live; its access count was incremented
    Granted(String),
    /// The record had expired and was removed
    Expired,
    /// No record for the code
    Missing,
}

/// Outcome of [`MappingStore::shorten_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new record was inserted under this code
    Created(String),
    /// The URL already had a live record with this code
    Existing(String),
}

impl Shortened {
    pub fn code(&self) -> &str {
        match self {
            Shortened::Created(code) | Shortened::Existing(code) => code,
        }
    }

    pub fn into_code(self) -> String {
        match self {
            Shortened::Created(code) | Shortened::Existing(code) => code,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Shortened::Created(_))
    }
}

/// The concurrent mapping store.
///
/// Wrap it in an `Arc` and share it between request handlers and the sweeper.
/// Every operation is synchronous and holds the lock only for an in-memory map
/// update.
///
/// # Example
///
/// ```
/// use shorty::storage::MappingStore;
///
/// let store = MappingStore::new();
/// store.add("https://a.example", "aB3xZ9", None);
///
/// let record = store.get_by_code("aB3xZ9").unwrap();
/// assert_eq!(record.long_url, "https://a.example");
/// assert_eq!(store.get_code_by_url("https://a.example").as_deref(), Some("aB3xZ9"));
///
/// store.increment_access("aB3xZ9");
/// assert_eq!(store.get_by_code("aB3xZ9").unwrap().access_count, 1);
/// ```
pub struct MappingStore {
    indexes: RwLock<Indexes>,

    /// Statistics: records inserted
    inserted_count: AtomicU64,

    /// Statistics: records removed by `delete`
    deleted_count: AtomicU64,

    /// Statistics: expired records removed (lazily or by sweep)
    expired_count: AtomicU64,

    /// Statistics: access count increments
    access_count: AtomicU64,
}

impl std::fmt::Debug for MappingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingStore")
            .field("records", &self.len())
            .field("inserted_count", &self.inserted_count.load(Ordering::Relaxed))
            .field("expired_count", &self.expired_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(Indexes::default()),
            inserted_count: AtomicU64::new(0),
            deleted_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
            access_count: AtomicU64::new(0),
        }
    }

    // Poisoning is ignored: no mutation can panic between its paired map updates.
    fn read(&self) -> RwLockReadGuard<'_, Indexes> {
        self.indexes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indexes> {
        self.indexes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or overwrites the record for `short_code`.
    ///
    /// `created_at` is set to now and `access_count` to 0. A record previously
    /// stored under `short_code`, or previously stored for `long_url`, is
    /// replaced in both indexes.
    pub fn add(
        &self,
        long_url: impl Into<String>,
        short_code: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let record = UrlRecord::new(long_url, short_code, expires_at);
        self.write().link(record);
        self.inserted_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the record for `short_code`, expired or not.
    ///
    /// Callers must check [`UrlRecord::is_expired`] and treat an expired hit as absent.
    pub fn get_by_code(&self, short_code: &str) -> Option<UrlRecord> {
        self.read().by_code.get(short_code).cloned()
    }

    /// Returns the code currently mapped to `long_url`.
    pub fn get_code_by_url(&self, long_url: &str) -> Option<String> {
        self.read().by_url.get(long_url).cloned()
    }

    /// Checks if a record is stored under `short_code` (expired or not).
    pub fn contains_code(&self, short_code: &str) -> bool {
        self.read().by_code.contains_key(short_code)
    }

    /// Removes a record from both indexes.
    ///
    /// # Returns
    ///
    /// Returns `true` if the record was deleted, `false` if it didn't exist.
    pub fn delete(&self, short_code: &str) -> bool {
        let removed = self.write().unlink_code(short_code).is_some();
        if removed {
            self.deleted_count.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Increments the access count of a record.
    ///
    /// # Returns
    ///
    /// Returns `true` if the record exists, `false` otherwise (no-op).
    pub fn increment_access(&self, short_code: &str) -> bool {
        let mut indexes = self.write();
        match indexes.by_code.get_mut(short_code) {
            Some(record) => {
                record.access_count += 1;
                self.access_count.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Follows a short code: counts the access of a live record, or removes an expired one.
    ///
    /// The expiry check and the update happen under one write lock.
    pub fn access(&self, short_code: &str) -> Access {
        let now = Utc::now();
        let mut indexes = self.write();

        let Some(record) = indexes.by_code.get_mut(short_code) else {
            return Access::Missing;
        };

        if record.is_expired_at(now) {
            indexes.unlink_code(short_code);
            self.expired_count.fetch_add(1, Ordering::Relaxed);
            return Access::Expired;
        }

        record.access_count += 1;
        self.access_count.fetch_add(1, Ordering::Relaxed);
        Access::Granted(record.long_url.clone())
    }

    /// Removes the record under `short_code` only if it has expired.
    ///
    /// The check and the removal happen under one write lock, so a record
    /// re-inserted under the same code in between is never removed.
    pub fn remove_if_expired(&self, short_code: &str) -> bool {
        let now = Utc::now();
        let mut indexes = self.write();

        let expired = indexes
            .by_code
            .get(short_code)
            .is_some_and(|record| record.is_expired_at(now));
        if expired {
            indexes.unlink_code(short_code);
            self.expired_count.fetch_add(1, Ordering::Relaxed);
        }
        expired
    }

    /// Removes every expired record from both indexes.
    ///
    /// This is called by the background expiry sweeper.
    ///
    /// # Returns
    ///
    /// Returns the number of records removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut indexes = self.write();
        let Indexes { by_code, by_url } = &mut *indexes;

        let before = by_code.len();
        by_code.retain(|code, record| {
            if !record.is_expired_at(now) {
                return true;
            }
            if by_url.get(&record.long_url).is_some_and(|c| c == code) {
                by_url.remove(&record.long_url);
            }
            false
        });

        let removed = before - by_code.len();
        if removed > 0 {
            self.expired_count
                .fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    /// Returns the live code for `long_url`, or generates and inserts a new one.
    ///
    /// The whole sequence runs under one write lock:
    ///
    /// 1. If `long_url` maps to a live record, its code is returned.
    /// 2. An expired record for `long_url` is discarded.
    /// 3. `make_code` is called with a predicate over the locked code index and
    ///    must return a code the predicate reports as unused.
    /// 4. The new record is inserted.
    ///
    /// `make_code` must not call back into the store.
    pub fn shorten_with<F, E>(
        &self,
        long_url: &str,
        expires_at: Option<DateTime<Utc>>,
        make_code: F,
    ) -> Result<Shortened, E>
    where
        F: FnOnce(&dyn Fn(&str) -> bool) -> Result<String, E>,
    {
        let now = Utc::now();
        let mut indexes = self.write();

        if let Some(code) = indexes.by_url.get(long_url).cloned() {
            let live = indexes
                .by_code
                .get(&code)
                .is_some_and(|record| !record.is_expired_at(now));
            if live {
                return Ok(Shortened::Existing(code));
            }
            indexes.unlink_url(long_url);
            self.expired_count.fetch_add(1, Ordering::Relaxed);
        }

        let code = {
            let by_code = &indexes.by_code;
            make_code(&|candidate: &str| by_code.contains_key(candidate))?
        };

        indexes.link(UrlRecord::new(long_url, code.clone(), expires_at));
        self.inserted_count.fetch_add(1, Ordering::Relaxed);
        Ok(Shortened::Created(code))
    }

    /// Returns the number of stored records, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.read().by_code.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            records: self.len(),
            inserted: self.inserted_count.load(Ordering::Relaxed),
            deleted: self.deleted_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
            accesses: self.access_count.load(Ordering::Relaxed),
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let indexes = self.read();
        assert_eq!(indexes.by_code.len(), indexes.by_url.len());
        for (url, code) in &indexes.by_url {
            let record = indexes.by_code.get(code).expect("reverse entry without record");
            assert_eq!(&record.long_url, url);
            assert_eq!(&record.short_code, code);
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Records currently stored
    pub records: usize,
    /// Total records inserted
    pub inserted: u64,
    /// Total records removed by delete
    pub deleted: u64,
    /// Total expired records removed
    pub expired: u64,
    /// Total access count increments
    pub accesses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{generate_code, EncodingError};
    use chrono::Duration;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn shorten(store: &MappingStore, url: &str) -> Shortened {
        store
            .shorten_with(url, None, |exists| generate_code(url, exists))
            .unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let store = MappingStore::new();
        store.add("https://a.example", "abc123", None);

        let record = store.get_by_code("abc123").unwrap();
        assert_eq!(record.long_url, "https://a.example");
        assert_eq!(record.short_code, "abc123");
        assert_eq!(record.access_count, 0);
        assert_eq!(
            store.get_code_by_url("https://a.example"),
            Some("abc123".to_string())
        );
        store.assert_consistent();
    }

    #[test]
    fn test_get_nonexistent() {
        let store = MappingStore::new();
        assert_eq!(store.get_by_code("missing"), None);
        assert_eq!(store.get_code_by_url("https://missing.example"), None);
        assert!(!store.contains_code("missing"));
    }

    #[test]
    fn test_add_overwrites_code() {
        let store = MappingStore::new();
        store.add("https://a.example", "abc123", None);
        store.increment_access("abc123");
        store.add("https://b.example", "abc123", None);

        let record = store.get_by_code("abc123").unwrap();
        assert_eq!(record.long_url, "https://b.example");
        assert_eq!(record.access_count, 0);
        assert_eq!(store.get_code_by_url("https://a.example"), None);
        assert_eq!(store.len(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_add_same_url_new_code_drops_old_record() {
        let store = MappingStore::new();
        store.add("https://a.example", "old", None);
        store.add("https://a.example", "new", None);

        assert_eq!(store.get_by_code("old"), None);
        assert_eq!(
            store.get_code_by_url("https://a.example").as_deref(),
            Some("new")
        );
        assert_eq!(store.len(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_delete() {
        let store = MappingStore::new();
        store.add("https://a.example", "abc123", None);

        assert!(store.delete("abc123"));
        assert_eq!(store.get_by_code("abc123"), None);
        assert_eq!(store.get_code_by_url("https://a.example"), None);
        assert!(!store.delete("abc123")); // Already deleted
        assert!(store.is_empty());
        assert_eq!(store.stats().deleted, 1);
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let store = MappingStore::new();
        assert!(!store.increment_access("missing"));
        assert!(store.is_empty());
        assert_eq!(store.stats().accesses, 0);
    }

    #[test]
    fn test_expired_record_then_sweep() {
        let store = MappingStore::new();
        let past = Utc::now() - Duration::hours(1);
        store.add("https://a.example", "aB3xZ9", Some(past));

        // Reads do not purge
        let record = store.get_by_code("aB3xZ9").unwrap();
        assert_eq!(record.access_count, 0);
        assert!(record.is_expired());

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.get_by_code("aB3xZ9"), None);
        assert_eq!(store.get_code_by_url("https://a.example"), None);
        assert_eq!(store.stats().expired, 1);
        store.assert_consistent();
    }

    #[test]
    fn test_sweep_keeps_live_records() {
        let store = MappingStore::new();
        let now = Utc::now();
        store.add("https://never.example", "never", None);
        store.add("https://later.example", "later", Some(now + Duration::hours(1)));
        store.add("https://gone1.example", "gone1", Some(now - Duration::seconds(1)));
        store.add("https://gone2.example", "gone2", Some(now - Duration::days(3)));

        assert_eq!(store.sweep_expired(), 2);
        assert_eq!(store.len(), 2);
        assert!(store.contains_code("never"));
        assert!(store.contains_code("later"));
        assert_eq!(store.sweep_expired(), 0);
        store.assert_consistent();
    }

    #[test]
    fn test_access() {
        let store = MappingStore::new();
        store.add("https://a.example", "live", None);
        store.add(
            "https://b.example",
            "soon",
            Some(Utc::now() + Duration::milliseconds(20)),
        );

        assert_eq!(
            store.access("live"),
            Access::Granted("https://a.example".to_string())
        );
        assert_eq!(store.get_by_code("live").unwrap().access_count, 1);
        assert_eq!(store.access("missing"), Access::Missing);

        std::thread::sleep(std::time::Duration::from_millis(40));
        assert_eq!(store.access("soon"), Access::Expired);
        assert_eq!(store.access("soon"), Access::Missing);
        assert_eq!(store.get_code_by_url("https://b.example"), None);

        let stats = store.stats();
        assert_eq!(stats.accesses, 1);
        assert_eq!(stats.expired, 1);
        store.assert_consistent();
    }

    #[test]
    fn test_remove_if_expired() {
        let store = MappingStore::new();
        store.add("https://a.example", "live", None);
        store.add(
            "https://b.example",
            "dead",
            Some(Utc::now() - Duration::minutes(1)),
        );

        assert!(!store.remove_if_expired("live"));
        assert!(!store.remove_if_expired("missing"));
        assert!(store.remove_if_expired("dead"));
        assert_eq!(store.get_code_by_url("https://b.example"), None);
        assert_eq!(store.len(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_shorten_round_trip() {
        let store = MappingStore::new();
        let outcome = shorten(&store, "https://a.example");

        assert!(outcome.is_created());
        assert_eq!(outcome.code(), "mS4TLu");
        let record = store.get_by_code(outcome.code()).unwrap();
        assert_eq!(record.long_url, "https://a.example");
        assert_eq!(
            store.get_code_by_url("https://a.example").as_deref(),
            Some(outcome.code())
        );
    }

    #[test]
    fn test_shorten_duplicate_submission_is_idempotent() {
        let store = MappingStore::new();
        let first = shorten(&store, "https://a.example");
        let second = shorten(&store, "https://a.example");

        assert!(first.is_created());
        assert_eq!(second, Shortened::Existing(first.code().to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_shorten_resolves_collision_with_foreign_record() {
        let store = MappingStore::new();
        // Occupy the code the URL would naturally hash to
        store.add("https://squatter.example", "mS4TLu", None);

        let outcome = shorten(&store, "https://a.example");
        assert_ne!(outcome.code(), "mS4TLu");
        assert_eq!(
            store.get_by_code("mS4TLu").unwrap().long_url,
            "https://squatter.example"
        );
        assert_eq!(store.len(), 2);
        store.assert_consistent();
    }

    #[test]
    fn test_shorten_replaces_expired_record_for_url() {
        let store = MappingStore::new();
        store.add(
            "https://a.example",
            "mS4TLu",
            Some(Utc::now() - Duration::minutes(5)),
        );

        let outcome = shorten(&store, "https://a.example");
        assert_eq!(outcome, Shortened::Created("mS4TLu".to_string()));

        let record = store.get_by_code("mS4TLu").unwrap();
        assert_eq!(record.expires_at, None);
        assert_eq!(store.len(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_shorten_propagates_generator_error() {
        let store = MappingStore::new();
        let result: Result<Shortened, EncodingError> =
            store.shorten_with("https://a.example", None, |_| Err(EncodingError::ZeroLength));

        assert_eq!(result, Err(EncodingError::ZeroLength));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MappingStore::new());
        store.add("https://a.example", "abc123", None);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.increment_access("abc123");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_by_code("abc123").unwrap().access_count, 3);
    }

    #[test]
    fn test_concurrent_shorten_same_url() {
        let store = Arc::new(MappingStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || shorten(&store, "https://race.example").into_code())
            })
            .collect();

        let codes: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(codes.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().inserted, 1);
    }

    #[test]
    fn test_concurrent_access() {
        let store = Arc::new(MappingStore::new());
        let mut handles = vec![];

        // Writers and sweepers interleaved
        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let url = format!("https://example.com/{}/{}", i, j);
                    let code = shorten(&store, &url).into_code();
                    store.increment_access(&code);
                    store.get_by_code(&code);
                    store.sweep_expired();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 1000);
        assert_eq!(store.stats().accesses, 1000);
        store.assert_consistent();
    }
}
