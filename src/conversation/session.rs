//! Per-user session storage.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::conversation::record::ResponseRecord;
use crate::error::{IntentBotError, Result};

/// Default number of users whose last answer is remembered.
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

/// Maps a user id to that user's live [`ResponseRecord`].
///
/// At most one record exists per user; inserting replaces the old one. The
/// engine serializes access, so implementations need not be `Sync`.
pub trait SessionStore: Send {
    /// Read a user's record without touching recency.
    fn get(&self, user_id: &str) -> Option<&ResponseRecord>;

    /// Mutable access to a user's record.
    fn get_mut(&mut self, user_id: &str) -> Option<&mut ResponseRecord>;

    /// Store a record under its `user_id`, returning the one it replaced.
    fn insert(&mut self, record: ResponseRecord) -> Option<ResponseRecord>;

    /// Number of users with a live record.
    fn len(&self) -> usize;
}

/// A session store bounded by capacity; the least recently active user is
/// evicted first.
#[derive(Debug)]
pub struct LruSessionStore {
    entries: LruCache<String, ResponseRecord>,
}

impl LruSessionStore {
    /// Create a store holding at most `capacity` users.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            IntentBotError::invalid_config("session capacity must be greater than zero")
        })?;
        Ok(Self {
            entries: LruCache::new(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for LruSessionStore {
    fn default() -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(DEFAULT_SESSION_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }
}

impl SessionStore for LruSessionStore {
    fn get(&self, user_id: &str) -> Option<&ResponseRecord> {
        self.entries.peek(user_id)
    }

    fn get_mut(&mut self, user_id: &str) -> Option<&mut ResponseRecord> {
        self.entries.get_mut(user_id)
    }

    fn insert(&mut self, record: ResponseRecord) -> Option<ResponseRecord> {
        self.entries.put(record.user_id.clone(), record)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
