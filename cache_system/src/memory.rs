//! Process-local implementation of `CacheBackend`
//!
//! Used for tests and for local runs without Redis. Expired entries are
//! dropped lazily on access. The backend can be switched offline to
//! reproduce an unreachable cache.

use crate::backend::CacheBackend;
use crate::errors::CacheError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory key-value store with TTL support
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, MemoryEntry>>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every command fails until switched back online
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Whether a live (unexpired) entry exists under the fully-qualified key
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .map(|entries| entries.get(key).is_some_and(|e| !e.is_expired(now)))
            .unwrap_or(false)
    }

    /// Fully-qualified keys of every live entry, sorted
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .read()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, e)| !e.is_expired(now))
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> Result<(), CacheError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("memory backend is offline".into()));
        }
        Ok(())
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::General("memory backend lock poisoned".into())
}

/// Glob match supporting `*` (any run of characters, including none)
pub(crate) fn glob_match(pattern: &str, candidate: &str) -> bool {
    let pattern = pattern.as_bytes();
    let candidate = candidate.as_bytes();
    let (mut p, mut c) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, c));
            p += 1;
        } else if p < pattern.len() && pattern[p] == candidate[c] {
            p += 1;
            c += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            c = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.ensure_online()?;
        let now = Instant::now();

        {
            let entries = self.entries.read().map_err(poisoned)?;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it so it stops showing up in pattern scans
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        self.ensure_online()?;
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidTtl(ttl_seconds));
        }

        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        };
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        self.ensure_online()?;
        let removed = self.entries.write().map_err(poisoned)?.remove(key);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.ensure_online()?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.ensure_online()
    }
}
