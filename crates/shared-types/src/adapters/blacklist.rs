use crate::ports::BlackListHandler;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry {
    expires_at: Instant,
    cause: String,
}

/// Blacklist whose entries expire after a fixed span.
pub struct TimeCacheBlacklist {
    span: Duration,
    entries: RwLock<HashMap<Vec<u8>, Entry>>,
}

impl TimeCacheBlacklist {
    pub fn new(span: Duration) -> Self {
        Self {
            span,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Reason recorded for a live entry.
    pub fn cause(&self, key: &[u8]) -> Option<String> {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.cause.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl BlackListHandler for TimeCacheBlacklist {
    fn add(&self, key: &[u8], cause: &str) {
        self.entries.write().insert(
            key.to_vec(),
            Entry {
                expires_at: Instant::now() + self.span,
                cause: cause.to_string(),
            },
        );
    }

    fn has(&self, key: &[u8]) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .map(|e| e.expires_at > now)
            .unwrap_or(false)
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.entries.write().retain(|_, e| e.expires_at > now);
    }
}
