//! # Token Bucket Antiflood
//!
//! One token bucket per originating peer. Buckets live in an LRU bounded
//! to `max_tracked_peers`; a peer pushed out starts again with a full bucket.
//!
//! ## Algorithm
//!
//! - Tokens are added at a fixed rate
//! - Each message consumes one token from its sender's bucket
//! - Messages are rejected when the bucket is empty

use crate::domain::P2pMessage;
use crate::error::{InterceptorError, InterceptorResult};
use crate::ports::AntifloodHandler;
use lru::LruCache;
use parking_lot::Mutex;
use shared_types::PeerId;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Token bucket.
pub struct TokenBucket {
    /// Maximum tokens in bucket.
    capacity: u64,
    /// Tokens to add per second.
    refill_rate: u64,
    tokens: AtomicU64,
    last_refill: Mutex<Instant>,
}

impl TokenBucket {
    pub fn new(capacity: u64, refill_rate: u64) -> Self {
        Self {
            capacity,
            refill_rate,
            tokens: AtomicU64::new(capacity),
            last_refill: Mutex::new(Instant::now()),
        }
    }

    /// Returns `true` if a token was taken.
    pub fn try_acquire(&self) -> bool {
        self.refill();

        loop {
            let current = self.tokens.load(Ordering::Relaxed);
            if current == 0 {
                return false;
            }

            if self
                .tokens
                .compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    fn refill(&self) {
        let mut last = self.last_refill.lock();
        let now = Instant::now();
        let tokens_to_add =
            (now.duration_since(*last).as_secs_f64() * self.refill_rate as f64) as u64;

        if tokens_to_add > 0 {
            *last = now;

            loop {
                let current = self.tokens.load(Ordering::Relaxed);
                let new_value = current.saturating_add(tokens_to_add).min(self.capacity);

                if self
                    .tokens
                    .compare_exchange(current, new_value, Ordering::SeqCst, Ordering::Relaxed)
                    .is_ok()
                {
                    break;
                }
            }
        }
    }

    pub fn available(&self) -> u64 {
        self.refill();
        self.tokens.load(Ordering::Relaxed)
    }
}

const DEFAULT_MAX_TRACKED_PEERS: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Charges both the originator and the connected peer that relayed the
/// message.
pub struct TokenBucketAntiflood {
    capacity: u64,
    refill_rate: u64,
    buckets: Mutex<LruCache<Vec<u8>, TokenBucket>>,
}

impl TokenBucketAntiflood {
    pub fn new(capacity: u64, refill_rate: u64) -> Self {
        Self::with_max_tracked_peers(capacity, refill_rate, DEFAULT_MAX_TRACKED_PEERS)
    }

    pub fn with_max_tracked_peers(
        capacity: u64,
        refill_rate: u64,
        max_tracked_peers: NonZeroUsize,
    ) -> Self {
        Self {
            capacity,
            refill_rate,
            buckets: Mutex::new(LruCache::new(max_tracked_peers)),
        }
    }

    /// Peers currently holding a bucket.
    pub fn tracked_peers(&self) -> usize {
        self.buckets.lock().len()
    }

    fn charge(&self, peer: &PeerId) -> InterceptorResult<()> {
        let mut buckets = self.buckets.lock();
        let bucket = buckets.get_or_insert(peer.as_bytes().to_vec(), || {
            TokenBucket::new(self.capacity, self.refill_rate)
        });
        if bucket.try_acquire() {
            Ok(())
        } else {
            Err(InterceptorError::Flooded {
                reason: format!("peer {} over its message rate", peer.pretty()),
            })
        }
    }
}

impl AntifloodHandler for TokenBucketAntiflood {
    fn can_process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> InterceptorResult<()> {
        self.charge(from_connected_peer)?;
        if &message.peer != from_connected_peer {
            self.charge(&message.peer)?;
        }
        Ok(())
    }
}
