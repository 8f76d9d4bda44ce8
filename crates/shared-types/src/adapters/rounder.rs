use crate::ports::Rounder;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Round clock derived from wall time.
#[derive(Debug, Clone)]
pub struct SystemRounder {
    genesis_unix_millis: i64,
    round_duration: Duration,
}

impl SystemRounder {
    pub fn new(genesis: SystemTime, round_duration: Duration) -> Self {
        let genesis_unix_millis = genesis
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self {
            genesis_unix_millis,
            round_duration,
        }
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

impl Rounder for SystemRounder {
    fn index(&self) -> i64 {
        let duration = self.round_duration.as_millis() as i64;
        if duration == 0 {
            return 0;
        }
        (Self::now_millis() - self.genesis_unix_millis).div_euclid(duration)
    }

    fn time_duration(&self) -> Duration {
        self.round_duration
    }
}

/// Round clock advanced explicitly.
#[derive(Debug)]
pub struct ManualRounder {
    index: AtomicI64,
    round_duration: Duration,
}

impl ManualRounder {
    pub fn new(index: i64, round_duration: Duration) -> Self {
        Self {
            index: AtomicI64::new(index),
            round_duration,
        }
    }

    pub fn set_index(&self, index: i64) {
        self.index.store(index, Ordering::SeqCst);
    }

    pub fn advance(&self, rounds: i64) -> i64 {
        self.index.fetch_add(rounds, Ordering::SeqCst) + rounds
    }
}

impl Rounder for ManualRounder {
    fn index(&self) -> i64 {
        self.index.load(Ordering::SeqCst)
    }

    fn time_duration(&self) -> Duration {
        self.round_duration
    }
}
