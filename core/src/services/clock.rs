//! Time source abstraction.
//!
//! Every time-dependent check reads the current time through [`Clock`] so
//! expiry, rotation and pruning can be driven deterministically in tests.
//!
//! Besides wall time a clock hands out stamps: strictly increasing
//! microsecond instants. Token issuance and subject revocation both take a
//! stamp, which orders the two events even within the same second.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

pub use crate::domain::entities::token::MICROS_PER_SEC;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current Unix time in microseconds
    fn now_micros(&self) -> i64;

    /// Next stamp, greater than every stamp this clock returned before
    fn stamp(&self) -> i64;

    /// Current Unix time in whole seconds
    fn now(&self) -> i64 {
        self.now_micros().div_euclid(MICROS_PER_SEC)
    }
}

/// Last stamp handed out by a clock
#[derive(Debug, Default)]
struct StampSequence {
    last: AtomicI64,
}

impl StampSequence {
    fn next(&self, now_micros: i64) -> i64 {
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let next = now_micros.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

/// Wall clock
#[derive(Debug, Default)]
pub struct SystemClock {
    stamps: StampSequence,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_micros(&self) -> i64 {
        Utc::now().timestamp_micros()
    }

    fn stamp(&self) -> i64 {
        self.stamps.next(self.now_micros())
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
    stamps: StampSequence,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
            stamps: StampSequence::default(),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> i64 {
        self.now.load(Ordering::SeqCst) * MICROS_PER_SEC
    }

    fn stamp(&self) -> i64 {
        self.stamps.next(self.now_micros())
    }
}
