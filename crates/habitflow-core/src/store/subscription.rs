//! Explicit ledger-change subscriptions.
//!
//! Replaces ad-hoc callback globals with a registry the cache owns:
//! `subscribe` returns a handle, cancellation is synchronous and
//! idempotent, and delivery is filtered by date range.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cache::DateRange;
use crate::ledger::DayRecord;

/// One committed ledger change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDelta {
    pub date: NaiveDate,
    pub record: DayRecord,
    pub revision: u64,
}

type Callback = Box<dyn FnMut(&LedgerDelta) + Send>;

struct Subscriber {
    range: DateRange,
    callback: Callback,
    active: Arc<AtomicBool>,
}

/// Cancellation handle for one subscription.
///
/// `cancel` takes effect immediately for future deliveries and may be
/// called any number of times.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    active: Arc<AtomicBool>,
}

impl SubscriptionHandle {
    pub fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Registry of ledger-delta subscribers.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscribers: Vec<Subscriber>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for changes to dates within `range`.
    pub fn subscribe<F>(&mut self, range: DateRange, callback: F) -> SubscriptionHandle
    where
        F: FnMut(&LedgerDelta) + Send + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        self.subscribers.push(Subscriber {
            range,
            callback: Box::new(callback),
            active: Arc::clone(&active),
        });
        SubscriptionHandle { active }
    }

    /// Deliver a delta to live subscribers whose range covers its date.
    /// Cancelled subscribers are dropped on the way through.
    pub fn notify(&mut self, delta: &LedgerDelta) {
        self.subscribers
            .retain(|s| s.active.load(Ordering::SeqCst));
        for subscriber in &mut self.subscribers {
            if subscriber.range.contains(delta.date) {
                (subscriber.callback)(delta);
            }
        }
    }

    /// Live subscriber count (cancelled ones are pruned lazily).
    pub fn len(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|s| s.active.load(Ordering::SeqCst))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
