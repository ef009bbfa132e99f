//! Daily usage tracker
//!
//! Counts admitted requests per client identifier for the current calendar
//! day. When the day changes the whole record is cleared at once.
//! The epoch check, the quota comparison and the increment all run under a
//! single mutex, so concurrent requests from one client cannot over-admit and
//! a reset cannot drop an in-flight increment.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Days, Local, NaiveDate};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Whether the request was admitted (and counted)
    pub allowed: bool,
    /// Daily quota
    pub limit: u32,
    /// Requests counted for this client in the current epoch
    pub used: u32,
    /// Epoch the decision was made in
    pub epoch: NaiveDate,
}

impl Admission {
    /// Requests left for this client today
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// Aggregate view of the current epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub epoch: NaiveDate,
    pub tracked_clients: usize,
    pub admitted_today: u64,
    pub daily_limit: u32,
}

/// Admission control keyed by an opaque client identifier
///
/// The in-process [`DailyUsageTracker`] is the only implementation today; the
/// trait keeps request handling independent of where counters live.
#[async_trait]
pub trait UsageLimiter: Send + Sync {
    /// Admit and count a request, or reject it without counting
    async fn admit(&self, client_id: &str) -> Admission;

    /// Requests counted for a client in the current epoch
    async fn usage(&self, client_id: &str) -> u32;

    /// Aggregate counters for the current epoch
    async fn snapshot(&self) -> UsageSnapshot;

    /// Daily quota
    fn limit(&self) -> u32;
}

struct UsageState {
    epoch: NaiveDate,
    counts: HashMap<String, u32>,
}

/// In-memory per-client counters with a calendar-day epoch
pub struct DailyUsageTracker {
    daily_limit: u32,
    clock: Arc<dyn Clock>,
    state: Mutex<UsageState>,
}

impl DailyUsageTracker {
    /// Create a tracker that follows the server's local calendar
    pub fn new(daily_limit: u32) -> Self {
        Self::with_clock(daily_limit, Arc::new(SystemClock))
    }

    /// Create a tracker with an explicit clock
    pub fn with_clock(daily_limit: u32, clock: Arc<dyn Clock>) -> Self {
        let epoch = clock.today();
        Self {
            daily_limit,
            clock,
            state: Mutex::new(UsageState {
                epoch,
                counts: HashMap::new(),
            }),
        }
    }

    /// Lock the state, clearing it first if the calendar day has changed
    fn current(&self) -> MutexGuard<'_, UsageState> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let today = self.clock.today();
        if state.epoch != today {
            info!(
                previous_epoch = %state.epoch,
                epoch = %today,
                cleared_clients = state.counts.len(),
                "Usage epoch rolled over"
            );
            state.counts.clear();
            state.epoch = today;
        }

        state
    }

    fn admit_now(&self, client_id: &str) -> Admission {
        let mut state = self.current();
        let epoch = state.epoch;

        let used = state.counts.get(client_id).copied().unwrap_or(0);
        if used >= self.daily_limit {
            return Admission {
                allowed: false,
                limit: self.daily_limit,
                used,
                epoch,
            };
        }

        let used = used + 1;
        state.counts.insert(client_id.to_string(), used);
        debug!(client_id = %client_id, used, limit = self.daily_limit, "Request admitted");

        Admission {
            allowed: true,
            limit: self.daily_limit,
            used,
            epoch,
        }
    }
}

#[async_trait]
impl UsageLimiter for DailyUsageTracker {
    async fn admit(&self, client_id: &str) -> Admission {
        self.admit_now(client_id)
    }

    async fn usage(&self, client_id: &str) -> u32 {
        self.current().counts.get(client_id).copied().unwrap_or(0)
    }

    async fn snapshot(&self) -> UsageSnapshot {
        let state = self.current();
        UsageSnapshot {
            epoch: state.epoch,
            tracked_clients: state.counts.len(),
            admitted_today: state.counts.values().map(|&c| u64::from(c)).sum(),
            daily_limit: self.daily_limit,
        }
    }

    fn limit(&self) -> u32 {
        self.daily_limit
    }
}

/// Local midnight that ends the given epoch
pub fn next_reset_at(epoch: NaiveDate) -> Option<DateTime<Local>> {
    epoch
        .checked_add_days(Days::new(1))?
        .and_hms_opt(0, 0, 0)?
        .and_local_timezone(Local)
        .earliest()
}
