//! Usage tracking module
//!
//! Per-client daily request quotas.

pub mod clock;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use tracker::{next_reset_at, Admission, DailyUsageTracker, UsageLimiter, UsageSnapshot};
