//! 同步等待配置

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing knobs for change submission and convergence polling.
///
/// All values are in seconds. Missing fields in a settings file fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncSettings {
    /// Lower bound (inclusive) of the randomized delay before the first poll.
    pub min_delay_secs: u64,
    /// Upper bound (exclusive) of the randomized delay before the first poll.
    pub max_delay_secs: u64,
    /// Interval between `GetChange` polls.
    pub poll_interval_secs: u64,
    /// Floor applied to the poll interval.
    pub min_timeout_secs: u64,
    /// Overall bound for the convergence wait, initial delay included.
    pub timeout_secs: u64,
    /// Wall-clock budget for retrying a submission rejected with `NoSuchHostedZone`.
    pub submit_retry_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            min_delay_secs: 10,
            max_delay_secs: 30,
            poll_interval_secs: 20,
            min_timeout_secs: 5,
            timeout_secs: 30 * 60,
            submit_retry_secs: 60,
        }
    }
}

impl SyncSettings {
    /// 修正不合法的组合：`max_delay > min_delay`，轮询间隔非零
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.max_delay_secs <= self.min_delay_secs {
            log::warn!(
                "max_delay_secs ({}) must exceed min_delay_secs ({}), adjusting",
                self.max_delay_secs,
                self.min_delay_secs
            );
            self.max_delay_secs = self.min_delay_secs + 1;
        }
        if self.poll_interval_secs == 0 {
            self.poll_interval_secs = 1;
        }
        self
    }

    /// Effective sleep between polls: `max(poll_interval, min_timeout)`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(self.min_timeout_secs))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn submit_retry_budget(&self) -> Duration {
        Duration::from_secs(self.submit_retry_secs)
    }
}
