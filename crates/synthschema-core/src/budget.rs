//! Local request budget for external authoring calls.

use chrono::{NaiveDate, Utc};
use log::debug;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

const MINUTE: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct BudgetState {
    recent: VecDeque<Instant>,
    day: NaiveDate,
    day_count: u32,
}

/// Sliding per-minute window plus a per-calendar-day (UTC) counter.
#[derive(Debug)]
pub struct CallBudget {
    per_minute: Option<u32>,
    per_day: Option<u32>,
    state: Mutex<BudgetState>,
}

impl CallBudget {
    /// `None` disables the corresponding limit.
    pub fn new(per_minute: Option<u32>, per_day: Option<u32>) -> Self {
        Self {
            per_minute,
            per_day,
            state: Mutex::new(BudgetState {
                recent: VecDeque::new(),
                day: Utc::now().date_naive(),
                day_count: 0,
            }),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Reserve one call, or explain why none is available.
    pub fn try_acquire(&self) -> Result<(), String> {
        let now = Instant::now();
        let today = Utc::now().date_naive();
        let mut state = self.state.lock();

        if today != state.day {
            state.day = today;
            state.day_count = 0;
        }
        while state
            .recent
            .front()
            .is_some_and(|at| now.duration_since(*at) >= MINUTE)
        {
            state.recent.pop_front();
        }

        if let Some(limit) = self.per_day {
            if state.day_count >= limit {
                return Err(format!(
                    "daily limit of {limit} authoring requests reached; try again tomorrow"
                ));
            }
        }
        if let Some(limit) = self.per_minute {
            if state.recent.len() >= limit as usize {
                return Err(format!(
                    "limit of {limit} authoring requests per minute reached; wait before retrying"
                ));
            }
        }

        state.recent.push_back(now);
        state.day_count += 1;
        debug!(
            "authoring call reserved (minute_count={}, day_count={})",
            state.recent.len(),
            state.day_count
        );
        Ok(())
    }
}

impl Default for CallBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn minute_window_slides() {
        let budget = CallBudget::new(Some(2), None);
        assert!(budget.try_acquire().is_ok());
        assert!(budget.try_acquire().is_ok());
        let err = budget.try_acquire().expect_err("throttled");
        assert!(err.contains("per minute"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(budget.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn daily_limit_outlasts_the_minute_window() {
        let budget = CallBudget::new(None, Some(1));
        assert!(budget.try_acquire().is_ok());
        tokio::time::advance(Duration::from_secs(120)).await;
        let err = budget.try_acquire().expect_err("throttled");
        assert!(err.contains("daily"));
    }

    #[test]
    fn unlimited_never_throttles() {
        let budget = CallBudget::unlimited();
        for _ in 0..500 {
            assert!(budget.try_acquire().is_ok());
        }
    }
}
