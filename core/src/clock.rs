//! Per-customer simulated calendar.
//!
//! Each customer owns one clock for the duration of their run. The clock
//! only ever moves forward, which is what guarantees the monotonic
//! transaction-date invariant: every generated event is stamped with the
//! clock's current date, and the clock advances before each transaction.

use crate::rng::CustomerRng;
use chrono::{Duration, NaiveDate, Utc};

/// Simulated onboarding happens 1–5 years in the past, in days.
const BACKDATE_MIN_DAYS: u64 = 365;
const BACKDATE_MAX_DAYS: u64 = 1825;

/// Each transaction moves the customer's timeline forward 1–30 days.
const STEP_MIN_DAYS: u64 = 1;
const STEP_MAX_DAYS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SimClock {
    current: NaiveDate,
}

impl SimClock {
    /// Start the clock at a random past date, 1–5 years before today.
    pub fn backdated(rng: &mut CustomerRng) -> Self {
        let offset = rng.next_u64_in(BACKDATE_MIN_DAYS, BACKDATE_MAX_DAYS);
        Self {
            current: Utc::now().date_naive() - Duration::days(offset as i64),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.current
    }

    /// Advance by a random 1–30 day increment. Returns the new date.
    pub fn advance(&mut self, rng: &mut CustomerRng) -> NaiveDate {
        let step = rng.next_u64_in(STEP_MIN_DAYS, STEP_MAX_DAYS);
        self.current += Duration::days(step as i64);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_one_to_five_years_back() {
        let mut rng = CustomerRng::new(99, 0);
        for _ in 0..50 {
            let clock = SimClock::backdated(&mut rng);
            let age = Utc::now().date_naive() - clock.today();
            assert!(
                (365..=1825).contains(&age.num_days()),
                "backdate {} days out of range",
                age.num_days()
            );
        }
    }

    #[test]
    fn advance_is_strictly_monotonic() {
        let mut rng = CustomerRng::new(99, 1);
        let mut clock = SimClock::backdated(&mut rng);
        let mut prev = clock.today();
        for _ in 0..200 {
            let next = clock.advance(&mut rng);
            assert!(next > prev, "clock went backwards: {prev} -> {next}");
            assert!((next - prev).num_days() <= 30);
            prev = next;
        }
    }
}
