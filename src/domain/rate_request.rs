//! Validated day-count requests and the date window they cover.

use chrono::{Days, NaiveDate};

use crate::error::RelayError;

/// Upper bound on the day count accepted by batch lookups.
pub const BATCH_MAX_DAYS: u32 = 10;

/// Which caller issued a lookup, and therefore which failure policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// One-shot lookup (CLI, HTTP). Any failed date aborts the whole lookup.
    Batch,
    /// WebSocket `exchange` command. A failed date is reported unavailable.
    Live,
}

/// A validated request for the last `days` calendar days of rates.
///
/// The window is `[today, today - days + 1]`, one calendar day per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRequest {
    days: u32,
    mode: LookupMode,
}

impl RateRequest {
    /// Builds a batch request, accepting `1..=BATCH_MAX_DAYS`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] when `days` is out of range.
    pub fn batch(days: i64) -> Result<Self, RelayError> {
        Self::validated(days, BATCH_MAX_DAYS, LookupMode::Batch)
    }

    /// Builds a live request, accepting `1..=max_days`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] when `days` is out of range.
    pub fn live(days: i64, max_days: u32) -> Result<Self, RelayError> {
        Self::validated(days, max_days, LookupMode::Live)
    }

    fn validated(days: i64, max_days: u32, mode: LookupMode) -> Result<Self, RelayError> {
        match u32::try_from(days) {
            Ok(days) if (1..=max_days).contains(&days) => Ok(Self { days, mode }),
            _ => Err(RelayError::Validation(format!(
                "days must be between 1 and {max_days}, got {days}"
            ))),
        }
    }

    /// Number of days covered.
    #[must_use]
    pub const fn days(&self) -> u32 {
        self.days
    }

    /// Failure policy for this request.
    #[must_use]
    pub const fn mode(&self) -> LookupMode {
        self.mode
    }

    /// Dates covered by the window ending at `today`, newest first.
    #[must_use]
    pub fn dates_from(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..self.days)
            .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
            .collect()
    }

    /// Dates covered by the window ending at the local wall-clock date.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.dates_from(chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 3, 2) else {
            panic!("valid date");
        };
        date
    }

    #[test]
    fn batch_accepts_one_through_ten() {
        for days in 1..=10 {
            let Ok(request) = RateRequest::batch(days) else {
                panic!("{days} should be accepted");
            };
            assert_eq!(i64::from(request.days()), days);
            assert_eq!(request.mode(), LookupMode::Batch);
        }
    }

    #[test]
    fn batch_rejects_out_of_range() {
        for days in [-5, 0, 11, 365, i64::MAX] {
            assert!(
                matches!(RateRequest::batch(days), Err(RelayError::Validation(_))),
                "{days} should be rejected"
            );
        }
    }

    #[test]
    fn live_uses_configured_bound() {
        assert!(RateRequest::live(30, 30).is_ok());
        assert!(RateRequest::live(31, 30).is_err());
        assert!(RateRequest::live(0, 30).is_err());
    }

    #[test]
    fn window_steps_back_one_day_at_a_time() {
        for days in 1..=10 {
            let Ok(request) = RateRequest::batch(days) else {
                panic!("valid request");
            };
            let dates = request.dates_from(today());
            assert_eq!(dates.len() as i64, days);
            assert_eq!(dates.first(), Some(&today()));
            for pair in dates.windows(2) {
                let [newer, older] = pair else {
                    panic!("windows(2) yields pairs");
                };
                assert_eq!(newer.signed_duration_since(*older).num_days(), 1);
            }
        }
    }

    #[test]
    fn window_crosses_month_boundary() {
        let Ok(request) = RateRequest::batch(3) else {
            panic!("valid request");
        };
        let dates: Vec<String> = request
            .dates_from(today())
            .into_iter()
            .map(crate::domain::format_date)
            .collect();
        assert_eq!(dates, vec!["02.03.2026", "01.03.2026", "28.02.2026"]);
    }
}
