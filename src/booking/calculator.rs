use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Days in a billing month
pub const DAYS_PER_MONTH: u64 = 30;

/// Duration and cost of a proposed stay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub duration_days: u32,
    pub total_amount: u64,
}

impl BookingQuote {
    /// Stay length in billing months
    pub fn approx_months(&self) -> f64 {
        f64::from(self.duration_days) / DAYS_PER_MONTH as f64
    }
}

/// Price a stay at `monthly_rate` per 30 days, rounding up to a whole unit
///
/// Empty or inverted ranges are rejected with
/// [`BookingError::InvalidDateRange`].
pub fn compute_booking(
    check_in: NaiveDate,
    check_out: NaiveDate,
    monthly_rate: u32,
) -> Result<BookingQuote, BookingError> {
    let days = (check_out - check_in).num_days();
    let duration_days = u32::try_from(days)
        .ok()
        .filter(|d| *d > 0)
        .ok_or(BookingError::InvalidDateRange {
            check_in,
            check_out,
        })?;

    let total_amount = (u64::from(duration_days) * u64::from(monthly_rate)).div_ceil(DAYS_PER_MONTH);

    Ok(BookingQuote {
        duration_days,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn exactly_one_month() {
        let quote = compute_booking(date("2025-01-01"), date("2025-01-31"), 9000).unwrap();
        assert_eq!(quote.duration_days, 30);
        assert_eq!(quote.total_amount, 9000);
        assert!((quote.approx_months() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn half_month() {
        let quote = compute_booking(date("2025-01-01"), date("2025-01-16"), 9000).unwrap();
        assert_eq!(quote.duration_days, 15);
        assert_eq!(quote.total_amount, 4500);
    }

    #[test]
    fn partial_units_round_up() {
        // 1 day of 8000/month is 266.67
        let quote = compute_booking(date("2025-03-01"), date("2025-03-02"), 8000).unwrap();
        assert_eq!(quote.total_amount, 267);
    }

    #[test]
    fn inverted_range_is_invalid() {
        let err = compute_booking(date("2025-02-10"), date("2025-02-01"), 5000).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDateRange { .. }));
    }

    proptest! {
        #[test]
        fn zero_length_stay_is_invalid(offset in 0i64..20_000, rate in 1u32..1_000_000) {
            let d = date("2000-01-01") + chrono::Duration::days(offset);
            prop_assert!(compute_booking(d, d, rate).is_err());
        }

        #[test]
        fn total_never_undercharges(days in 1i64..2000, rate in 1u32..100_000) {
            let start = date("2025-01-01");
            let quote = compute_booking(start, start + chrono::Duration::days(days), rate).unwrap();
            let exact = days as f64 * f64::from(rate) / 30.0;
            prop_assert_eq!(i64::from(quote.duration_days), days);
            prop_assert!(quote.total_amount as f64 >= exact - 1e-6);
            prop_assert!((quote.total_amount as f64) < exact + 1.0);
        }
    }
}
