//! Closed rental period shared by listings (availability) and bookings.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Validation error raised when a period ends on or before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPeriodError;

impl std::fmt::Display for EmptyPeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "period end must be after its start")
    }
}

impl std::error::Error for EmptyPeriodError {}

/// Closed interval `[start_at, end_at]` with `start_at < end_at`.
///
/// Two periods overlap when they share at least one instant, which for rental
/// purposes means sharing at least one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "PeriodDto", into = "PeriodDto")]
pub struct RentalPeriod {
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
}

impl RentalPeriod {
    /// Validate and construct a period.
    pub fn new(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<Self, EmptyPeriodError> {
        if end_at <= start_at {
            return Err(EmptyPeriodError);
        }
        Ok(Self { start_at, end_at })
    }

    /// Period start.
    #[must_use]
    pub const fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    /// Period end.
    #[must_use]
    pub const fn end_at(&self) -> DateTime<Utc> {
        self.end_at
    }

    /// Closed-interval overlap: `a.start <= b.end && a.end >= b.start`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_at <= other.end_at && self.end_at >= other.start_at
    }

    /// Whether `other` falls entirely inside this period.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start_at <= other.start_at && other.end_at <= self.end_at
    }

    /// Number of billable rental days, rounded up, never less than one.
    #[must_use]
    pub fn billable_days(&self) -> i64 {
        let span = self.end_at - self.start_at;
        let whole_days = span.num_days();
        let days = if span > Duration::days(whole_days) {
            whole_days + 1
        } else {
            whole_days
        };
        days.max(1)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeriodDto {
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
}

impl From<RentalPeriod> for PeriodDto {
    fn from(value: RentalPeriod) -> Self {
        Self {
            start_at: value.start_at,
            end_at: value.end_at,
        }
    }
}

impl TryFrom<PeriodDto> for RentalPeriod {
    type Error = EmptyPeriodError;

    fn try_from(value: PeriodDto) -> Result<Self, Self::Error> {
        Self::new(value.start_at, value.end_at)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).single().expect("valid timestamp")
    }

    fn period(start_day: u32, end_day: u32) -> RentalPeriod {
        RentalPeriod::new(at(start_day, 12), at(end_day, 12)).expect("valid period")
    }

    #[test]
    fn rejects_empty_and_reversed_ranges() {
        assert!(RentalPeriod::new(at(5, 12), at(5, 12)).is_err());
        assert!(RentalPeriod::new(at(5, 12), at(4, 12)).is_err());
    }

    #[rstest]
    // A: 01..05, B: 03..07 -> overlap
    #[case(period(1, 5), period(3, 7), true)]
    // A: 01..05, B: 06..08 -> clear
    #[case(period(1, 5), period(6, 8), false)]
    // shared boundary instant counts as overlap (closed interval)
    #[case(period(1, 5), period(5, 8), true)]
    // containment
    #[case(period(1, 10), period(3, 4), true)]
    fn overlap_is_symmetric(
        #[case] a: RentalPeriod,
        #[case] b: RentalPeriod,
        #[case] expected: bool,
    ) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn contains_requires_full_inclusion() {
        let window = period(1, 10);
        assert!(window.contains(&period(2, 9)));
        assert!(window.contains(&period(1, 10)));
        assert!(!window.contains(&period(2, 11)));
    }

    #[rstest]
    #[case(period(1, 5), 4)]
    #[case(period(1, 2), 1)]
    fn billable_days_counts_whole_days(#[case] p: RentalPeriod, #[case] expected: i64) {
        assert_eq!(p.billable_days(), expected);
    }

    #[test]
    fn billable_days_rounds_partial_days_up() {
        let p = RentalPeriod::new(at(1, 12), at(3, 18)).expect("valid period");
        assert_eq!(p.billable_days(), 3);
    }

    #[test]
    fn billable_days_never_below_one() {
        let p = RentalPeriod::new(at(1, 12), at(1, 15)).expect("valid period");
        assert_eq!(p.billable_days(), 1);
    }

    #[test]
    fn serde_rejects_invalid_ranges() {
        let raw = serde_json::json!({
            "startAt": "2024-06-05T12:00:00Z",
            "endAt": "2024-06-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<RentalPeriod>(raw).is_err());
    }
}
