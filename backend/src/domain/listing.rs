//! Rental listing aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::period::{EmptyPeriodError, RentalPeriod};
use crate::domain::user::UserId;

/// Validation errors raised by [`Listing::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    /// The title is empty after trimming.
    EmptyTitle,
    /// The title exceeds [`TITLE_MAX`] characters.
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The per-day price is zero or negative.
    NonPositivePrice,
    /// The availability window is empty or reversed.
    InvalidAvailability,
    /// The category string matches no known category.
    UnknownCategory,
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::NonPositivePrice => write!(f, "price must be positive"),
            Self::InvalidAvailability => {
                write!(f, "availability window must end after it starts")
            }
            Self::UnknownCategory => write!(f, "category must be gear, vehicle, or room"),
        }
    }
}

impl std::error::Error for ListingValidationError {}

impl From<EmptyPeriodError> for ListingValidationError {
    fn from(_: EmptyPeriodError) -> Self {
        Self::InvalidAvailability
    }
}

/// Maximum allowed length for a listing title.
pub const TITLE_MAX: usize = 128;

/// Kind of item a listing offers for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Touring gear: tents, panniers, stoves.
    Gear,
    /// Vehicles: motorbikes, camper vans, bicycles.
    Vehicle,
    /// Rooms and other overnight stays.
    Room,
}

impl Category {
    /// Stable string form used in persistence and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gear => "gear",
            Self::Vehicle => "vehicle",
            Self::Room => "room",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = ListingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gear" => Ok(Self::Gear),
            "vehicle" => Ok(Self::Vehicle),
            "room" => Ok(Self::Room),
            _ => Err(ListingValidationError::UnknownCategory),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated listing fields used to construct a [`Listing`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    /// Stable listing identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner: UserId,
    /// Short item title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Item category.
    pub category: Category,
    /// Per-day price in minor currency units.
    pub price_cents: i64,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// Free-text location.
    pub location: String,
    /// Window in which the item may be booked.
    pub availability: RentalPeriod,
}

/// A rentable item owned by a user.
///
/// ## Invariants
/// - `title` is non-empty and at most [`TITLE_MAX`] characters.
/// - `price_cents` is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    id: Uuid,
    owner: UserId,
    title: String,
    description: String,
    category: Category,
    price_cents: i64,
    images: Vec<String>,
    location: String,
    availability: RentalPeriod,
}

impl Listing {
    /// Validate and construct a listing from a draft.
    pub fn new(draft: ListingDraft) -> Result<Self, ListingValidationError> {
        let ListingDraft {
            id,
            owner,
            title,
            description,
            category,
            price_cents,
            images,
            location,
            availability,
        } = draft;

        if title.trim().is_empty() {
            return Err(ListingValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ListingValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if price_cents <= 0 {
            return Err(ListingValidationError::NonPositivePrice);
        }

        Ok(Self {
            id,
            owner,
            title,
            description,
            category,
            price_cents,
            images,
            location,
            availability,
        })
    }

    /// Stable listing identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Short item title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Item category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Per-day price in minor currency units.
    #[must_use]
    pub const fn price_cents(&self) -> i64 {
        self.price_cents
    }

    /// Ordered image URLs.
    #[must_use]
    pub fn images(&self) -> &[String] {
        self.images.as_slice()
    }

    /// Free-text location.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Window in which the item may be booked.
    #[must_use]
    pub const fn availability(&self) -> RentalPeriod {
        self.availability
    }

    /// Expected total for renting over `period`, in minor currency units.
    #[must_use]
    pub fn quote_cents(&self, period: &RentalPeriod) -> i64 {
        self.price_cents.saturating_mul(period.billable_days())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::TimeZone;
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn availability() -> RentalPeriod {
        let from = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("valid timestamp");
        let until = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).single().expect("valid timestamp");
        RentalPeriod::new(from, until).expect("valid window")
    }

    fn draft() -> ListingDraft {
        ListingDraft {
            id: Uuid::new_v4(),
            owner: UserId::random(),
            title: "Pannier set".to_owned(),
            description: "Waterproof rear panniers".to_owned(),
            category: Category::Gear,
            price_cents: 1_500,
            images: vec!["https://img.example/panniers.jpg".to_owned()],
            location: "Innsbruck".to_owned(),
            availability: availability(),
        }
    }

    #[test]
    fn accepts_valid_draft() {
        let listing = Listing::new(draft()).expect("valid listing");
        assert_eq!(listing.category(), Category::Gear);
        assert_eq!(listing.price_cents(), 1_500);
    }

    #[rstest]
    #[case("", ListingValidationError::EmptyTitle)]
    #[case("   ", ListingValidationError::EmptyTitle)]
    fn rejects_blank_titles(#[case] title: &str, #[case] expected: ListingValidationError) {
        let mut d = draft();
        d.title = title.to_owned();
        assert_eq!(Listing::new(d).expect_err("invalid title"), expected);
    }

    #[test]
    fn rejects_oversized_title() {
        let mut d = draft();
        d.title = "x".repeat(TITLE_MAX + 1);
        assert!(matches!(
            Listing::new(d).expect_err("title too long"),
            ListingValidationError::TitleTooLong { .. }
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(-100)]
    fn rejects_non_positive_price(#[case] price_cents: i64) {
        let mut d = draft();
        d.price_cents = price_cents;
        assert_eq!(
            Listing::new(d).expect_err("invalid price"),
            ListingValidationError::NonPositivePrice
        );
    }

    #[test]
    fn quote_multiplies_price_by_billable_days() {
        let listing = Listing::new(draft()).expect("valid listing");
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid timestamp");
        let end = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).single().expect("valid timestamp");
        let period = RentalPeriod::new(start, end).expect("valid period");
        assert_eq!(listing.quote_cents(&period), 4 * 1_500);
    }

    #[rstest]
    #[case("gear", Category::Gear)]
    #[case("vehicle", Category::Vehicle)]
    #[case("room", Category::Room)]
    fn category_parses_stable_strings(#[case] raw: &str, #[case] expected: Category) {
        let parsed: Category = raw.parse().expect("known category");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[test]
    fn category_rejects_unknown_strings() {
        assert_eq!(
            "boat".parse::<Category>().expect_err("unknown category"),
            ListingValidationError::UnknownCategory
        );
    }
}
