// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Versioned planning configuration.
//!
//! Season ranges, school-vacation periods and ingestion policies are
//! reference data. They are loaded once into an immutable snapshot that is
//! passed into the resolvers, so an ingestion's outcome is reproducible
//! from its inputs alone.

use crate::error::DomainError;
use crate::types::Season;
use serde::{Deserialize, Serialize};
use time::Date;

/// A month/day pair without a year, the boundary type for season ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month number, 1 through 12.
    pub month: u8,
    /// Day of month, 1 through 31.
    pub day: u8,
}

impl MonthDay {
    /// Creates a new `MonthDay`.
    #[must_use]
    pub const fn new(month: u8, day: u8) -> Self {
        Self { month, day }
    }

    /// Extracts the month/day pair from a date.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self {
            month: u8::from(date.month()),
            day: date.day(),
        }
    }

    const fn is_plausible(self) -> bool {
        matches!(self.month, 1..=12) && matches!(self.day, 1..=31)
    }
}

/// A season's calendar range.
///
/// The range is inclusive on both ends and may wrap the year boundary:
/// winter from October 1 to May 31 contains December as well as March.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRange {
    /// The season this range belongs to.
    pub season: Season,
    /// First day of the range (inclusive).
    pub start: MonthDay,
    /// Last day of the range (inclusive).
    pub end: MonthDay,
}

impl SeasonRange {
    /// Creates a new `SeasonRange`.
    #[must_use]
    pub const fn new(season: Season, start: MonthDay, end: MonthDay) -> Self {
        Self { season, start, end }
    }

    /// Returns whether the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        let md: MonthDay = MonthDay::from_date(date);
        if self.start <= self.end {
            self.start <= md && md <= self.end
        } else {
            // Wrapping range, e.g. October through May.
            md >= self.start || md <= self.end
        }
    }
}

/// A named school-vacation period with inclusive date bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolVacationPeriod {
    /// Display name of the period.
    pub name: String,
    /// First vacation day (inclusive).
    pub start_date: Date,
    /// Last vacation day (inclusive).
    pub end_date: Date,
}

impl SchoolVacationPeriod {
    /// Returns whether the period contains the given date.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Policy for route codes that appear in the definition table but in no
/// column of the seasonal-eligibility matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnmatrixedRoutePolicy {
    /// Keep the route; absence from the matrix is not exclusion.
    #[default]
    Retain,
    /// Drop the route; only matrix-listed codes are eligible.
    Drop,
}

impl UnmatrixedRoutePolicy {
    /// Returns the string representation of this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retain => "retain",
            Self::Drop => "drop",
        }
    }
}

/// The immutable configuration snapshot an ingestion runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Opaque version tag recorded with every ingestion.
    pub version: String,
    /// Season calendar ranges. Every date must fall into exactly one.
    pub seasons: Vec<SeasonRange>,
    /// School-vacation periods.
    pub school_vacations: Vec<SchoolVacationPeriod>,
    /// Policy for codes missing from the eligibility matrix.
    pub unmatrixed_route_policy: UnmatrixedRoutePolicy,
    /// Codes whose `SA` suffix does not mean Saturday-only service; they
    /// keep the weekday pattern from the sheet's `Tag` column.
    pub saturday_pattern_exempt_codes: Vec<String>,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            version: String::from("built-in"),
            seasons: vec![
                SeasonRange::new(Season::Summer, MonthDay::new(6, 1), MonthDay::new(9, 30)),
                SeasonRange::new(Season::Winter, MonthDay::new(10, 1), MonthDay::new(5, 31)),
            ],
            school_vacations: Vec::new(),
            unmatrixed_route_policy: UnmatrixedRoutePolicy::Retain,
            saturday_pattern_exempt_codes: vec![String::from("531SA")],
        }
    }
}

impl PlanningConfig {
    /// Validates the snapshot's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if a season range carries an impossible month/day
    /// pair, no season ranges are configured, or a vacation period ends
    /// before it starts.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.seasons.is_empty() {
            return Err(DomainError::InvalidSeasonRange {
                label: String::from("(none)"),
                reason: String::from("at least one season range must be configured"),
            });
        }
        for range in &self.seasons {
            if !range.start.is_plausible() || !range.end.is_plausible() {
                return Err(DomainError::InvalidSeasonRange {
                    label: range.season.as_str().to_string(),
                    reason: format!(
                        "month/day bounds {}-{} / {}-{} are out of range",
                        range.start.month, range.start.day, range.end.month, range.end.day
                    ),
                });
            }
        }
        for period in &self.school_vacations {
            if period.end_date < period.start_date {
                return Err(DomainError::InvalidVacationPeriod {
                    name: period.name.clone(),
                    reason: format!(
                        "period ends {} before it starts {}",
                        period.end_date, period.start_date
                    ),
                });
            }
        }
        Ok(())
    }

    /// Returns whether the code is exempt from Saturday-suffix
    /// classification.
    #[must_use]
    pub fn is_saturday_exempt(&self, code: &str) -> bool {
        self.saturday_pattern_exempt_codes
            .iter()
            .any(|ex| ex.eq_ignore_ascii_case(code.trim()))
    }

    /// Returns the vacation period containing the date, if any.
    #[must_use]
    pub fn vacation_containing(&self, date: Date) -> Option<&SchoolVacationPeriod> {
        self.school_vacations
            .iter()
            .find(|period| period.contains(date))
    }
}
