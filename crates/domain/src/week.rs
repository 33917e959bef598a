// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monday-anchored planning week.
//!
//! All ingestion targets exactly one calendar week. The week is identified
//! by its Monday; every other property (the seven dates, the Saturday, the
//! exclusive end bound used for range queries) is derived deterministically.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Weekday};

/// Number of days covered by one planning week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Represents a validated, Monday-anchored planning week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanWeek {
    /// The Monday this week starts on (inclusive).
    start: Date,
}

impl PlanWeek {
    /// Creates a new `PlanWeek` from a start date.
    ///
    /// # Arguments
    ///
    /// * `start` - The proposed week start (must be a Monday)
    ///
    /// # Returns
    ///
    /// * `Ok(PlanWeek)` if the date is a Monday
    /// * `Err(DomainError::NotMonday)` carrying the two nearest Mondays
    ///   otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the date is not a Monday or if computing the
    /// suggested Mondays overflows the date range.
    pub fn new(start: Date) -> Result<Self, DomainError> {
        let weekday: Weekday = start.weekday();
        if weekday == Weekday::Monday {
            return Ok(Self { start });
        }

        let days_past_monday: i64 = i64::from(weekday.number_days_from_monday());
        let previous_monday: Date = start
            .checked_sub(time::Duration::days(days_past_monday))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: "finding the previous Monday".to_string(),
            })?;
        let next_monday: Date = previous_monday
            .checked_add(time::Duration::days(DAYS_PER_WEEK))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: "finding the next Monday".to_string(),
            })?;

        Err(DomainError::NotMonday {
            week_start: start,
            weekday,
            previous_monday,
            next_monday,
        })
    }

    /// Returns the Monday this week starts on.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the date at the given zero-based day offset within the week.
    ///
    /// Offset 0 is Monday, offset 5 is Saturday, offset 6 is Sunday.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is outside 0..7 or date arithmetic
    /// overflows.
    pub fn date_at(&self, offset: u8) -> Result<Date, DomainError> {
        if i64::from(offset) >= DAYS_PER_WEEK {
            return Err(DomainError::DateArithmeticOverflow {
                operation: format!("resolving day offset {offset} within a week"),
            });
        }
        self.start
            .checked_add(time::Duration::days(i64::from(offset)))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("resolving day offset {offset} within a week"),
            })
    }

    /// Returns all seven dates of the week in order, Monday first.
    ///
    /// # Errors
    ///
    /// Returns an error if date arithmetic overflows.
    pub fn dates(&self) -> Result<Vec<Date>, DomainError> {
        let mut dates: Vec<Date> = Vec::with_capacity(7);
        for offset in 0..7u8 {
            dates.push(self.date_at(offset)?);
        }
        Ok(dates)
    }

    /// Returns the Saturday of this week.
    ///
    /// # Errors
    ///
    /// Returns an error if date arithmetic overflows.
    pub fn saturday(&self) -> Result<Date, DomainError> {
        self.date_at(5)
    }

    /// Returns the first date after this week, the exclusive upper bound
    /// for range queries.
    ///
    /// # Errors
    ///
    /// Returns an error if date arithmetic overflows.
    pub fn end_exclusive(&self) -> Result<Date, DomainError> {
        self.start
            .checked_add(time::Duration::days(DAYS_PER_WEEK))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: "calculating the week end bound".to_string(),
            })
    }

    /// Returns whether the given date falls inside this week.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        let offset: i64 = (date - self.start).whole_days();
        (0..DAYS_PER_WEEK).contains(&offset)
    }
}

impl std::fmt::Display for PlanWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "week of {}", self.start)
    }
}
