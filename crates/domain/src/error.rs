// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and plan resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Week start date is not a Monday.
    NotMonday {
        /// The rejected start date.
        week_start: time::Date,
        /// The actual weekday of the rejected date.
        weekday: time::Weekday,
        /// The Monday immediately before the rejected date.
        previous_monday: time::Date,
        /// The Monday immediately after the rejected date.
        next_monday: time::Date,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Season resolution did not match exactly one configured range.
    AmbiguousSeason {
        /// The date being resolved.
        date: time::Date,
        /// Labels of all ranges that matched (empty when none matched).
        matches: Vec<String>,
    },
    /// A configured season range carries an impossible month/day pair.
    InvalidSeasonRange {
        /// The season label of the offending range.
        label: String,
        /// Description of the validation failure.
        reason: String,
    },
    /// A configured school-vacation period is inverted or malformed.
    InvalidVacationPeriod {
        /// The period name.
        name: String,
        /// Description of the validation failure.
        reason: String,
    },
    /// A manual-unavailability entry names a driver that does not exist.
    DriverNotFound {
        /// The unmatched driver name as supplied by the caller.
        name: String,
    },
    /// A route code is empty or malformed.
    InvalidRouteCode(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotMonday {
                week_start,
                weekday,
                previous_monday,
                next_monday,
            } => {
                write!(
                    f,
                    "Week start {week_start} is a {weekday}, not a Monday; nearest Mondays are {previous_monday} and {next_monday}"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::AmbiguousSeason { date, matches } => {
                if matches.is_empty() {
                    write!(f, "No configured season range contains {date}")
                } else {
                    write!(
                        f,
                        "Multiple season ranges contain {date}: {}",
                        matches.join(", ")
                    )
                }
            }
            Self::InvalidSeasonRange { label, reason } => {
                write!(f, "Invalid season range '{label}': {reason}")
            }
            Self::InvalidVacationPeriod { name, reason } => {
                write!(f, "Invalid school-vacation period '{name}': {reason}")
            }
            Self::DriverNotFound { name } => {
                write!(f, "Driver '{name}' not found among known drivers")
            }
            Self::InvalidRouteCode(msg) => write!(f, "Invalid route code: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
