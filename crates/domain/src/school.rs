// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! School-status resolution.
//!
//! Precedence, highest first: explicit grid markers for the week, then a
//! configured school-vacation period containing the week's Monday, then
//! the with-school default. Public holidays influence per-day
//! availability elsewhere but never the weekly school status.

use crate::config::PlanningConfig;
use crate::error::DomainError;
use crate::types::SchoolStatus;
use crate::week::PlanWeek;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Which signal decided the weekly school status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolStatusSource {
    /// Explicit markers in the planning grid.
    Grid,
    /// A configured school-vacation period containing the Monday.
    VacationPeriod,
    /// No signal; the with-school default applied.
    Default,
}

/// The resolved weekly school status together with its deciding signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolResolution {
    /// The weekly status.
    pub status: SchoolStatus,
    /// The signal that decided it.
    pub source: SchoolStatusSource,
}

/// Resolves the weekly school status.
///
/// # Arguments
///
/// * `week` - The week being ingested
/// * `school_flags` - Per-date school flags from the planning grid;
///   `false` marks a non-school date
/// * `config` - The configuration snapshot carrying vacation periods
///
/// # Returns
///
/// The weekly status and the signal that decided it.
///
/// # Errors
///
/// Returns an error if enumerating the week's dates overflows.
pub fn resolve_school_status(
    week: &PlanWeek,
    school_flags: &BTreeMap<Date, bool>,
    config: &PlanningConfig,
) -> Result<SchoolResolution, DomainError> {
    let dates: Vec<Date> = week.dates()?;
    let week_flags: Vec<bool> = dates
        .iter()
        .filter_map(|date| school_flags.get(date).copied())
        .collect();

    if week_flags.iter().any(|is_school_day| !is_school_day) {
        return Ok(SchoolResolution {
            status: SchoolStatus::WithoutSchool,
            source: SchoolStatusSource::Grid,
        });
    }
    if !week_flags.is_empty() {
        return Ok(SchoolResolution {
            status: SchoolStatus::WithSchool,
            source: SchoolStatusSource::Grid,
        });
    }

    if config.vacation_containing(week.start()).is_some() {
        return Ok(SchoolResolution {
            status: SchoolStatus::WithoutSchool,
            source: SchoolStatusSource::VacationPeriod,
        });
    }

    Ok(SchoolResolution {
        status: SchoolStatus::WithSchool,
        source: SchoolStatusSource::Default,
    })
}
