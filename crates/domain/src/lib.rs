// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod availability;
mod config;
mod eligibility;
mod error;
mod expansion;
mod school;
mod season;
mod types;
mod week;

pub use assignment::{AssignmentFailure, AssignmentResolution, resolve_fixed_assignments};
pub use availability::{
    AvailabilitySet, apply_frei_rows, apply_grid_markers, apply_holidays,
    apply_manual_unavailability,
};
pub use config::{
    MonthDay, PlanningConfig, SchoolVacationPeriod, SeasonRange, UnmatrixedRoutePolicy,
};
pub use eligibility::{EligibilityMatrix, FilterOutcome, filter_routes};
pub use error::DomainError;
pub use expansion::expand_week_routes;
pub use school::{SchoolResolution, SchoolStatusSource, resolve_school_status};
pub use season::resolve_season;
pub use week::{DAYS_PER_WEEK, PlanWeek};

// Re-export public types
pub use types::{
    AssignmentKind, Driver, DriverAvailability, DriverDetails, DriverHoursRow, DriverName,
    FixedAssignment, FixedAssignmentDetails, ManualUnavailability, NON_ROUTE_MARKERS, NoWorkMarker,
    PlanningGridData, PublicHoliday, Route, RouteCode, RouteDefinition, RouteDetails, RouteType,
    SchoolStatus, Season, SpecialDuty, WeekdayPattern, day_abbrev_to_offset, german_day_name,
    split_combined_code,
};
