// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wochenplan_domain::{
    AssignmentFailure, Driver, DriverAvailability, FixedAssignment, PlanWeek, PublicHoliday, Route,
    SchoolResolution, Season,
};

/// The fully resolved plan for one week, ready to persist.
///
/// Everything in here is internally consistent: routes are filtered and
/// dated, assignments are bound to routes that exist, and availability
/// rows carry their merged notes. Persistence writes it in a single
/// transaction or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekPlan {
    /// The Monday-anchored week the plan covers.
    pub week: PlanWeek,
    /// The season the week falls into.
    pub season: Season,
    /// The school status and the signal that decided it.
    pub school: SchoolResolution,
    /// Drivers from the sheet, with grid hours merged in.
    pub drivers: Vec<Driver>,
    /// Dated routes in (date, name) order.
    pub routes: Vec<Route>,
    /// Resolved fixed assignments, at most one per driver and date.
    pub assignments: Vec<FixedAssignment>,
    /// Merged unavailability rows for the week.
    pub availability: Vec<DriverAvailability>,
    /// All parsed holidays, persisted as reference data beyond the week.
    pub holidays: Vec<PublicHoliday>,
    /// Fixed-code parts that could not be bound to a route.
    pub resolution_failures: Vec<AssignmentFailure>,
    /// Non-fatal observations from parsing and assembly.
    pub warnings: Vec<String>,
}
