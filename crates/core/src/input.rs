// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wochenplan_domain::{
    Driver, EligibilityMatrix, PlanningGridData, PublicHoliday, RouteDefinition,
};

/// Everything the four workbook sheets produce, ready for assembly.
///
/// Parsing is purely lexical; none of the fields here have been checked
/// against the target week or the planning configuration yet.
#[derive(Debug, Clone, Default)]
pub struct ParsedSheets {
    /// Route definitions from the `Dienste` sheet.
    pub route_definitions: Vec<RouteDefinition>,
    /// The seasonal-eligibility matrix from the `Dienste` sheet.
    pub matrix: EligibilityMatrix,
    /// Drivers from the `Lenker` sheet.
    pub drivers: Vec<Driver>,
    /// Public holidays from the `Feiertag` sheet.
    pub holidays: Vec<PublicHoliday>,
    /// School flags, no-work markers and driver hours from the
    /// `Dienstplan` sheet.
    pub grid: PlanningGridData,
    /// Non-fatal observations collected while parsing, e.g. skipped
    /// duplicate drivers or unparseable holiday dates.
    pub warnings: Vec<String>,
}
