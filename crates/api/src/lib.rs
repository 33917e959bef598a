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

pub mod cell;
mod config_file;
mod driver_sheet;
mod error;
mod holiday_sheet;
mod ingest;
mod planning_grid;
mod request_response;
mod route_sheet;
mod weekly;
mod workbook;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use config_file::{ConfigError, load_planning_config};
pub use driver_sheet::{DriverSheet, parse_driver_sheet};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use holiday_sheet::{HolidaySheet, parse_holiday_sheet};
pub use ingest::ingest;
pub use planning_grid::{PlanningGridSheet, parse_planning_grid};
pub use request_response::{
    ErrorBody, RoutePreview, UploadRequest, UploadResponse, UploadsResponse,
    WeeklyAssignmentsResponse, WeeklyAvailabilityResponse, WeeklyDriversResponse,
    WeeklyRoutesResponse, WeeklySummaryResponse,
};
pub use route_sheet::{RouteSheet, parse_route_sheet};
pub use weekly::{
    recent_uploads, weekly_assignments, weekly_availability, weekly_drivers, weekly_routes,
    weekly_summary,
};
pub use workbook::{
    PlanWorkbook, SHEET_DRIVERS, SHEET_GRID, SHEET_HOLIDAYS, SHEET_ROUTES, SheetGrid,
    load_workbook,
};
