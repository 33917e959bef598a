// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read queries over a stored week.

use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    RoutePreview, UploadsResponse, WeeklyAssignmentsResponse, WeeklyAvailabilityResponse,
    WeeklyDriversResponse, WeeklyRoutesResponse, WeeklySummaryResponse,
};
use time::Date;
use wochenplan_domain::{PlanWeek, Route};
use wochenplan_persistence::SqlitePersistence;

/// Validates a query's week start the same way uploads do.
fn validate_week(week_start: Date) -> Result<PlanWeek, ApiError> {
    PlanWeek::new(week_start).map_err(translate_domain_error)
}

/// Context labels recorded on a week's stored routes, when any exist.
fn week_labels(routes: &[Route]) -> (Option<String>, Option<String>) {
    routes.first().map_or((None, None), |route| {
        (
            Some(route.details.season.as_str().to_string()),
            Some(route.details.school_status.as_str().to_string()),
        )
    })
}

/// Returns the routes stored for a week.
///
/// # Errors
///
/// Returns an error if the week start is not a Monday or the query fails.
pub fn weekly_routes(
    persistence: &mut SqlitePersistence,
    week_start: Date,
) -> Result<WeeklyRoutesResponse, ApiError> {
    validate_week(week_start)?;
    let routes: Vec<Route> = persistence.week_routes(week_start)?;
    let (season, school_status) = week_labels(&routes);
    Ok(WeeklyRoutesResponse {
        week_start,
        season,
        school_status,
        routes,
    })
}

/// Returns all known drivers.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn weekly_drivers(
    persistence: &mut SqlitePersistence,
) -> Result<WeeklyDriversResponse, ApiError> {
    Ok(WeeklyDriversResponse {
        drivers: persistence.all_drivers()?,
    })
}

/// Returns the availability rows stored for a week.
///
/// # Errors
///
/// Returns an error if the week start is not a Monday or the query fails.
pub fn weekly_availability(
    persistence: &mut SqlitePersistence,
    week_start: Date,
) -> Result<WeeklyAvailabilityResponse, ApiError> {
    validate_week(week_start)?;
    Ok(WeeklyAvailabilityResponse {
        week_start,
        availability: persistence.week_availability(week_start)?,
    })
}

/// Returns the fixed assignments stored for a week.
///
/// # Errors
///
/// Returns an error if the week start is not a Monday or the query fails.
pub fn weekly_assignments(
    persistence: &mut SqlitePersistence,
    week_start: Date,
) -> Result<WeeklyAssignmentsResponse, ApiError> {
    validate_week(week_start)?;
    Ok(WeeklyAssignmentsResponse {
        week_start,
        fixed_assignments: persistence.week_assignments(week_start)?,
    })
}

/// Returns the week's counts, context labels and route preview.
///
/// # Errors
///
/// Returns an error if the week start is not a Monday or a query fails.
pub fn weekly_summary(
    persistence: &mut SqlitePersistence,
    week_start: Date,
) -> Result<WeeklySummaryResponse, ApiError> {
    validate_week(week_start)?;
    let routes: Vec<Route> = persistence.week_routes(week_start)?;
    let (season, school_status) = week_labels(&routes);
    let driver_count: usize = persistence.all_drivers()?.len();
    let availability_count: usize = persistence.week_availability(week_start)?.len();
    let fixed_assignment_count: usize = persistence.week_assignments(week_start)?.len();
    Ok(WeeklySummaryResponse {
        week_start,
        season,
        school_status,
        route_count: routes.len(),
        driver_count,
        availability_count,
        fixed_assignment_count,
        routes: routes
            .iter()
            .map(|route| RoutePreview {
                date: route.date,
                name: route.name.value().to_string(),
            })
            .collect(),
    })
}

/// Returns the most recent upload-history rows.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn recent_uploads(
    persistence: &mut SqlitePersistence,
    limit: i64,
) -> Result<UploadsResponse, ApiError> {
    Ok(UploadsResponse {
        uploads: persistence.recent_uploads(limit)?,
    })
}
