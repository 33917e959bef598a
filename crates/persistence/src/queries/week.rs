// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Queries over a stored week, plus the driver roster.
//!
//! Week scoping always uses the `[start, start + 7 days)` range on the
//! ISO date text, which matches string comparison order.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::Date;
use tracing::debug;

use wochenplan_domain::{
    Driver, DriverAvailability, DriverDetails, DriverName, FixedAssignment,
    FixedAssignmentDetails, Route, RouteCode, RouteDetails,
};

use crate::data_models::{decode_date, week_bounds};
use crate::diesel_schema::{driver_availability, drivers, fixed_assignments, routes};
use crate::error::PersistenceError;

/// Diesel Queryable struct for route rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = routes)]
struct RouteRow {
    route_id: i64,
    date: String,
    route_name: String,
    details_json: String,
}

/// Diesel Queryable struct for driver rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = drivers)]
struct DriverRow {
    driver_id: i64,
    name: String,
    details_json: String,
}

/// Diesel Queryable struct for availability rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = driver_availability)]
struct AvailabilityRow {
    date: String,
    available: i32,
    shift_preference: Option<String>,
    notes: Option<String>,
}

/// Diesel Queryable struct for fixed assignment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = fixed_assignments)]
struct AssignmentRow {
    date: String,
    details_json: String,
}

/// Retrieves a week's routes in `(date, name)` order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn week_routes(
    conn: &mut SqliteConnection,
    week_start: Date,
) -> Result<Vec<Route>, PersistenceError> {
    let (start, end) = week_bounds(week_start)?;
    debug!(%week_start, "loading week routes");

    let rows: Vec<RouteRow> = routes::table
        .filter(routes::date.ge(&start))
        .filter(routes::date.lt(&end))
        .order((routes::date.asc(), routes::route_name.asc()))
        .select(RouteRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let date: Date = decode_date(&row.date)?;
            let name: RouteCode = RouteCode::new(&row.route_name)
                .map_err(|e| PersistenceError::Encoding(e.to_string()))?;
            let details: RouteDetails = serde_json::from_str(&row.details_json)?;
            Ok(Route::with_id(row.route_id, date, name, details))
        })
        .collect()
}

/// Retrieves every known driver, ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn all_drivers(conn: &mut SqliteConnection) -> Result<Vec<Driver>, PersistenceError> {
    let rows: Vec<DriverRow> = drivers::table
        .order(drivers::name.asc())
        .select(DriverRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let details: DriverDetails = serde_json::from_str(&row.details_json)?;
            Ok(Driver::with_id(
                row.driver_id,
                DriverName::new(&row.name),
                details,
            ))
        })
        .collect()
}

/// Retrieves a week's availability rows with their driver names.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn week_availability(
    conn: &mut SqliteConnection,
    week_start: Date,
) -> Result<Vec<DriverAvailability>, PersistenceError> {
    let (start, end) = week_bounds(week_start)?;

    let rows: Vec<(AvailabilityRow, String)> = driver_availability::table
        .inner_join(drivers::table)
        .filter(driver_availability::date.ge(&start))
        .filter(driver_availability::date.lt(&end))
        .order((driver_availability::date.asc(), drivers::name.asc()))
        .select((AvailabilityRow::as_select(), drivers::name))
        .load(conn)?;

    rows.into_iter()
        .map(|(row, name)| {
            Ok(DriverAvailability {
                driver_name: DriverName::new(&name),
                date: decode_date(&row.date)?,
                available: row.available != 0,
                shift_preference: row.shift_preference,
                notes: row.notes,
            })
        })
        .collect()
}

/// Retrieves a week's fixed assignments with driver and route names.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn week_assignments(
    conn: &mut SqliteConnection,
    week_start: Date,
) -> Result<Vec<FixedAssignment>, PersistenceError> {
    let (start, end) = week_bounds(week_start)?;

    let rows: Vec<(AssignmentRow, String, Option<String>)> = fixed_assignments::table
        .inner_join(drivers::table)
        .left_join(routes::table)
        .filter(fixed_assignments::date.ge(&start))
        .filter(fixed_assignments::date.lt(&end))
        .order((fixed_assignments::date.asc(), drivers::name.asc()))
        .select((
            AssignmentRow::as_select(),
            drivers::name,
            routes::route_name.nullable(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(row, name, route_name)| {
            let route_name: Option<RouteCode> = route_name
                .map(|text| RouteCode::new(&text))
                .transpose()
                .map_err(|e| PersistenceError::Encoding(e.to_string()))?;
            let details: FixedAssignmentDetails = serde_json::from_str(&row.details_json)?;
            Ok(FixedAssignment {
                driver_name: DriverName::new(&name),
                date: decode_date(&row.date)?,
                route_name,
                details,
            })
        })
        .collect()
}
