// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional week persistence.
//!
//! A week plan is written in a single transaction: either every driver,
//! route, availability row, and fixed assignment lands, or none do.
//! Replace mode clears the week's rows first; append mode keeps existing
//! routes and reports `(date, route)` collisions instead of failing.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use tracing::{debug, info};

use wochenplan_audit::RecordCounts;
use wochenplan_core::WeekPlan;
use wochenplan_domain::{Driver, Route};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{DuplicateRoute, PersistOutcome, encode_date, week_bounds};
use crate::diesel_schema::{
    driver_availability, drivers, fixed_assignments, public_holidays, routes,
};
use crate::error::PersistenceError;

/// Replaces a week's stored rows with the given plan.
///
/// Deletes the week's fixed assignments, availability rows, and routes,
/// then inserts the plan. Drivers and holidays are upserted and survive
/// across weeks.
///
/// # Errors
///
/// Returns an error if any statement fails; the transaction rolls back.
pub fn replace_week(
    conn: &mut SqliteConnection,
    plan: &WeekPlan,
) -> Result<PersistOutcome, PersistenceError> {
    let (start, end) = week_bounds(plan.week.start())?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        delete_week_rows(conn, &start, &end)?;
        let outcome: PersistOutcome = persist_plan(conn, plan, false)?;
        info!(
            week_start = %plan.week.start(),
            routes = outcome.counts.routes,
            drivers = outcome.counts.drivers,
            "week replaced"
        );
        Ok(outcome)
    })
}

/// Appends a plan to a week's stored rows.
///
/// Routes that already exist for `(date, route_name)` are kept untouched
/// and reported as duplicates. Availability rows are upserted per driver
/// and date, and a driver's existing assignment on a date is kept.
///
/// # Errors
///
/// Returns an error if any statement fails; the transaction rolls back.
pub fn append_week(
    conn: &mut SqliteConnection,
    plan: &WeekPlan,
) -> Result<PersistOutcome, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let outcome: PersistOutcome = persist_plan(conn, plan, true)?;
        info!(
            week_start = %plan.week.start(),
            routes = outcome.counts.routes,
            duplicates = outcome.duplicate_routes.len(),
            "week appended"
        );
        Ok(outcome)
    })
}

/// Deletes the week's plan rows, children before parents.
fn delete_week_rows(
    conn: &mut SqliteConnection,
    start: &str,
    end: &str,
) -> Result<(), PersistenceError> {
    let assignments: usize = diesel::delete(
        fixed_assignments::table
            .filter(fixed_assignments::date.ge(start))
            .filter(fixed_assignments::date.lt(end)),
    )
    .execute(conn)?;
    let availability: usize = diesel::delete(
        driver_availability::table
            .filter(driver_availability::date.ge(start))
            .filter(driver_availability::date.lt(end)),
    )
    .execute(conn)?;
    let route_rows: usize = diesel::delete(
        routes::table
            .filter(routes::date.ge(start))
            .filter(routes::date.lt(end)),
    )
    .execute(conn)?;

    debug!(
        assignments,
        availability, route_rows, "cleared existing week rows"
    );
    Ok(())
}

/// Writes the plan's rows inside the caller's transaction.
fn persist_plan(
    conn: &mut SqliteConnection,
    plan: &WeekPlan,
    append: bool,
) -> Result<PersistOutcome, PersistenceError> {
    let mut counts: RecordCounts = RecordCounts::default();
    let mut duplicate_routes: Vec<DuplicateRoute> = Vec::new();

    // Drivers are keyed by name and survive across weeks.
    let mut driver_ids: BTreeMap<String, i64> = BTreeMap::new();
    for driver in &plan.drivers {
        let driver_id: i64 = upsert_driver(conn, driver)?;
        driver_ids.insert(driver.name().value().to_string(), driver_id);
    }
    counts.drivers = plan.drivers.len();

    // Routes, collecting ids so assignments can reference them.
    let mut route_ids: BTreeMap<(String, String), i64> = BTreeMap::new();
    for route in &plan.routes {
        let date_text: String = encode_date(route.date)?;
        let existing: Option<i64> = if append {
            routes::table
                .filter(routes::date.eq(&date_text))
                .filter(routes::route_name.eq(route.name.value()))
                .select(routes::route_id)
                .first(conn)
                .optional()?
        } else {
            None
        };
        let route_id: i64 = match existing {
            Some(route_id) => {
                duplicate_routes.push(DuplicateRoute {
                    date: route.date,
                    route_name: route.name.value().to_string(),
                });
                route_id
            }
            None => {
                insert_route(conn, &date_text, route)?;
                counts.routes += 1;
                get_last_insert_rowid(conn)?
            }
        };
        route_ids.insert((date_text, route.name.value().to_string()), route_id);
    }

    // Holidays are reference data keyed by date, never deleted per week.
    for holiday in &plan.holidays {
        let date_text: String = encode_date(holiday.date)?;
        diesel::insert_into(public_holidays::table)
            .values((
                public_holidays::date.eq(&date_text),
                public_holidays::name.eq(&holiday.name),
            ))
            .on_conflict(public_holidays::date)
            .do_update()
            .set(public_holidays::name.eq(&holiday.name))
            .execute(conn)?;
    }

    for row in &plan.availability {
        let driver_id: i64 = resolve_driver(&driver_ids, row.driver_name.value())?;
        let date_text: String = encode_date(row.date)?;
        diesel::insert_into(driver_availability::table)
            .values((
                driver_availability::driver_id.eq(driver_id),
                driver_availability::date.eq(&date_text),
                driver_availability::available.eq(i32::from(row.available)),
                driver_availability::shift_preference.eq(row.shift_preference.as_deref()),
                driver_availability::notes.eq(row.notes.as_deref()),
            ))
            .on_conflict((
                driver_availability::driver_id,
                driver_availability::date,
            ))
            .do_update()
            .set((
                driver_availability::available.eq(i32::from(row.available)),
                driver_availability::shift_preference.eq(row.shift_preference.as_deref()),
                driver_availability::notes.eq(row.notes.as_deref()),
            ))
            .execute(conn)?;
        counts.driver_availability += 1;
    }

    for assignment in &plan.assignments {
        let driver_id: i64 = resolve_driver(&driver_ids, assignment.driver_name.value())?;
        let date_text: String = encode_date(assignment.date)?;
        let route_id: Option<i64> = match &assignment.route_name {
            Some(code) => Some(
                route_ids
                    .get(&(date_text.clone(), code.value().to_string()))
                    .copied()
                    .ok_or_else(|| {
                        PersistenceError::MissingRecord(format!(
                            "route '{}' on {} not present in plan",
                            code.value(),
                            assignment.date
                        ))
                    })?,
            ),
            None => None,
        };

        // A driver holds at most one assignment per date; on append the
        // stored one wins.
        if append {
            let existing: Option<i64> = fixed_assignments::table
                .filter(fixed_assignments::driver_id.eq(driver_id))
                .filter(fixed_assignments::date.eq(&date_text))
                .select(fixed_assignments::assignment_id)
                .first(conn)
                .optional()?;
            if existing.is_some() {
                continue;
            }
        }

        let details_json: String = serde_json::to_string(&assignment.details)?;
        diesel::insert_into(fixed_assignments::table)
            .values((
                fixed_assignments::driver_id.eq(driver_id),
                fixed_assignments::date.eq(&date_text),
                fixed_assignments::route_id.eq(route_id),
                fixed_assignments::details_json.eq(&details_json),
            ))
            .execute(conn)?;
        counts.fixed_assignments += 1;
    }

    Ok(PersistOutcome {
        counts,
        duplicate_routes,
    })
}

/// Creates or refreshes a driver row by name and returns its id.
///
/// The stored attributes are refreshed on match because hours and fixed
/// routes change from upload to upload.
fn upsert_driver(conn: &mut SqliteConnection, driver: &Driver) -> Result<i64, PersistenceError> {
    let details_json: String = serde_json::to_string(&driver.details)?;
    let existing: Option<i64> = drivers::table
        .filter(drivers::name.eq(driver.name().value()))
        .select(drivers::driver_id)
        .first(conn)
        .optional()?;

    if let Some(driver_id) = existing {
        diesel::update(drivers::table.filter(drivers::driver_id.eq(driver_id)))
            .set(drivers::details_json.eq(&details_json))
            .execute(conn)?;
        Ok(driver_id)
    } else {
        diesel::insert_into(drivers::table)
            .values((
                drivers::name.eq(driver.name().value()),
                drivers::details_json.eq(&details_json),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    }
}

fn insert_route(
    conn: &mut SqliteConnection,
    date_text: &str,
    route: &Route,
) -> Result<(), PersistenceError> {
    let details_json: String = serde_json::to_string(&route.details)?;
    diesel::insert_into(routes::table)
        .values((
            routes::date.eq(date_text),
            routes::route_name.eq(route.name.value()),
            routes::details_json.eq(&details_json),
        ))
        .execute(conn)?;
    Ok(())
}

fn resolve_driver(
    driver_ids: &BTreeMap<String, i64>,
    name: &str,
) -> Result<i64, PersistenceError> {
    driver_ids
        .get(name)
        .copied()
        .ok_or_else(|| PersistenceError::MissingRecord(format!("driver '{name}' not present in plan")))
}
