// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional week write/read tests against in-memory SQLite.

use time::Date;
use time::macros::date;

use wochenplan_domain::AssignmentKind;

use super::helpers::create_test_plan;
use crate::SqlitePersistence;

const WEEK_START: Date = date!(2025 - 09 - 08);
const NEXT_WEEK_START: Date = date!(2025 - 09 - 15);

#[test]
fn test_replace_persists_all_rows() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_test_plan(WEEK_START);

    let outcome = persistence.replace_week(&plan).unwrap();
    assert_eq!(outcome.counts.drivers, 2);
    assert_eq!(outcome.counts.routes, 3);
    assert_eq!(outcome.counts.driver_availability, 1);
    assert_eq!(outcome.counts.fixed_assignments, 2);
    assert!(outcome.duplicate_routes.is_empty());

    let routes = persistence.week_routes(WEEK_START).unwrap();
    assert_eq!(routes.len(), 3);
    // (date, name) order: Monday 411, Tuesday 411, Saturday 452SA.
    assert_eq!(routes[0].date, date!(2025 - 09 - 08));
    assert_eq!(routes[0].name.value(), "411");
    assert_eq!(routes[2].date, date!(2025 - 09 - 13));
    assert_eq!(routes[2].name.value(), "452SA");
    assert!(routes.iter().all(|route| route.route_id().is_some()));
}

#[test]
fn test_replace_twice_is_idempotent() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_test_plan(WEEK_START);

    let first = persistence.replace_week(&plan).unwrap();
    let second = persistence.replace_week(&plan).unwrap();
    assert_eq!(first.counts, second.counts);
    assert!(second.duplicate_routes.is_empty());

    assert_eq!(persistence.week_routes(WEEK_START).unwrap().len(), 3);
    assert_eq!(persistence.week_availability(WEEK_START).unwrap().len(), 1);
    assert_eq!(persistence.week_assignments(WEEK_START).unwrap().len(), 2);
}

#[test]
fn test_replace_clears_previous_rows() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .replace_week(&create_test_plan(WEEK_START))
        .unwrap();

    let mut smaller = create_test_plan(WEEK_START);
    smaller.routes.pop();
    let outcome = persistence.replace_week(&smaller).unwrap();
    assert_eq!(outcome.counts.routes, 2);

    let routes = persistence.week_routes(WEEK_START).unwrap();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|route| route.name.value() == "411"));
}

#[test]
fn test_append_reports_duplicates_and_keeps_stored_rows() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let plan = create_test_plan(WEEK_START);
    persistence.replace_week(&plan).unwrap();

    let outcome = persistence.append_week(&plan).unwrap();
    assert_eq!(outcome.counts.routes, 0);
    assert_eq!(outcome.duplicate_routes.len(), 3);
    assert_eq!(outcome.duplicate_routes[0].route_name, "411");

    // Stored rows are untouched, a driver keeps the assignment it had.
    assert_eq!(persistence.week_routes(WEEK_START).unwrap().len(), 3);
    assert_eq!(persistence.week_assignments(WEEK_START).unwrap().len(), 2);
    assert_eq!(persistence.week_availability(WEEK_START).unwrap().len(), 1);
}

#[test]
fn test_append_into_empty_week_has_no_duplicates() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let outcome = persistence
        .append_week(&create_test_plan(WEEK_START))
        .unwrap();
    assert_eq!(outcome.counts.routes, 3);
    assert!(outcome.duplicate_routes.is_empty());
}

#[test]
fn test_drivers_upsert_by_name_across_weeks() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .replace_week(&create_test_plan(WEEK_START))
        .unwrap();
    persistence
        .replace_week(&create_test_plan(NEXT_WEEK_START))
        .unwrap();

    let drivers = persistence.all_drivers().unwrap();
    assert_eq!(drivers.len(), 2);
    assert_eq!(drivers[0].name().value(), "Huber Max");
    assert!(drivers.iter().all(|driver| driver.driver_id().is_some()));
}

#[test]
fn test_week_queries_are_scoped_to_one_week() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .replace_week(&create_test_plan(WEEK_START))
        .unwrap();
    persistence
        .replace_week(&create_test_plan(NEXT_WEEK_START))
        .unwrap();

    let week_one = persistence.week_routes(WEEK_START).unwrap();
    assert_eq!(week_one.len(), 3);
    assert!(week_one.iter().all(|route| route.date < NEXT_WEEK_START));

    let week_two = persistence.week_routes(NEXT_WEEK_START).unwrap();
    assert_eq!(week_two.len(), 3);
    assert!(week_two.iter().all(|route| route.date >= NEXT_WEEK_START));
}

#[test]
fn test_availability_round_trip() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .replace_week(&create_test_plan(WEEK_START))
        .unwrap();

    let rows = persistence.week_availability(WEEK_START).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].driver_name.value(), "Maier Anna");
    assert_eq!(rows[0].date, WEEK_START);
    assert!(!rows[0].available);
    assert_eq!(rows[0].notes.as_deref(), Some("Feiertag: Testfeiertag"));
}

#[test]
fn test_assignment_round_trip() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .replace_week(&create_test_plan(WEEK_START))
        .unwrap();

    let assignments = persistence.week_assignments(WEEK_START).unwrap();
    assert_eq!(assignments.len(), 2);

    let regular = &assignments[0];
    assert_eq!(regular.driver_name.value(), "Huber Max");
    assert_eq!(regular.details.kind, AssignmentKind::Regular);
    assert_eq!(
        regular.route_name.as_ref().map(|code| code.value()),
        Some("411")
    );

    let special = &assignments[1];
    assert_eq!(special.driver_name.value(), "Maier Anna");
    assert_eq!(special.details.kind, AssignmentKind::SpecialDuty);
    assert!(special.route_name.is_none());
    assert_eq!(special.details.duty_code.as_deref(), Some("MB"));
    assert!(special.details.blocks_regular_assignment);
}
