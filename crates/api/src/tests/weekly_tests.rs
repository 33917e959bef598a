// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-query tests over an ingested week.

use time::macros::date;

use wochenplan_audit::UploadAction;
use wochenplan_persistence::SqlitePersistence;

use super::helpers::{
    WEEK_START, create_test_config, create_test_workbook, create_upload_request,
};
use crate::error::ApiError;
use crate::{
    ingest, recent_uploads, weekly_assignments, weekly_availability, weekly_drivers,
    weekly_routes, weekly_summary,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn ingested_persistence() -> SqlitePersistence {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let request = create_upload_request(create_test_workbook(), UploadAction::Replace);
    ingest(
        &mut persistence,
        &create_test_config(),
        &request,
        MAX_UPLOAD_BYTES,
    )
    .unwrap();
    persistence
}

#[test]
fn test_weekly_routes_carry_week_labels() {
    let mut persistence = ingested_persistence();

    let response = weekly_routes(&mut persistence, WEEK_START).unwrap();
    assert_eq!(response.week_start, WEEK_START);
    assert_eq!(response.routes.len(), 11);
    assert_eq!(response.season.as_deref(), Some("summer"));
    assert_eq!(response.school_status.as_deref(), Some("mit_schule"));
}

#[test]
fn test_weekly_routes_for_empty_week_have_no_labels() {
    let mut persistence = ingested_persistence();

    let response = weekly_routes(&mut persistence, date!(2025 - 09 - 15)).unwrap();
    assert!(response.routes.is_empty());
    assert!(response.season.is_none());
    assert!(response.school_status.is_none());
}

#[test]
fn test_weekly_queries_reject_non_monday() {
    let mut persistence = ingested_persistence();

    let err = weekly_routes(&mut persistence, date!(2025 - 09 - 10)).unwrap_err();
    assert!(matches!(err, ApiError::NotMonday { .. }));
}

#[test]
fn test_weekly_drivers_and_availability() {
    let mut persistence = ingested_persistence();

    let drivers = weekly_drivers(&mut persistence).unwrap();
    assert_eq!(drivers.drivers.len(), 2);

    let availability = weekly_availability(&mut persistence, WEEK_START).unwrap();
    assert_eq!(availability.availability.len(), 3);
    // Both drivers are off on the Monday holiday.
    let monday_rows = availability
        .availability
        .iter()
        .filter(|row| row.date == WEEK_START)
        .count();
    assert_eq!(monday_rows, 2);
}

#[test]
fn test_weekly_assignments_follow_fixed_route() {
    let mut persistence = ingested_persistence();

    let response = weekly_assignments(&mut persistence, WEEK_START).unwrap();
    assert_eq!(response.fixed_assignments.len(), 5);
    assert!(
        response
            .fixed_assignments
            .iter()
            .all(|assignment| assignment.driver_name.value() == "Huber Max")
    );
    assert!(
        response
            .fixed_assignments
            .iter()
            .all(|assignment| assignment.route_name.as_ref().map(|c| c.value()) == Some("411"))
    );
}

#[test]
fn test_weekly_summary_counts() {
    let mut persistence = ingested_persistence();

    let summary = weekly_summary(&mut persistence, WEEK_START).unwrap();
    assert_eq!(summary.route_count, 11);
    assert_eq!(summary.driver_count, 2);
    assert_eq!(summary.availability_count, 3);
    assert_eq!(summary.fixed_assignment_count, 5);
    assert_eq!(summary.routes.len(), 11);
    assert_eq!(summary.routes[0].date, WEEK_START);
}

#[test]
fn test_recent_uploads_lists_history() {
    let mut persistence = ingested_persistence();

    let response = recent_uploads(&mut persistence, 5).unwrap();
    assert_eq!(response.uploads.len(), 1);
    assert_eq!(response.uploads[0].action, "replace");
    assert_eq!(response.uploads[0].counts.routes, 11);
}
