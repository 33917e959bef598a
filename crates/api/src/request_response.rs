// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.

use serde::{Deserialize, Serialize};
use time::Date;
use wochenplan_audit::{RecordCounts, UploadAction};
use wochenplan_domain::{
    AssignmentFailure, Driver, DriverAvailability, FixedAssignment, ManualUnavailability, Route,
};
use wochenplan_persistence::{DuplicateRoute, UploadRecord};

/// One upload request after multipart decoding.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// The client-supplied filename.
    pub filename: String,
    /// The uploaded file content.
    pub bytes: Vec<u8>,
    /// The requested week start; must be a Monday.
    pub week_start: Date,
    /// Replace or append.
    pub action: UploadAction,
    /// Caller-supplied unavailability entries.
    pub unavailable_drivers: Vec<ManualUnavailability>,
}

/// The success body of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// The ingested week's Monday.
    pub week_start: Date,
    /// The resolved season label.
    pub season: String,
    /// The resolved school-status label.
    pub school_status: String,
    /// Rows written per table.
    pub records_created: RecordCounts,
    /// The write mode that was applied.
    pub action_taken: String,
    /// A human-readable summary.
    pub message: String,
    /// Collected non-fatal observations.
    pub warnings: Vec<String>,
    /// Fixed-code parts that could not be bound to a route.
    pub resolution_failures: Vec<AssignmentFailure>,
    /// Append-mode collisions left untouched in storage.
    pub duplicate_routes: Vec<DuplicateRoute>,
}

/// Routes stored for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRoutesResponse {
    /// The queried week's Monday.
    pub week_start: Date,
    /// The season recorded on the week's routes, when any exist.
    pub season: Option<String>,
    /// The school status recorded on the week's routes, when any exist.
    pub school_status: Option<String>,
    /// The stored routes in (date, name) order.
    pub routes: Vec<Route>,
}

/// All known drivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyDriversResponse {
    /// Drivers with their attribute structures.
    pub drivers: Vec<Driver>,
}

/// Availability rows stored for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAvailabilityResponse {
    /// The queried week's Monday.
    pub week_start: Date,
    /// The stored availability rows.
    pub availability: Vec<DriverAvailability>,
}

/// Fixed assignments stored for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAssignmentsResponse {
    /// The queried week's Monday.
    pub week_start: Date,
    /// The stored fixed assignments.
    pub fixed_assignments: Vec<FixedAssignment>,
}

/// A (date, code) pair in the summary's route preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePreview {
    /// The route's date.
    pub date: Date,
    /// The route code.
    pub name: String,
}

/// The weekly summary: counts plus context labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummaryResponse {
    /// The queried week's Monday.
    pub week_start: Date,
    /// The season recorded on the week's routes, when any exist.
    pub season: Option<String>,
    /// The school status recorded on the week's routes, when any exist.
    pub school_status: Option<String>,
    /// Number of stored routes.
    pub route_count: usize,
    /// Number of known drivers.
    pub driver_count: usize,
    /// Number of stored availability rows.
    pub availability_count: usize,
    /// Number of stored fixed assignments.
    pub fixed_assignment_count: usize,
    /// The week's (date, code) pairs in order.
    pub routes: Vec<RoutePreview>,
}

/// Recent upload-history rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsResponse {
    /// History rows, newest first.
    pub uploads: Vec<UploadRecord>,
}

/// The machine-readable error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The stable machine kind string.
    pub error: String,
    /// A human-readable description.
    pub message: String,
    /// Structured extra detail, e.g. Monday suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
