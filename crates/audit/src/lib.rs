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
    clippy::all
)]

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// The terminal outcome of a single upload attempt.
///
/// Every upload, whether it persisted data or failed at any stage,
/// ends in exactly one of these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// The workbook was parsed, resolved, and persisted in full.
    Success,
    /// The upload was rejected or aborted; no week data was written.
    Failed,
}

impl UploadStatus {
    /// The canonical string stored in the upload history table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// How an upload interacts with data already stored for the target week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadAction {
    /// Delete the week's existing rows, then insert the new plan.
    Replace,
    /// Insert alongside existing rows, rejecting duplicate routes.
    Append,
}

impl UploadAction {
    /// The canonical string stored in the upload history table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

/// Per-table row counts produced by a successful upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    /// Drivers created or matched by name.
    pub drivers: usize,
    /// Route instances inserted for the week.
    pub routes: usize,
    /// Availability rows written for the week.
    pub driver_availability: usize,
    /// Fixed assignments written for the week.
    pub fixed_assignments: usize,
}

impl RecordCounts {
    /// Creates a new `RecordCounts`.
    #[must_use]
    pub const fn new(
        drivers: usize,
        routes: usize,
        driver_availability: usize,
        fixed_assignments: usize,
    ) -> Self {
        Self {
            drivers,
            routes,
            driver_availability,
            fixed_assignments,
        }
    }

    /// Total rows written across all tables.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.drivers + self.routes + self.driver_availability + self.fixed_assignments
    }
}

/// An immutable record of one upload attempt.
///
/// Exactly one attempt is recorded per upload request that reaches the
/// ingestion pipeline, including attempts that fail before any week data
/// is written. The record captures:
/// - Which file was uploaded and for which week
/// - Whether it replaced or appended to the week
/// - How many rows it produced (zero on failure)
/// - The failure message, when the attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAttempt {
    /// The original filename supplied by the client.
    pub filename: String,
    /// The Monday the upload targeted, when known.
    ///
    /// `None` when the attempt failed before a week could be determined,
    /// e.g. a rejected date or an unreadable workbook.
    pub week_start: Option<Date>,
    /// The requested write mode.
    pub action: UploadAction,
    /// Rows written per table. All zero for failed attempts.
    pub counts: RecordCounts,
    /// The terminal outcome.
    pub status: UploadStatus,
    /// Human-readable failure description, present only on failure.
    pub error_message: Option<String>,
    /// When the attempt was recorded, in UTC.
    pub timestamp: OffsetDateTime,
}

impl UploadAttempt {
    /// Creates a record for an upload that persisted data.
    #[must_use]
    pub fn success(
        filename: String,
        week_start: Date,
        action: UploadAction,
        counts: RecordCounts,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            filename,
            week_start: Some(week_start),
            action,
            counts,
            status: UploadStatus::Success,
            error_message: None,
            timestamp,
        }
    }

    /// Creates a record for an upload that failed at any stage.
    ///
    /// `week_start` is `None` when the failure happened before a target
    /// week was established.
    #[must_use]
    pub fn failure(
        filename: String,
        week_start: Option<Date>,
        action: UploadAction,
        error_message: String,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            filename,
            week_start,
            action,
            counts: RecordCounts::default(),
            status: UploadStatus::Failed,
            error_message: Some(error_message),
            timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_status_strings_are_stable() {
        assert_eq!(UploadStatus::Success.as_str(), "success");
        assert_eq!(UploadStatus::Failed.as_str(), "failed");
        assert_eq!(UploadAction::Replace.as_str(), "replace");
        assert_eq!(UploadAction::Append.as_str(), "append");
    }

    #[test]
    fn test_record_counts_total() {
        let counts: RecordCounts = RecordCounts::new(12, 48, 7, 5);

        assert_eq!(counts.total(), 72);
    }

    #[test]
    fn test_successful_attempt_carries_counts_and_no_error() {
        let counts: RecordCounts = RecordCounts::new(10, 40, 3, 2);
        let attempt: UploadAttempt = UploadAttempt::success(
            String::from("kw37.xlsx"),
            date!(2025 - 09 - 08),
            UploadAction::Replace,
            counts,
            datetime!(2025-09-05 14:30:00 UTC),
        );

        assert_eq!(attempt.status, UploadStatus::Success);
        assert_eq!(attempt.week_start, Some(date!(2025 - 09 - 08)));
        assert_eq!(attempt.counts, counts);
        assert_eq!(attempt.error_message, None);
    }

    #[test]
    fn test_failed_attempt_has_zero_counts() {
        let attempt: UploadAttempt = UploadAttempt::failure(
            String::from("kw37.xlsx"),
            Some(date!(2025 - 09 - 08)),
            UploadAction::Append,
            String::from("duplicate routes for week"),
            datetime!(2025-09-05 14:31:00 UTC),
        );

        assert_eq!(attempt.status, UploadStatus::Failed);
        assert_eq!(attempt.counts, RecordCounts::default());
        assert_eq!(
            attempt.error_message.as_deref(),
            Some("duplicate routes for week")
        );
    }

    #[test]
    fn test_failure_before_week_resolution_has_no_week() {
        let attempt: UploadAttempt = UploadAttempt::failure(
            String::from("notes.txt"),
            None,
            UploadAction::Replace,
            String::from("unsupported file type"),
            datetime!(2025-09-05 14:32:00 UTC),
        );

        assert_eq!(attempt.week_start, None);
    }

    #[test]
    fn test_attempt_serializes_with_lowercase_status() {
        let attempt: UploadAttempt = UploadAttempt::failure(
            String::from("kw37.xlsx"),
            None,
            UploadAction::Replace,
            String::from("boom"),
            datetime!(2025-09-05 14:33:00 UTC),
        );

        let json: String = serde_json::to_string(&attempt).unwrap();

        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"action\":\"replace\""));
    }
}
