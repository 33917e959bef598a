// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain data structures returned by the persistence adapter.
//!
//! These are serializable carriers, not Diesel row types. The Diesel
//! `Queryable` structs live next to the queries that load them.

use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use wochenplan_audit::RecordCounts;

use crate::error::PersistenceError;

/// Storage format for dates. All date columns hold ISO `yyyy-mm-dd` text,
/// which sorts and compares correctly as a string.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Encodes a date into its column representation.
pub(crate) fn encode_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::Encoding(e.to_string()))
}

/// Decodes a date column back into a `Date`.
pub(crate) fn decode_date(text: &str) -> Result<Date, PersistenceError> {
    Date::parse(text, DATE_FORMAT)
        .map_err(|e| PersistenceError::Encoding(format!("invalid stored date: {e}")))
}

/// Returns the `[start, end)` column bounds covering one week.
pub(crate) fn week_bounds(week_start: Date) -> Result<(String, String), PersistenceError> {
    let end: Date = week_start
        .checked_add(time::Duration::days(7))
        .ok_or_else(|| {
            PersistenceError::Query("week end overflows the calendar".to_string())
        })?;
    Ok((encode_date(week_start)?, encode_date(end)?))
}

/// A `(date, route)` pair that already existed during an append upload.
///
/// The stored row is kept untouched; the collision is reported back to
/// the caller instead of failing the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRoute {
    /// The date of the colliding route instance.
    pub date: Date,
    /// The route code that collided.
    pub route_name: String,
}

/// The outcome of persisting one week plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Rows written per table.
    pub counts: RecordCounts,
    /// Collisions observed during an append upload. Always empty for replace.
    pub duplicate_routes: Vec<DuplicateRoute>,
}

/// One stored upload attempt, as returned by history listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// The row identifier, ascending in insertion order.
    pub upload_id: i64,
    /// The original filename supplied by the client.
    pub filename: String,
    /// The Monday the upload targeted, when one was determined.
    pub week_start: Option<Date>,
    /// The requested write mode, `replace` or `append`.
    pub action: String,
    /// Rows written per table. All zero for failed attempts.
    pub counts: RecordCounts,
    /// The terminal outcome, `success` or `failed`.
    pub status: String,
    /// Human-readable failure description, present only on failure.
    pub error_message: Option<String>,
    /// When the attempt was recorded, RFC 3339 in UTC.
    pub created_at: String,
}
