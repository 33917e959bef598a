// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Upload history queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use wochenplan_audit::RecordCounts;

use crate::data_models::{UploadRecord, decode_date};
use crate::diesel_schema::upload_history;
use crate::error::PersistenceError;

/// Diesel Queryable struct for upload history rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = upload_history)]
struct UploadRow {
    upload_id: i64,
    filename: String,
    week_start: Option<String>,
    action: String,
    drivers_created: i32,
    routes_created: i32,
    availability_created: i32,
    fixed_assignments_created: i32,
    status: String,
    error_message: Option<String>,
    created_at: String,
}

/// Retrieves the most recent upload attempts, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn recent_uploads(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<UploadRecord>, PersistenceError> {
    let rows: Vec<UploadRow> = upload_history::table
        .order(upload_history::upload_id.desc())
        .limit(limit)
        .select(UploadRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let week_start = row
                .week_start
                .as_deref()
                .map(decode_date)
                .transpose()?;
            Ok(UploadRecord {
                upload_id: row.upload_id,
                filename: row.filename,
                week_start,
                action: row.action,
                counts: RecordCounts {
                    drivers: widen_count(row.drivers_created),
                    routes: widen_count(row.routes_created),
                    driver_availability: widen_count(row.availability_created),
                    fixed_assignments: widen_count(row.fixed_assignments_created),
                },
                status: row.status,
                error_message: row.error_message,
                created_at: row.created_at,
            })
        })
        .collect()
}

/// Widens a stored count column; negative values read as zero.
fn widen_count(count: i32) -> usize {
    usize::try_from(count).unwrap_or_default()
}
