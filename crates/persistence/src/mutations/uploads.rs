// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Upload history mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use wochenplan_audit::UploadAttempt;

use crate::data_models::encode_date;
use crate::diesel_schema::upload_history;
use crate::error::PersistenceError;

/// Appends one upload attempt to the history table.
///
/// Both successful and failed attempts are recorded, so the audit trail
/// explains uploads that wrote nothing.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_upload(
    conn: &mut SqliteConnection,
    attempt: &UploadAttempt,
) -> Result<(), PersistenceError> {
    let week_start: Option<String> = attempt.week_start.map(encode_date).transpose()?;
    let created_at: String = attempt
        .timestamp
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Encoding(e.to_string()))?;

    diesel::insert_into(upload_history::table)
        .values((
            upload_history::filename.eq(&attempt.filename),
            upload_history::week_start.eq(week_start.as_deref()),
            upload_history::action.eq(attempt.action.as_str()),
            upload_history::drivers_created.eq(clamp_count(attempt.counts.drivers)),
            upload_history::routes_created.eq(clamp_count(attempt.counts.routes)),
            upload_history::availability_created.eq(clamp_count(attempt.counts.driver_availability)),
            upload_history::fixed_assignments_created
                .eq(clamp_count(attempt.counts.fixed_assignments)),
            upload_history::status.eq(attempt.status.as_str()),
            upload_history::error_message.eq(attempt.error_message.as_deref()),
            upload_history::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    debug!(
        filename = %attempt.filename,
        status = attempt.status.as_str(),
        "recorded upload attempt"
    );
    Ok(())
}

/// Narrows a row count into the history table's integer column.
fn clamp_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
