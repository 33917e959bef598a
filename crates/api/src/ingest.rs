// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The ingestion coordinator.
//!
//! Runs the full pipeline for one upload: workbook loading, sheet
//! parsing, plan assembly, and the transactional write. Exactly one
//! upload-history row is recorded per attempt, success or failure —
//! audit is not week data and survives a failed ingestion.

use crate::driver_sheet::{DriverSheet, parse_driver_sheet};
use crate::error::{ApiError, translate_core_error};
use crate::holiday_sheet::{HolidaySheet, parse_holiday_sheet};
use crate::planning_grid::{PlanningGridSheet, parse_planning_grid};
use crate::request_response::{UploadRequest, UploadResponse};
use crate::route_sheet::{RouteSheet, parse_route_sheet};
use crate::workbook::{PlanWorkbook, load_workbook};
use time::OffsetDateTime;
use tracing::{info, warn};
use wochenplan_audit::{UploadAction, UploadAttempt};
use wochenplan_core::{ParsedSheets, WeekPlan, assemble};
use wochenplan_domain::PlanningConfig;
use wochenplan_persistence::{PersistOutcome, SqlitePersistence};

/// Runs one upload end to end and records its audit row.
///
/// # Errors
///
/// Returns the pipeline's first fatal error; the upload-history row is
/// written either way. Fixed-assignment resolution failures and append
/// duplicates are not fatal — they ride along in the success response.
pub fn ingest(
    persistence: &mut SqlitePersistence,
    config: &PlanningConfig,
    request: &UploadRequest,
    max_upload_bytes: usize,
) -> Result<UploadResponse, ApiError> {
    let outcome: Result<UploadResponse, ApiError> =
        run_pipeline(persistence, config, request, max_upload_bytes);
    let timestamp: OffsetDateTime = OffsetDateTime::now_utc();

    let attempt: UploadAttempt = match &outcome {
        Ok(response) => UploadAttempt::success(
            request.filename.clone(),
            request.week_start,
            request.action,
            response.records_created,
            timestamp,
        ),
        Err(err) => UploadAttempt::failure(
            request.filename.clone(),
            Some(request.week_start),
            request.action,
            err.to_string(),
            timestamp,
        ),
    };
    if let Err(err) = persistence.record_upload(&attempt) {
        warn!(error = %err, "failed to record upload history row");
    }
    outcome
}

fn run_pipeline(
    persistence: &mut SqlitePersistence,
    config: &PlanningConfig,
    request: &UploadRequest,
    max_upload_bytes: usize,
) -> Result<UploadResponse, ApiError> {
    let workbook: PlanWorkbook =
        load_workbook(&request.filename, &request.bytes, max_upload_bytes)?;

    let routes: RouteSheet =
        parse_route_sheet(&workbook.routes, &config.saturday_pattern_exempt_codes)?;
    let drivers: DriverSheet = parse_driver_sheet(&workbook.drivers)?;
    let holidays: HolidaySheet = parse_holiday_sheet(&workbook.holidays);
    let grid: PlanningGridSheet = parse_planning_grid(&workbook.grid);

    let mut warnings: Vec<String> = routes.warnings;
    warnings.extend(drivers.warnings);
    warnings.extend(holidays.warnings);
    warnings.extend(grid.warnings);

    let sheets: ParsedSheets = ParsedSheets {
        route_definitions: routes.definitions,
        matrix: routes.matrix,
        drivers: drivers.drivers,
        holidays: holidays.holidays,
        grid: grid.data,
        warnings,
    };

    let plan: WeekPlan = assemble(
        request.week_start,
        sheets,
        &request.unavailable_drivers,
        config,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistOutcome = match request.action {
        UploadAction::Replace => persistence.replace_week(&plan),
        UploadAction::Append => persistence.append_week(&plan),
    }
    .map_err(|err| ApiError::TransactionRollback {
        message: err.to_string(),
    })?;

    for failure in &plan.resolution_failures {
        warn!(%failure, "fixed assignment could not be resolved");
    }
    info!(
        week_start = %request.week_start,
        action = request.action.as_str(),
        routes = persisted.counts.routes,
        drivers = persisted.counts.drivers,
        availability = persisted.counts.driver_availability,
        fixed_assignments = persisted.counts.fixed_assignments,
        duplicates = persisted.duplicate_routes.len(),
        "week ingested"
    );

    let message: String = format!(
        "Week of {} ingested ({}): {} routes, {} drivers, {} availability rows, {} fixed assignments",
        request.week_start,
        request.action.as_str(),
        persisted.counts.routes,
        persisted.counts.drivers,
        persisted.counts.driver_availability,
        persisted.counts.fixed_assignments
    );
    Ok(UploadResponse {
        success: true,
        week_start: request.week_start,
        season: plan.season.as_str().to_string(),
        school_status: plan.school.status.as_str().to_string(),
        records_created: persisted.counts,
        action_taken: request.action.as_str().to_string(),
        message,
        warnings: plan.warnings,
        resolution_failures: plan.resolution_failures,
        duplicate_routes: persisted.duplicate_routes,
    })
}
