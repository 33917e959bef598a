// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::input::ParsedSheets;
use crate::plan::WeekPlan;
use std::collections::BTreeMap;
use time::Date;
use tracing::{debug, info};
use wochenplan_domain::{
    apply_frei_rows, apply_grid_markers, apply_holidays, apply_manual_unavailability,
    expand_week_routes, filter_routes, resolve_fixed_assignments, resolve_school_status,
    resolve_season, AssignmentResolution, AvailabilitySet, Driver, FilterOutcome,
    ManualUnavailability, NoWorkMarker, PlanWeek, PlanningConfig, Route, RouteDefinition,
    RouteType, SchoolResolution, Season,
};

/// Assembles the resolved plan for one week from parsed sheet data.
///
/// This is the pure middle of the ingestion pipeline: it resolves the
/// season and school status, filters and expands routes, binds fixed
/// assignments, and merges availability signals in precedence order
/// (holidays, then grid markers, then `frei` fixed codes, then manual
/// entries). It touches no storage.
///
/// # Arguments
///
/// * `week_start` - The requested week start; must be a Monday
/// * `sheets` - The parsed workbook content
/// * `manual` - Caller-supplied unavailability entries
/// * `config` - The planning configuration snapshot
///
/// # Errors
///
/// Returns an error if the week start is not a Monday, the configuration
/// is inconsistent, the season is ambiguous for the week, or a manual
/// entry names an unknown driver. Fixed-assignment resolution failures
/// are collected on the plan, never returned as errors.
pub fn assemble(
    week_start: Date,
    sheets: ParsedSheets,
    manual: &[ManualUnavailability],
    config: &PlanningConfig,
) -> Result<WeekPlan, CoreError> {
    config.validate()?;
    let week: PlanWeek = PlanWeek::new(week_start)?;
    let season: Season = resolve_season(week_start, config)?;
    let school: SchoolResolution = resolve_school_status(&week, &sheets.grid.school_flags, config)?;
    debug!(
        week_start = %week_start,
        season = season.as_str(),
        school_status = school.status.as_str(),
        "resolved week context"
    );

    let mut warnings: Vec<String> = sheets.warnings;
    let mut drivers: Vec<Driver> = sheets.drivers;
    merge_driver_hours(&mut drivers, &sheets.grid.driver_hours, &mut warnings);

    let outcome: FilterOutcome = filter_routes(
        sheets.route_definitions,
        &sheets.matrix,
        season,
        school.status,
        config.unmatrixed_route_policy,
    );
    record_filter_warnings(&outcome, &mut warnings);

    let pattern_offsets: BTreeMap<String, Vec<u8>> = pattern_offsets(&outcome.retained);
    let routes: Vec<Route> = expand_week_routes(&outcome.retained, &week, season, school.status)?;

    let resolution: AssignmentResolution = resolve_fixed_assignments(
        &drivers,
        &week,
        school.status,
        &routes,
        &pattern_offsets,
    )?;

    let mut availability: AvailabilitySet = AvailabilitySet::default();
    apply_holidays(&mut availability, &week, &drivers, &sheets.holidays);
    let unmatched: Vec<NoWorkMarker> =
        apply_grid_markers(&mut availability, &week, &drivers, &sheets.grid.no_work_markers);
    for marker in unmatched {
        warnings.push(format!(
            "No-work marker '{}' on {} names unknown driver '{}'",
            marker.marker, marker.date, marker.driver_name
        ));
    }
    apply_frei_rows(&mut availability, &resolution.frei_unavailability);
    apply_manual_unavailability(&mut availability, &drivers, manual)?;

    info!(
        week_start = %week_start,
        routes = routes.len(),
        drivers = drivers.len(),
        assignments = resolution.assignments.len(),
        availability = availability.len(),
        failures = resolution.failures.len(),
        "assembled week plan"
    );

    Ok(WeekPlan {
        week,
        season,
        school,
        drivers,
        routes,
        assignments: resolution.assignments,
        availability: availability.into_rows(),
        holidays: sheets.holidays,
        resolution_failures: resolution.failures,
        warnings,
    })
}

/// Merges planning-grid hours into the driver attribute structures.
///
/// Rows naming a driver the `Lenker` sheet does not contain become
/// warnings rather than new drivers.
fn merge_driver_hours(
    drivers: &mut [Driver],
    rows: &[wochenplan_domain::DriverHoursRow],
    warnings: &mut Vec<String>,
) {
    for row in rows {
        let Some(driver) = drivers
            .iter_mut()
            .find(|d| d.name().matches_ignore_case(&row.name))
        else {
            warnings.push(format!(
                "Planning grid hours row names unknown driver '{}'",
                row.name
            ));
            continue;
        };
        if let Some(worked) = row.worked_hours {
            driver.details.hours_worked_this_month = Some(worked);
        }
        if let (Some(target), Some(worked)) = (row.target_hours, row.worked_hours) {
            driver.details.remaining_hours_this_month = Some(target - worked);
        }
    }
}

/// Day offsets each retained definition actually covers, keyed by code.
///
/// Fixed-code resolution uses this to know which dates a part like `411`
/// must bind on; codes not in the map fall back to suffix rules.
fn pattern_offsets(definitions: &[RouteDefinition]) -> BTreeMap<String, Vec<u8>> {
    let mut offsets: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    for definition in definitions {
        let covered: Vec<u8> = match definition.route_type {
            RouteType::Saturday => vec![5],
            RouteType::Sunday => vec![6],
            RouteType::Regular => definition.pattern.without_saturday().offsets(),
        };
        offsets.insert(definition.code.value().to_string(), covered);
    }
    offsets
}

fn record_filter_warnings(outcome: &FilterOutcome, warnings: &mut Vec<String>) {
    if !outcome.dropped.is_empty() {
        warnings.push(format!(
            "Routes excluded by the seasonal matrix: {}",
            outcome.dropped.join(", ")
        ));
    }
    if !outcome.unmatrixed.is_empty() {
        warnings.push(format!(
            "Routes absent from the seasonal matrix: {}",
            outcome.unmatrixed.join(", ")
        ));
    }
    if !outcome.unknown_codes.is_empty() {
        warnings.push(format!(
            "Matrix lists codes with no definition row: {}",
            outcome.unknown_codes.join(", ")
        ));
    }
}
