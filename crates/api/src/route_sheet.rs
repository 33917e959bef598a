// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of the `Dienste` sheet.
//!
//! The sheet holds two logical tables: the route-definition rows under a
//! `Dienst-Nr.` header, and the four-column seasonal-eligibility matrix
//! (`SmS`, `SoS`, `WmS`, `WoS`) in the header band.

use crate::cell;
use crate::error::ApiError;
use crate::workbook::{SHEET_ROUTES, SheetGrid};
use tracing::debug;
use wochenplan_domain::{
    EligibilityMatrix, RouteCode, RouteDefinition, RouteType, SchoolStatus, Season, WeekdayPattern,
    split_combined_code,
};

/// Codes in the definition table that mark non-route rows and are
/// skipped silently.
const NON_ROUTE_MARKERS: &[&str] = &["FT", "K", "FREI", "U", "SOF", "MB", "DI"];

/// Rows scanned for the matrix header cells.
const MATRIX_HEADER_BAND: usize = 9;

/// Everything the route sheet produces.
#[derive(Debug, Clone, Default)]
pub struct RouteSheet {
    /// Parsed route definitions.
    pub definitions: Vec<RouteDefinition>,
    /// The seasonal-eligibility matrix.
    pub matrix: EligibilityMatrix,
    /// Collected row-level warnings.
    pub warnings: Vec<String>,
}

/// Parses the `Dienste` sheet.
///
/// # Arguments
///
/// * `grid` - The materialised sheet
/// * `exempt_codes` - Codes whose `SA` suffix keeps the Tag-derived
///   weekday pattern
///
/// # Errors
///
/// Returns `InvalidHeaderError` when no `Dienst-Nr.` header cell exists
/// and `EmptySheetError` when zero route rows parse.
pub fn parse_route_sheet(grid: &SheetGrid, exempt_codes: &[String]) -> Result<RouteSheet, ApiError> {
    let (header_row, code_col) = find_definition_header(grid).ok_or_else(|| {
        ApiError::InvalidHeader {
            sheet: SHEET_ROUTES.to_string(),
            reason: String::from("no 'Dienst-Nr.' header cell found"),
        }
    })?;

    let mut sheet: RouteSheet = RouteSheet {
        matrix: parse_matrix(grid),
        ..RouteSheet::default()
    };

    for row in (header_row + 1)..grid.row_count() {
        let Some(raw_code) = cell::text(grid.cell(row, code_col)) else {
            continue;
        };
        if NON_ROUTE_MARKERS
            .iter()
            .any(|marker| marker.eq_ignore_ascii_case(raw_code.trim()))
        {
            continue;
        }

        let group: Option<String> = code_col
            .checked_sub(1)
            .and_then(|col| cell::text(grid.cell(row, col)));
        let vad_with_school: Option<String> = cell::time_of_day(grid.cell(row, code_col + 1));
        let vad_without_school: Option<String> = cell::time_of_day(grid.cell(row, code_col + 2));
        let diaeten: Option<f64> = cell::decimal(grid.cell(row, code_col + 3));
        let tag: Option<String> = cell::text(grid.cell(row, code_col + 4));
        let location: Option<String> = cell::text(grid.cell(row, code_col + 5));

        // A combined field like `411 + 412` yields independent codes
        // sharing the row's attributes.
        for part in split_combined_code(&raw_code) {
            let code: RouteCode = match RouteCode::new(&part) {
                Ok(code) => code,
                Err(err) => {
                    sheet
                        .warnings
                        .push(format!("Dienste row {}: {err}", row + 1));
                    continue;
                }
            };
            let route_type: RouteType = code.classify(exempt_codes);
            let pattern: WeekdayPattern = resolve_pattern(
                route_type,
                tag.as_deref(),
                &code,
                row,
                &mut sheet.warnings,
            );

            sheet.definitions.push(RouteDefinition {
                code,
                group: group.clone(),
                vad_with_school: vad_with_school.clone(),
                vad_without_school: vad_without_school.clone(),
                diaeten,
                pattern,
                route_type,
                location: location.clone(),
            });
        }
    }

    if sheet.definitions.is_empty() {
        return Err(ApiError::EmptySheet {
            sheet: SHEET_ROUTES.to_string(),
        });
    }
    debug!(
        definitions = sheet.definitions.len(),
        warnings = sheet.warnings.len(),
        "route sheet parsed"
    );
    Ok(sheet)
}

fn find_definition_header(grid: &SheetGrid) -> Option<(usize, usize)> {
    for row in 0..grid.row_count() {
        for col in 0..grid.col_count() {
            if let Some(text) = cell::text(grid.cell(row, col)) {
                if text.trim_end_matches('.').eq_ignore_ascii_case("Dienst-Nr") {
                    return Some((row, col));
                }
            }
        }
    }
    None
}

fn resolve_pattern(
    route_type: RouteType,
    tag: Option<&str>,
    code: &RouteCode,
    row: usize,
    warnings: &mut Vec<String>,
) -> WeekdayPattern {
    match route_type {
        RouteType::Saturday => WeekdayPattern::saturday_only(),
        RouteType::Sunday => WeekdayPattern::sunday_only(),
        RouteType::Regular => match tag {
            Some(text) => WeekdayPattern::parse(text).unwrap_or_else(|| {
                warnings.push(format!(
                    "Dienste row {}: unparseable Tag pattern '{text}' for route {code}, assuming Mo-Fr",
                    row + 1
                ));
                WeekdayPattern::monday_to_friday()
            }),
            None => WeekdayPattern::monday_to_friday(),
        },
    }
}

/// Locates the `SmS`/`SoS`/`WmS`/`WoS` header cells in the header band
/// and collects every code listed below each.
fn parse_matrix(grid: &SheetGrid) -> EligibilityMatrix {
    let mut matrix: EligibilityMatrix = EligibilityMatrix::default();

    for row in 0..MATRIX_HEADER_BAND.min(grid.row_count()) {
        for col in 0..grid.col_count() {
            let Some(header) = cell::text(grid.cell(row, col)) else {
                continue;
            };
            let Some((season, status)) = matrix_column(&header) else {
                continue;
            };
            for data_row in (row + 1)..grid.row_count() {
                if let Some(code) = cell::text(grid.cell(data_row, col)) {
                    matrix.insert(season, status, code);
                }
            }
        }
    }
    matrix
}

fn matrix_column(header: &str) -> Option<(Season, SchoolStatus)> {
    match header {
        "SmS" => Some((Season::Summer, SchoolStatus::WithSchool)),
        "SoS" => Some((Season::Summer, SchoolStatus::WithoutSchool)),
        "WmS" => Some((Season::Winter, SchoolStatus::WithSchool)),
        "WoS" => Some((Season::Winter, SchoolStatus::WithoutSchool)),
        _ => None,
    }
}
