// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of the `Lenker` sheet.

use crate::cell;
use crate::error::ApiError;
use crate::workbook::{SHEET_DRIVERS, SheetGrid};
use tracing::debug;
use wochenplan_domain::{Driver, DriverDetails, DriverName};

/// The driver rows and their collected warnings.
#[derive(Debug, Clone, Default)]
pub struct DriverSheet {
    /// Parsed drivers in sheet order.
    pub drivers: Vec<Driver>,
    /// Collected row-level warnings.
    pub warnings: Vec<String>,
}

/// Parses the `Lenker` sheet.
///
/// The header row is the first row whose leading cell is `Lenker` or
/// `Name`; data rows follow until the first blank name. Duplicate names
/// within the sheet fail the row with a warning.
///
/// # Errors
///
/// Returns `InvalidHeaderError` when no header row exists and
/// `EmptySheetError` when zero driver rows parse.
pub fn parse_driver_sheet(grid: &SheetGrid) -> Result<DriverSheet, ApiError> {
    let header_row: usize = (0..grid.row_count())
        .find(|row| {
            cell::text(grid.cell(*row, 0)).is_some_and(|text| {
                text.eq_ignore_ascii_case("Lenker") || text.eq_ignore_ascii_case("Name")
            })
        })
        .ok_or_else(|| ApiError::InvalidHeader {
            sheet: SHEET_DRIVERS.to_string(),
            reason: String::from("no 'Lenker'/'Name' header row found"),
        })?;

    let mut sheet: DriverSheet = DriverSheet::default();

    for row in (header_row + 1)..grid.row_count() {
        let Some(raw_name) = cell::text(grid.cell(row, 0)) else {
            // The first blank name ends the table.
            break;
        };
        let name: DriverName = DriverName::new(&raw_name);
        if sheet
            .drivers
            .iter()
            .any(|driver| driver.name().matches_ignore_case(name.value()))
        {
            sheet.warnings.push(format!(
                "Lenker row {}: duplicate driver name '{name}', row skipped",
                row + 1
            ));
            continue;
        }

        let details: DriverDetails = DriverDetails {
            monthly_hours_target: cell::text(grid.cell(row, 1)),
            employment_percentage: cell::percentage(grid.cell(row, 2)),
            vacation_hours: cell::text(grid.cell(row, 3)),
            sick_leave_hours: cell::text(grid.cell(row, 4)),
            fixed_route_with_school: cell::text(grid.cell(row, 5)),
            fixed_route_without_school: cell::text(grid.cell(row, 6)),
            ..DriverDetails::default()
        };
        sheet.drivers.push(Driver::new(name, details));
    }

    if sheet.drivers.is_empty() {
        return Err(ApiError::EmptySheet {
            sheet: SHEET_DRIVERS.to_string(),
        });
    }
    debug!(
        drivers = sheet.drivers.len(),
        warnings = sheet.warnings.len(),
        "driver sheet parsed"
    );
    Ok(sheet)
}
