// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of the `Dienstplan` planning grid.
//!
//! Three extractions from one sheet: the per-date school flags (the row
//! above the calendar's date row), the per-(driver, date) no-work
//! markers, and the driver-hours section (Soll/Ist columns).

use crate::cell;
use crate::workbook::SheetGrid;
use std::collections::BTreeMap;
use time::Date;
use tracing::debug;
use wochenplan_domain::{DriverHoursRow, NoWorkMarker, PlanningGridData};

/// Rows scanned for the calendar's date row.
const DATE_ROW_BAND: usize = 20;
/// Columns scanned for date cells within the band.
const DATE_COL_BAND: usize = 20;
/// Date cells required before a row counts as the date row.
const MIN_DATE_CELLS: usize = 2;

/// Cell texts that mark a driver as not working that date.
const NO_WORK_MARKERS: &[&str] = &["frei", "u", "urlaub", "k", "krank", "ft"];

/// The grid extractions and their collected warnings.
#[derive(Debug, Clone, Default)]
pub struct PlanningGridSheet {
    /// School flags, no-work markers and driver hours.
    pub data: PlanningGridData,
    /// Collected warnings.
    pub warnings: Vec<String>,
}

/// Parses the `Dienstplan` sheet.
///
/// The grid is advisory: a sheet without a recognisable calendar band
/// yields empty extractions and a warning, never a failure.
#[must_use]
pub fn parse_planning_grid(grid: &SheetGrid) -> PlanningGridSheet {
    let mut sheet: PlanningGridSheet = PlanningGridSheet::default();

    let Some((date_row, date_cols)) = find_date_row(grid) else {
        sheet
            .warnings
            .push(String::from("Dienstplan: no calendar date row found"));
        return sheet;
    };

    sheet.data.school_flags = school_flags(grid, date_row, &date_cols);

    if let Some(header_row) = find_driver_header(grid, date_row) {
        extract_driver_rows(grid, header_row, &date_cols, &mut sheet.data);
    } else {
        sheet
            .warnings
            .push(String::from("Dienstplan: no driver header row found"));
    }

    debug!(
        school_flags = sheet.data.school_flags.len(),
        markers = sheet.data.no_work_markers.len(),
        hours_rows = sheet.data.driver_hours.len(),
        "planning grid parsed"
    );
    sheet
}

/// Scans the calendar band for the row holding the week's date cells.
fn find_date_row(grid: &SheetGrid) -> Option<(usize, BTreeMap<usize, Date>)> {
    for row in 0..DATE_ROW_BAND.min(grid.row_count()) {
        let mut dates: BTreeMap<usize, Date> = BTreeMap::new();
        for col in 2..DATE_COL_BAND.min(grid.col_count().max(2)) {
            if let Some(date) = cell::date(grid.cell(row, col)) {
                dates.insert(col, date);
            }
        }
        if dates.len() >= MIN_DATE_CELLS {
            return Some((row, dates));
        }
    }
    None
}

/// Reads the school row (one above the date row): text containing `frei`
/// or `ohne` marks a non-school date. Dates whose school cell is blank
/// contribute no flag.
fn school_flags(
    grid: &SheetGrid,
    date_row: usize,
    date_cols: &BTreeMap<usize, Date>,
) -> BTreeMap<Date, bool> {
    let mut flags: BTreeMap<Date, bool> = BTreeMap::new();
    let Some(school_row) = date_row.checked_sub(1) else {
        return flags;
    };
    for (col, date) in date_cols {
        if let Some(text) = cell::text(grid.cell(school_row, *col)) {
            let lowered: String = text.to_lowercase();
            let is_school: bool = !lowered.contains("frei") && !lowered.contains("ohne");
            flags.insert(*date, is_school);
        }
    }
    flags
}

fn find_driver_header(grid: &SheetGrid, date_row: usize) -> Option<usize> {
    ((date_row + 1)..grid.row_count()).find(|row| {
        cell::text(grid.cell(*row, 0)).is_some_and(|text| {
            text.eq_ignore_ascii_case("Lenker") || text.eq_ignore_ascii_case("Name")
        })
    })
}

/// Walks the driver rows below the header, collecting no-work markers
/// from the date columns and hours from the Soll/Ist columns.
fn extract_driver_rows(
    grid: &SheetGrid,
    header_row: usize,
    date_cols: &BTreeMap<usize, Date>,
    data: &mut PlanningGridData,
) {
    let soll_col: Option<usize> = find_header_col(grid, header_row, "Soll");
    let ist_col: Option<usize> = find_header_col(grid, header_row, "Ist");

    for row in (header_row + 1)..grid.row_count() {
        let Some(name) = cell::text(grid.cell(row, 0)) else {
            break;
        };

        for (col, date) in date_cols {
            let Some(marker) = cell::text(grid.cell(row, *col)) else {
                continue;
            };
            if NO_WORK_MARKERS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(&marker))
            {
                data.no_work_markers.push(NoWorkMarker {
                    driver_name: name.clone(),
                    date: *date,
                    marker,
                });
            }
        }

        let target_hours: Option<f64> = soll_col.and_then(|col| cell::hours(grid.cell(row, col)));
        let worked_hours: Option<f64> = ist_col.and_then(|col| cell::hours(grid.cell(row, col)));
        if target_hours.is_some() || worked_hours.is_some() {
            data.driver_hours.push(DriverHoursRow {
                name,
                target_hours,
                worked_hours,
            });
        }
    }
}

fn find_header_col(grid: &SheetGrid, header_row: usize, label: &str) -> Option<usize> {
    (0..grid.col_count())
        .find(|col| cell::text(grid.cell(header_row, *col)).is_some_and(|t| t == label))
}
