// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of the `Feiertag` sheet.

use crate::cell;
use crate::cell::Cell;
use crate::workbook::SheetGrid;
use tracing::debug;
use wochenplan_domain::PublicHoliday;

/// The holiday rows and their collected warnings.
#[derive(Debug, Clone, Default)]
pub struct HolidaySheet {
    /// Parsed holidays in sheet order.
    pub holidays: Vec<PublicHoliday>,
    /// Collected row-level warnings.
    pub warnings: Vec<String>,
}

/// Parses the `Feiertag` sheet: one row per (date, name).
///
/// A date cell may be native or text in one of four formats; an
/// unparseable date fails the row only. A sheet with no holidays is
/// valid — not every plan period contains one.
#[must_use]
pub fn parse_holiday_sheet(grid: &SheetGrid) -> HolidaySheet {
    let mut sheet: HolidaySheet = HolidaySheet::default();

    for row in 0..grid.row_count() {
        let date_cell: &Cell = grid.cell(row, 0);
        let name: Option<String> = cell::text(grid.cell(row, 1));
        if *date_cell == Cell::Empty && name.is_none() {
            continue;
        }

        match cell::date(date_cell) {
            Some(date) => sheet.holidays.push(PublicHoliday {
                date,
                name: name.unwrap_or_else(|| String::from("Feiertag")),
            }),
            None => {
                // Header rows land here too; only worth a warning when
                // the row actually names a holiday.
                if let Some(name) = name {
                    if !name.eq_ignore_ascii_case("Feiertag") && !name.eq_ignore_ascii_case("Name")
                    {
                        sheet.warnings.push(format!(
                            "Feiertag row {}: unparseable date for '{name}', row skipped",
                            row + 1
                        ));
                    }
                }
            }
        }
    }
    debug!(
        holidays = sheet.holidays.len(),
        warnings = sheet.warnings.len(),
        "holiday sheet parsed"
    );
    sheet
}
