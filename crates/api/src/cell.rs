// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cell values and per-column coercions.
//!
//! Sheets are materialised as grids of [`Cell`] values; each parser picks
//! the coercion matching its column's meaning. Coercions return `None`
//! rather than erroring, leaving the row-level decision to the parser.

use time::{Date, macros::date, macros::format_description};

/// One spreadsheet cell, decoupled from the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// An empty or error cell.
    Empty,
    /// A textual cell.
    Text(String),
    /// A numeric cell.
    Number(f64),
    /// A date/time cell as an Excel serial value (days since the Excel
    /// epoch, fraction of a day for the time component).
    DateTime(f64),
    /// A boolean cell.
    Bool(bool),
}

/// The Excel serial epoch. Serial 1 is 1899-12-31 under the (universal in
/// practice) 1900 date system with its phantom leap day.
const EXCEL_EPOCH: Date = date!(1899 - 12 - 30);

const TEXT_DATE_FORMATS: [&[time::format_description::BorrowedFormatItem<'static>]; 4] = [
    format_description!("[day]-[month]-[year]"),
    format_description!("[day].[month].[year]"),
    format_description!("[year]-[month]-[day]"),
    format_description!("[day]/[month]/[year]"),
];

/// Coerces a cell to trimmed non-empty text.
///
/// Numbers render without a trailing `.0` so numeric route codes read
/// back as written (`411`, not `411.0`).
#[must_use]
pub fn text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(value) => {
            let trimmed: &str = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Cell::Number(value) => {
            if value.fract() == 0.0 {
                Some(format!("{value:.0}"))
            } else {
                Some(value.to_string())
            }
        }
        Cell::Bool(value) => Some(value.to_string()),
        Cell::Empty | Cell::DateTime(_) => None,
    }
}

/// Coerces a cell to a decimal number, tolerating a German decimal comma.
#[must_use]
pub fn decimal(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(value) => Some(*value),
        Cell::Text(value) => value.trim().replace(',', ".").parse().ok(),
        Cell::Empty | Cell::DateTime(_) | Cell::Bool(_) => None,
    }
}

/// Coerces a cell to a whole-number percentage.
///
/// Spreadsheet percentage cells hold the fraction (`0.75` for 75%);
/// values above 1 are taken as already scaled.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn percentage(cell: &Cell) -> Option<i32> {
    let value: f64 = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => text.trim().trim_end_matches('%').trim().parse().ok()?,
        Cell::Empty | Cell::DateTime(_) | Cell::Bool(_) => return None,
    };
    if (0.0..=1.0).contains(&value) {
        Some((value * 100.0).round() as i32)
    } else {
        Some(value.round() as i32)
    }
}

/// Coerces a cell to an hour quantity.
///
/// Accepts `HH:MM` text, a plain decimal (comma tolerant), or a time
/// cell whose day fraction converts to hours.
#[must_use]
pub fn hours(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Text(value) => {
            let trimmed: &str = value.trim();
            if let Some((h, m)) = trimmed.split_once(':') {
                let h: f64 = h.trim().parse().ok()?;
                let m: f64 = m.trim().parse().ok()?;
                Some(h + m / 60.0)
            } else {
                trimmed.replace(',', ".").parse().ok()
            }
        }
        Cell::Number(value) => Some(*value),
        Cell::DateTime(serial) => Some(serial.fract() * 24.0),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Coerces a cell to an `HH:MM` time-of-day string.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn time_of_day(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(value) => {
            let trimmed: &str = value.trim();
            let (h, m) = trimmed.split_once(':')?;
            let h: u32 = h.trim().parse().ok()?;
            let m: u32 = m.trim().parse().ok()?;
            (h < 24 && m < 60).then(|| format!("{h:02}:{m:02}"))
        }
        Cell::Number(serial) | Cell::DateTime(serial) => {
            let fraction: f64 = serial.fract();
            let total_minutes: u32 = (fraction * 24.0 * 60.0).round() as u32;
            Some(format!(
                "{:02}:{:02}",
                (total_minutes / 60) % 24,
                total_minutes % 60
            ))
        }
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Coerces a cell to a calendar date.
///
/// Accepts a native date cell or text in `dd-mm-yyyy`, `dd.mm.yyyy`,
/// `yyyy-mm-dd`, or `dd/mm/yyyy`.
#[must_use]
pub fn date(cell: &Cell) -> Option<Date> {
    match cell {
        Cell::DateTime(serial) => serial_to_date(*serial),
        Cell::Text(value) => {
            let trimmed: &str = value.trim();
            TEXT_DATE_FORMATS
                .iter()
                .find_map(|format| Date::parse(trimmed, *format).ok())
        }
        Cell::Number(serial) => serial_to_date(*serial),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
fn serial_to_date(serial: f64) -> Option<Date> {
    // Whole-day serials below ~60 are times or garbage, not plan dates.
    let days: f64 = serial.trunc();
    if days < 61.0 {
        return None;
    }
    Date::from_julian_day(EXCEL_EPOCH.to_julian_day().checked_add(days as i32)?).ok()
}
