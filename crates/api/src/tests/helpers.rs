// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for end-to-end ingestion tests.
//!
//! The workbook builder produces a real `.xlsx` byte stream with the
//! four German sheets, small but shaped like the production files:
//! grouped route rows, the four-column eligibility matrix, a holiday
//! on the week's Monday, and a calendar grid with school indicators
//! and Soll/Ist hours.

use rust_xlsxwriter::{Workbook, Worksheet};
use time::Date;
use time::macros::date;

use wochenplan_audit::UploadAction;
use wochenplan_domain::PlanningConfig;

use crate::request_response::UploadRequest;
use crate::workbook::{SHEET_DRIVERS, SHEET_GRID, SHEET_HOLIDAYS, SHEET_ROUTES};

pub const WEEK_START: Date = date!(2025 - 09 - 08);

pub fn create_test_config() -> PlanningConfig {
    PlanningConfig::default()
}

pub fn create_upload_request(bytes: Vec<u8>, action: UploadAction) -> UploadRequest {
    UploadRequest {
        filename: "dienstplan_kw37.xlsx".to_string(),
        bytes,
        week_start: WEEK_START,
        action,
        unavailable_drivers: Vec::new(),
    }
}

/// Builds the standard four-sheet test workbook.
pub fn create_test_workbook() -> Vec<u8> {
    build_workbook(&[SHEET_ROUTES, SHEET_DRIVERS, SHEET_HOLIDAYS, SHEET_GRID])
}

/// Builds a workbook containing only the named sheets.
pub fn build_workbook(sheets: &[&str]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for name in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        match *name {
            SHEET_ROUTES => fill_routes(sheet),
            SHEET_DRIVERS => fill_drivers(sheet),
            SHEET_HOLIDAYS => fill_holidays(sheet),
            SHEET_GRID => fill_grid(sheet),
            other => panic!("unknown test sheet '{other}'"),
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// `Dienste`: two Mo-Fr routes, one Saturday route, full matrix.
fn fill_routes(sheet: &mut Worksheet) {
    for (col, header) in [
        (1, "Dienst-Nr."),
        (2, "VAD mS"),
        (3, "VAD oS"),
        (4, "Diäten"),
        (5, "Tag"),
        (6, "KFZ-Ort"),
        (8, "SmS"),
        (9, "SoS"),
        (10, "WmS"),
        (11, "WoS"),
    ] {
        sheet.write_string(0, col, header).unwrap();
    }

    for (row, code, tag) in [(1, "411", "Mo-Fr"), (2, "412", "Mo-Fr"), (3, "452SA", "Sa")] {
        sheet.write_string(row, 0, "Linie 4").unwrap();
        sheet.write_string(row, 1, code).unwrap();
        sheet.write_string(row, 2, "05:30").unwrap();
        sheet.write_string(row, 3, "06:15").unwrap();
        sheet.write_number(row, 4, 1.0).unwrap();
        sheet.write_string(row, 5, tag).unwrap();
        sheet.write_string(row, 6, "Graz").unwrap();

        // Every code is eligible in every matrix column.
        for col in 8..=11 {
            sheet.write_string(row, col, code).unwrap();
        }
    }
}

/// `Lenker`: two drivers, the first with a fixed route.
fn fill_drivers(sheet: &mut Worksheet) {
    sheet.write_string(0, 0, "Lenker").unwrap();
    sheet.write_string(0, 1, "Soll h").unwrap();

    sheet.write_string(1, 0, "Huber Max").unwrap();
    sheet.write_string(1, 1, "173:00").unwrap();
    sheet.write_number(1, 2, 100.0).unwrap();
    sheet.write_string(1, 5, "411").unwrap();
    sheet.write_string(1, 6, "411").unwrap();

    sheet.write_string(2, 0, "Maier Anna").unwrap();
    sheet.write_string(2, 1, "173:00").unwrap();
    sheet.write_number(2, 2, 100.0).unwrap();
}

/// `Feiertag`: a header row and one holiday on the week's Monday.
fn fill_holidays(sheet: &mut Worksheet) {
    sheet.write_string(0, 0, "Datum").unwrap();
    sheet.write_string(0, 1, "Feiertag").unwrap();
    sheet.write_string(1, 0, "08.09.2025").unwrap();
    sheet.write_string(1, 1, "Testfeiertag").unwrap();
}

/// `Dienstplan`: school row, date row, driver rows with one `U` marker
/// and Soll/Ist hours.
fn fill_grid(sheet: &mut Worksheet) {
    sheet.write_string(0, 2, "Schule").unwrap();
    sheet.write_string(0, 3, "Schule").unwrap();

    sheet.write_string(1, 0, "KW 37").unwrap();
    sheet.write_string(1, 2, "08.09.2025").unwrap();
    sheet.write_string(1, 3, "09.09.2025").unwrap();

    sheet.write_string(2, 0, "Lenker").unwrap();
    sheet.write_string(2, 4, "Soll").unwrap();
    sheet.write_string(2, 5, "Ist").unwrap();

    sheet.write_string(3, 0, "Huber Max").unwrap();
    sheet.write_string(3, 3, "U").unwrap();
    sheet.write_string(3, 4, "173:00").unwrap();
    sheet.write_number(3, 5, 120.5).unwrap();

    sheet.write_string(4, 0, "Maier Anna").unwrap();
    sheet.write_string(4, 4, "173:00").unwrap();
    sheet.write_number(4, 5, 98.0).unwrap();
}
