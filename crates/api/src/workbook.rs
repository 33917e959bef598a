// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workbook loading.
//!
//! Opens the uploaded bytes, locates the four required sheets by exact
//! name, and materialises each as an owned cell grid so the sheet parsers
//! run without further file I/O.

use crate::cell::Cell;
use crate::error::ApiError;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

/// The route-definition sheet name.
pub const SHEET_ROUTES: &str = "Dienste";
/// The driver sheet name.
pub const SHEET_DRIVERS: &str = "Lenker";
/// The public-holiday sheet name.
pub const SHEET_HOLIDAYS: &str = "Feiertag";
/// The planning-grid sheet name.
pub const SHEET_GRID: &str = "Dienstplan";

/// One sheet as an owned grid with absolute cell coordinates.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    /// Builds a grid from rows. Used directly by parser tests.
    #[must_use]
    pub const fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Returns the cell at (row, col), treating out-of-range as empty.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&Cell::Empty)
    }

    /// Returns the number of rows in the grid.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the widest row's column count.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// The four required sheets of an uploaded plan workbook.
#[derive(Debug, Clone)]
pub struct PlanWorkbook {
    /// The `Dienste` sheet.
    pub routes: SheetGrid,
    /// The `Lenker` sheet.
    pub drivers: SheetGrid,
    /// The `Feiertag` sheet.
    pub holidays: SheetGrid,
    /// The `Dienstplan` sheet.
    pub grid: SheetGrid,
}

/// Opens uploaded bytes as a plan workbook.
///
/// # Arguments
///
/// * `filename` - The client-supplied filename, checked for a
///   spreadsheet extension
/// * `bytes` - The uploaded file content
/// * `max_bytes` - The size ceiling, enforced before parsing
///
/// # Errors
///
/// Returns an error if the extension is not `.xlsx`/`.xls`, the file
/// exceeds the ceiling, the bytes are not a readable workbook, or any of
/// the four required sheets is absent.
pub fn load_workbook(
    filename: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<PlanWorkbook, ApiError> {
    let extension: String = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !filename.contains('.') || (extension != "xlsx" && extension != "xls") {
        return Err(ApiError::UnsupportedFileType {
            filename: filename.to_string(),
        });
    }
    if bytes.len() > max_bytes {
        return Err(ApiError::FileTooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|err| ApiError::InvalidInput {
            field: String::from("file"),
            message: format!("not a readable workbook: {err}"),
        })?;

    let sheet_names: Vec<String> = workbook.sheet_names();
    let mut load = |name: &str| -> Result<SheetGrid, ApiError> {
        if !sheet_names.iter().any(|sheet| sheet == name) {
            return Err(ApiError::MissingSheet {
                sheet: name.to_string(),
            });
        }
        let range: Range<Data> =
            workbook
                .worksheet_range(name)
                .map_err(|err| ApiError::InvalidInput {
                    field: String::from("file"),
                    message: format!("sheet '{name}' is unreadable: {err}"),
                })?;
        Ok(materialize(&range))
    };

    let loaded: PlanWorkbook = PlanWorkbook {
        routes: load(SHEET_ROUTES)?,
        drivers: load(SHEET_DRIVERS)?,
        holidays: load(SHEET_HOLIDAYS)?,
        grid: load(SHEET_GRID)?,
    };
    debug!(filename, size = bytes.len(), "workbook loaded");
    Ok(loaded)
}

/// Copies a worksheet range into an absolute-coordinate grid.
fn materialize(range: &Range<Data>) -> SheetGrid {
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset as usize];

    for source_row in range.rows() {
        let mut row: Vec<Cell> = vec![Cell::Empty; col_offset as usize];
        row.extend(source_row.iter().map(convert));
        rows.push(row);
    }
    SheetGrid::new(rows)
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            Cell::Text(value.clone())
        }
        Data::Float(value) => Cell::Number(*value),
        #[allow(clippy::cast_precision_loss)]
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => Cell::DateTime(value.as_f64()),
    }
}
