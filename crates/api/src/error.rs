// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use wochenplan_core::CoreError;
use wochenplan_domain::DomainError;
use wochenplan_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract: every variant carries a stable machine kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The uploaded file is not a spreadsheet.
    UnsupportedFileType {
        /// The rejected filename.
        filename: String,
    },
    /// The uploaded file exceeds the size ceiling.
    FileTooLarge {
        /// The upload size in bytes.
        size: usize,
        /// The configured ceiling in bytes.
        limit: usize,
    },
    /// A required sheet is absent from the workbook.
    MissingSheet {
        /// The sheet name that was not found.
        sheet: String,
    },
    /// A sheet's header band could not be located.
    InvalidHeader {
        /// The sheet the header was expected in.
        sheet: String,
        /// A description of what was missing.
        reason: String,
    },
    /// A sheet parsed to zero usable rows.
    EmptySheet {
        /// The sheet that was empty.
        sheet: String,
    },
    /// Season configuration matched the week zero or multiple times.
    AmbiguousSeason {
        /// A human-readable description of the mismatch.
        message: String,
    },
    /// A manual-unavailability entry names an unknown driver.
    DriverNotFound {
        /// The unmatched driver name as supplied by the caller.
        name: String,
    },
    /// The requested week start is not a Monday.
    NotMonday {
        /// The rejected start date.
        week_start: time::Date,
        /// The actual weekday of the rejected date.
        weekday: String,
        /// The Monday immediately before the rejected date.
        previous_monday: time::Date,
        /// The Monday immediately after the rejected date.
        next_monday: time::Date,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A database failure rolled the whole ingestion back.
    TransactionRollback {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// The stable machine kind string for this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType { .. } => "UnsupportedFileTypeError",
            Self::FileTooLarge { .. } => "FileTooLargeError",
            Self::MissingSheet { .. } => "MissingSheetError",
            Self::InvalidHeader { .. } => "InvalidHeaderError",
            Self::EmptySheet { .. } => "EmptySheetError",
            Self::AmbiguousSeason { .. } => "AmbiguousSeasonError",
            Self::DriverNotFound { .. } => "DriverNotFoundError",
            Self::NotMonday { .. } => "NotMondayError",
            Self::InvalidInput { .. } => "ValidationError",
            Self::TransactionRollback { .. } => "TransactionRollbackError",
            Self::Internal { .. } => "InternalError",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFileType { filename } => {
                write!(
                    f,
                    "Unsupported file type for '{filename}': expected .xlsx or .xls"
                )
            }
            Self::FileTooLarge { size, limit } => {
                write!(f, "File of {size} bytes exceeds the {limit} byte limit")
            }
            Self::MissingSheet { sheet } => {
                write!(f, "Required sheet '{sheet}' is missing from the workbook")
            }
            Self::InvalidHeader { sheet, reason } => {
                write!(f, "Invalid header in sheet '{sheet}': {reason}")
            }
            Self::EmptySheet { sheet } => {
                write!(f, "Sheet '{sheet}' contains no usable rows")
            }
            Self::AmbiguousSeason { message } => {
                write!(f, "Season resolution failed: {message}")
            }
            Self::DriverNotFound { name } => {
                write!(f, "Driver '{name}' not found among known drivers")
            }
            Self::NotMonday {
                week_start,
                weekday,
                previous_monday,
                next_monday,
            } => {
                write!(
                    f,
                    "Week start {week_start} is a {weekday}, not a Monday; nearest Mondays are {previous_monday} and {next_monday}"
                )
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::TransactionRollback { message } => {
                write!(f, "Ingestion rolled back: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::NotMonday {
            week_start,
            weekday,
            previous_monday,
            next_monday,
        } => ApiError::NotMonday {
            week_start,
            weekday: weekday.to_string(),
            previous_monday,
            next_monday,
        },
        DomainError::AmbiguousSeason { .. } => ApiError::AmbiguousSeason {
            message: err.to_string(),
        },
        DomainError::DriverNotFound { name } => ApiError::DriverNotFound { name },
        DomainError::InvalidSeasonRange { .. } | DomainError::InvalidVacationPeriod { .. } => {
            ApiError::InvalidInput {
                field: String::from("planning_config"),
                message: err.to_string(),
            }
        }
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("week_start"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        DomainError::InvalidRouteCode(msg) => ApiError::InvalidInput {
            field: String::from("route_code"),
            message: msg,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Domain(domain_err) => translate_domain_error(domain_err),
    }
}

// Used by the read endpoints; the ingestion path maps persistence
// failures to TransactionRollback explicitly.
impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}
