// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

/// Cell values in the route sheet's code column that are roster markers,
/// not route codes. `FT` public holiday, `K` sick, `FREI` free, `U`
/// vacation, `SOF`/`MB`/`DI` special duties.
pub const NON_ROUTE_MARKERS: [&str; 7] = ["FT", "K", "FREI", "U", "SOF", "MB", "DI"];

/// Represents the season half of the eligibility key.
///
/// The eligibility matrix in the route sheet carries exactly four columns,
/// two per season, so the label set is closed even though the calendar
/// ranges behind each label are configuration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Summer timetable.
    Summer,
    /// Winter timetable.
    Winter,
}

impl Season {
    /// Returns the string representation of this season.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summer => "summer",
            Self::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summer" => Ok(Self::Summer),
            "winter" => Ok(Self::Winter),
            _ => Err(DomainError::InvalidSeasonRange {
                label: s.to_string(),
                reason: String::from("season label must be 'summer' or 'winter'"),
            }),
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the weekly school status.
///
/// School status is a property of the whole week, never of a single day.
/// It selects the fixed-route variant (`mS`/`oS`) and the VAD variant for
/// every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolStatus {
    /// School is in session (`mit Schule`).
    #[serde(rename = "mit_schule")]
    WithSchool,
    /// School is out (`ohne Schule`).
    #[serde(rename = "ohne_schule")]
    WithoutSchool,
}

impl SchoolStatus {
    /// Returns the string representation of this school status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WithSchool => "mit_schule",
            Self::WithoutSchool => "ohne_schule",
        }
    }
}

impl std::fmt::Display for SchoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the service pattern class of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    /// Monday through Friday service.
    Regular,
    /// Saturday-only service (`…SA` codes).
    Saturday,
    /// Sunday-only service (`…SO` codes).
    Sunday,
}

impl RouteType {
    /// Returns the string representation of this route type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

/// Represents a special duty a driver can be fixed to instead of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialDuty {
    /// Mobile office duty (`MB`).
    Mobilbuero,
    /// Dispatch duty (`DI`).
    Dispo,
    /// Special transport duty (`SOF`).
    Sonderfahrt,
}

impl SpecialDuty {
    /// Parses a special duty from its roster code.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "MB" => Some(Self::Mobilbuero),
            "DI" => Some(Self::Dispo),
            "SOF" => Some(Self::Sonderfahrt),
            _ => None,
        }
    }

    /// Returns the roster code of this duty.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mobilbuero => "MB",
            Self::Dispo => "DI",
            Self::Sonderfahrt => "SOF",
        }
    }

    /// Returns the human-readable duty name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Mobilbuero => "Mobilbüro",
            Self::Dispo => "Dispo",
            Self::Sonderfahrt => "Sonderfahrt",
        }
    }
}

/// Represents a driver's name, the natural key for driver identity.
///
/// Names are stored with their original casing but matched
/// case-insensitively where callers supply them (manual unavailability).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverName {
    /// The trimmed name value.
    value: String,
}

impl DriverName {
    /// Creates a new `DriverName`, trimming surrounding whitespace.
    ///
    /// # Arguments
    ///
    /// * `value` - The name as it appears in the sheet
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the name value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns whether the name is empty after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Compares against a caller-supplied name, ignoring ASCII case.
    #[must_use]
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.value.eq_ignore_ascii_case(other.trim())
    }
}

impl std::fmt::Display for DriverName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a single route code (e.g. `411`, `452SA`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteCode {
    /// The trimmed code value.
    value: String,
}

impl RouteCode {
    /// Creates a new `RouteCode`.
    ///
    /// # Arguments
    ///
    /// * `value` - The code as it appears in the sheet
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRouteCode` if the code is empty after
    /// trimming.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidRouteCode(String::from(
                "route code is empty",
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Classifies this code by its suffix.
    ///
    /// Codes ending in `SA` are Saturday-only and codes ending in `SO` are
    /// Sunday-only, unless the code is listed in `exempt_codes`, in which
    /// case the suffix is ignored and the code is regular service whose
    /// weekday pattern comes from the sheet's `Tag` column.
    #[must_use]
    pub fn classify(&self, exempt_codes: &[String]) -> RouteType {
        if exempt_codes
            .iter()
            .any(|ex| ex.eq_ignore_ascii_case(&self.value))
        {
            return RouteType::Regular;
        }
        let upper: String = self.value.to_uppercase();
        if upper.ends_with("SA") {
            RouteType::Saturday
        } else if upper.ends_with("SO") {
            RouteType::Sunday
        } else {
            RouteType::Regular
        }
    }
}

impl std::fmt::Display for RouteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Splits a possibly combined code field (`411 + 412`) into its parts.
///
/// Single codes come back as a one-element vector. Empty parts are
/// dropped, so `411 +` yields just `411`.
#[must_use]
pub fn split_combined_code(raw: &str) -> Vec<String> {
    raw.split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Represents the set of weekdays a route runs on.
///
/// Day indices follow the sheet convention: 0 is Monday, 6 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayPattern {
    /// One flag per day offset, Monday first.
    days: [bool; 7],
}

impl WeekdayPattern {
    /// Creates an empty pattern covering no days.
    #[must_use]
    pub const fn empty() -> Self {
        Self { days: [false; 7] }
    }

    /// Creates the Monday-through-Friday pattern.
    #[must_use]
    pub const fn monday_to_friday() -> Self {
        Self {
            days: [true, true, true, true, true, false, false],
        }
    }

    /// Creates the Saturday-only pattern.
    #[must_use]
    pub const fn saturday_only() -> Self {
        Self {
            days: [false, false, false, false, false, true, false],
        }
    }

    /// Creates the Sunday-only pattern.
    #[must_use]
    pub const fn sunday_only() -> Self {
        Self {
            days: [false, false, false, false, false, false, true],
        }
    }

    /// Parses a sheet day pattern such as `Mo-Fr`, `Mo-Sa` or `Sa.`.
    ///
    /// Returns `None` when the text matches no known day vocabulary.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let trimmed: &str = tag.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some((start_name, end_name)) = trimmed.split_once('-') {
            let start: u8 = day_abbrev_to_offset(start_name)?;
            let end: u8 = day_abbrev_to_offset(end_name)?;
            if start > end {
                return None;
            }
            let mut days: [bool; 7] = [false; 7];
            for offset in start..=end {
                days[usize::from(offset)] = true;
            }
            return Some(Self { days });
        }

        let single: u8 = day_abbrev_to_offset(trimmed)?;
        let mut days: [bool; 7] = [false; 7];
        days[usize::from(single)] = true;
        Some(Self { days })
    }

    /// Returns whether the pattern covers the given day offset (0 Monday).
    #[must_use]
    pub const fn contains_offset(&self, offset: u8) -> bool {
        offset < 7 && self.days[offset as usize]
    }

    /// Returns the covered day offsets in ascending order.
    #[must_use]
    pub fn offsets(&self) -> Vec<u8> {
        (0..7u8).filter(|o| self.days[usize::from(*o)]).collect()
    }

    /// Returns this pattern with Saturday removed.
    ///
    /// Saturday service is modelled exclusively through `…SA` codes, so a
    /// regular route whose `Tag` column says `Mo-Sa` still only runs
    /// Monday through Friday.
    #[must_use]
    pub const fn without_saturday(mut self) -> Self {
        self.days[5] = false;
        self
    }

    /// Returns whether the pattern covers no days at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|covered| !covered)
    }
}

/// Maps a German day abbreviation (with or without a trailing dot) to its
/// day offset, 0 Monday through 6 Sunday.
#[must_use]
pub fn day_abbrev_to_offset(abbrev: &str) -> Option<u8> {
    let cleaned: &str = abbrev.trim().trim_end_matches('.');
    match cleaned.to_ascii_lowercase().as_str() {
        "mo" => Some(0),
        "di" => Some(1),
        "mi" => Some(2),
        "do" => Some(3),
        "fr" => Some(4),
        "sa" => Some(5),
        "so" => Some(6),
        _ => None,
    }
}

/// Returns the German day name for a date, used for display columns.
#[must_use]
pub const fn german_day_name(weekday: time::Weekday) -> &'static str {
    match weekday {
        time::Weekday::Monday => "Montag",
        time::Weekday::Tuesday => "Dienstag",
        time::Weekday::Wednesday => "Mittwoch",
        time::Weekday::Thursday => "Donnerstag",
        time::Weekday::Friday => "Freitag",
        time::Weekday::Saturday => "Samstag",
        time::Weekday::Sunday => "Sonntag",
    }
}

/// Typed attribute structure for a driver.
///
/// Named fields cover the known sheet columns; `extra` carries any
/// attribute not yet formalised as a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DriverDetails {
    /// Monthly target hours, stored verbatim as written in the sheet.
    pub monthly_hours_target: Option<String>,
    /// Employment percentage (e.g. 100, 75).
    pub employment_percentage: Option<i32>,
    /// Holiday time marker, stored verbatim.
    pub vacation_hours: Option<String>,
    /// Sick-leave time marker, stored verbatim.
    pub sick_leave_hours: Option<String>,
    /// Hours already worked this month, from the planning grid.
    pub hours_worked_this_month: Option<f64>,
    /// Remaining hours this month, from the planning grid.
    pub remaining_hours_this_month: Option<f64>,
    /// Fixed-route code applying while school is in session.
    pub fixed_route_with_school: Option<String>,
    /// Fixed-route code applying while school is out.
    pub fixed_route_without_school: Option<String>,
    /// Attributes without a formalised field yet.
    pub extra: BTreeMap<String, String>,
}

impl DriverDetails {
    /// Returns the fixed-route code for the given school status, if one is
    /// set and non-empty.
    #[must_use]
    pub fn fixed_route_for(&self, status: SchoolStatus) -> Option<&str> {
        let code: &Option<String> = match status {
            SchoolStatus::WithSchool => &self.fixed_route_with_school,
            SchoolStatus::WithoutSchool => &self.fixed_route_without_school,
        };
        code.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Represents a driver.
///
/// Drivers are identified by name; the numeric id only exists once the
/// driver has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the driver has not been persisted yet.
    driver_id: Option<i64>,
    /// The driver's name (natural key).
    name: DriverName,
    /// The driver's attribute structure.
    pub details: DriverDetails,
}

// Two drivers are the same driver if they share a name, regardless of ids.
impl PartialEq for Driver {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Driver {
    /// Creates a new `Driver` without a persisted id.
    #[must_use]
    pub const fn new(name: DriverName, details: DriverDetails) -> Self {
        Self {
            driver_id: None,
            name,
            details,
        }
    }

    /// Creates a `Driver` with an existing persisted id.
    #[must_use]
    pub const fn with_id(driver_id: i64, name: DriverName, details: DriverDetails) -> Self {
        Self {
            driver_id: Some(driver_id),
            name,
            details,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn driver_id(&self) -> Option<i64> {
        self.driver_id
    }

    /// Returns the driver's name.
    #[must_use]
    pub const fn name(&self) -> &DriverName {
        &self.name
    }
}

/// Typed attribute structure for a dated route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetails {
    /// The route's service pattern class.
    pub route_type: RouteType,
    /// Duty duration in hours.
    pub duration_hours: Option<f64>,
    /// Per-diem value in hours-equivalent units.
    pub diaeten: Option<f64>,
    /// Scheduled reporting time (`HH:MM`) under the active school status.
    pub vad_time: Option<String>,
    /// Vehicle location.
    pub location: Option<String>,
    /// Season the route was ingested under.
    pub season: Season,
    /// School status the route was ingested under.
    pub school_status: SchoolStatus,
    /// Duty code when the route represents a named duty.
    pub duty_code: Option<String>,
    /// Duty display name when the route represents a named duty.
    pub duty_name: Option<String>,
    /// Attributes without a formalised field yet.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// Represents a route on a concrete date.
///
/// `(date, name)` is the uniqueness boundary; a second route with the same
/// pair in one week is a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// The canonical numeric identifier assigned by the database.
    route_id: Option<i64>,
    /// The date this route runs on.
    pub date: Date,
    /// The route code.
    pub name: RouteCode,
    /// The route's attribute structure.
    pub details: RouteDetails,
}

// Two routes are the same route if they share (date, name).
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.name == other.name
    }
}

impl Route {
    /// Creates a new `Route` without a persisted id.
    #[must_use]
    pub const fn new(date: Date, name: RouteCode, details: RouteDetails) -> Self {
        Self {
            route_id: None,
            date,
            name,
            details,
        }
    }

    /// Creates a `Route` with an existing persisted id.
    #[must_use]
    pub const fn with_id(route_id: i64, date: Date, name: RouteCode, details: RouteDetails) -> Self {
        Self {
            route_id: Some(route_id),
            date,
            name,
            details,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn route_id(&self) -> Option<i64> {
        self.route_id
    }
}

/// Represents one driver's availability on one date.
///
/// `(driver, date)` is an upsert boundary: re-deriving availability for
/// the same pair updates the row instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAvailability {
    /// The driver this row belongs to.
    pub driver_name: DriverName,
    /// The date this row covers.
    pub date: Date,
    /// Whether the driver is available for assignment.
    pub available: bool,
    /// Optional shift preference.
    pub shift_preference: Option<String>,
    /// Optional notes describing why the row exists.
    pub notes: Option<String>,
}

impl DriverAvailability {
    /// Creates an unavailable row with a note.
    #[must_use]
    pub const fn unavailable(driver_name: DriverName, date: Date, notes: Option<String>) -> Self {
        Self {
            driver_name,
            date,
            available: false,
            shift_preference: None,
            notes,
        }
    }

    /// Appends a note, joining with `; ` when a note already exists.
    pub fn append_note(&mut self, note: &str) {
        match &mut self.notes {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(note);
            }
            None => self.notes = Some(note.to_string()),
        }
    }
}

/// Distinguishes fixed assignments bound to a route from special duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    /// Assignment to a concrete route.
    Regular,
    /// Route-less special duty (MB/DI/SOF).
    SpecialDuty,
}

impl AssignmentKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::SpecialDuty => "special_duty",
        }
    }
}

/// Typed detail structure for a fixed assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssignmentDetails {
    /// Whether this binds a route or a special duty.
    pub kind: AssignmentKind,
    /// Duty code for special duties.
    pub duty_code: Option<String>,
    /// Duty display name for special duties.
    pub duty_name: Option<String>,
    /// Whether the assignment blocks any further regular assignment.
    pub blocks_regular_assignment: bool,
    /// Sibling codes of a combined fixed code (`411 + 412`).
    #[serde(default)]
    pub linked_routes: Vec<String>,
}

impl FixedAssignmentDetails {
    /// Creates details for a regular route binding.
    #[must_use]
    pub const fn regular(linked_routes: Vec<String>) -> Self {
        Self {
            kind: AssignmentKind::Regular,
            duty_code: None,
            duty_name: None,
            blocks_regular_assignment: false,
            linked_routes,
        }
    }

    /// Creates details for a route-less special duty.
    #[must_use]
    pub fn special_duty(duty: SpecialDuty) -> Self {
        Self {
            kind: AssignmentKind::SpecialDuty,
            duty_code: Some(duty.code().to_string()),
            duty_name: Some(duty.display_name().to_string()),
            blocks_regular_assignment: true,
            linked_routes: Vec::new(),
        }
    }
}

/// Represents a pre-determined driver binding for one date.
///
/// `route_name` is `None` for special duties. A driver holds at most one
/// fixed assignment per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssignment {
    /// The driver being bound.
    pub driver_name: DriverName,
    /// The date of the binding.
    pub date: Date,
    /// The bound route code, or `None` for special duties.
    pub route_name: Option<RouteCode>,
    /// The assignment's detail structure.
    pub details: FixedAssignmentDetails,
}

/// Represents a public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The holiday date.
    pub date: Date,
    /// The holiday name.
    pub name: String,
}

/// One route definition row from the route sheet, before expansion into
/// dated routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// The route code.
    pub code: RouteCode,
    /// The line/group label from the sheet's first column.
    pub group: Option<String>,
    /// Reporting time while school is in session.
    pub vad_with_school: Option<String>,
    /// Reporting time while school is out.
    pub vad_without_school: Option<String>,
    /// Per-diem hours.
    pub diaeten: Option<f64>,
    /// The weekdays this route runs on.
    pub pattern: WeekdayPattern,
    /// The suffix-derived service class.
    pub route_type: RouteType,
    /// Vehicle location.
    pub location: Option<String>,
}

impl RouteDefinition {
    /// Returns the effective reporting time under the given school status.
    ///
    /// An absent, empty or `00:00` value means the route does not run
    /// under that status.
    #[must_use]
    pub fn vad_for(&self, status: SchoolStatus) -> Option<&str> {
        let vad: &Option<String> = match status {
            SchoolStatus::WithSchool => &self.vad_with_school,
            SchoolStatus::WithoutSchool => &self.vad_without_school,
        };
        vad.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != "00:00")
    }
}

/// A no-work marker found in the planning grid for one (driver, date)
/// cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoWorkMarker {
    /// The driver row the marker was found in (raw sheet text).
    pub driver_name: String,
    /// The date column the marker was found in.
    pub date: Date,
    /// The marker text as written in the cell.
    pub marker: String,
}

/// One row of the planning grid's driver-hours section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverHoursRow {
    /// The driver name (raw sheet text).
    pub name: String,
    /// Monthly target hours.
    pub target_hours: Option<f64>,
    /// Hours already worked this month.
    pub worked_hours: Option<f64>,
}

/// Everything the planning-grid sheet contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanningGridData {
    /// School flag per date; `false` marks a non-school date.
    pub school_flags: BTreeMap<Date, bool>,
    /// No-work markers per (driver, date) cell.
    pub no_work_markers: Vec<NoWorkMarker>,
    /// The driver-hours section.
    pub driver_hours: Vec<DriverHoursRow>,
}

/// A caller-supplied unavailability entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualUnavailability {
    /// The driver name, matched case-insensitively against known drivers.
    pub driver_name: String,
    /// The dates the driver is unavailable on.
    pub dates: Vec<Date>,
    /// Optional reason recorded in the availability notes.
    pub reason: Option<String>,
}
