// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability derivation and the manual-unavailability overlay.
//!
//! Unavailability accrues from several sources with a fixed precedence,
//! weakest first: public holidays, planning-grid no-work markers, `frei`
//! fixed codes, manual caller entries. Later sources upsert over earlier
//! ones for the same (driver, date); when a pair accrues more than one
//! reason the notes are `; `-joined.

use crate::error::DomainError;
use crate::types::{
    Driver, DriverAvailability, DriverName, ManualUnavailability, NoWorkMarker, PublicHoliday,
};
use crate::week::PlanWeek;
use std::collections::BTreeMap;
use time::Date;

/// The accumulating availability set for one week, keyed by (driver,
/// date) so re-derivation upserts instead of duplicating.
#[derive(Debug, Clone, Default)]
pub struct AvailabilitySet {
    rows: BTreeMap<(DriverName, Date), DriverAvailability>,
}

impl AvailabilitySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Marks a driver unavailable on a date, appending the note when the
    /// pair already carries one.
    pub fn mark_unavailable(&mut self, driver: DriverName, date: Date, note: &str) {
        match self.rows.get_mut(&(driver.clone(), date)) {
            Some(existing) => {
                existing.available = false;
                existing.append_note(note);
            }
            None => {
                self.rows.insert(
                    (driver.clone(), date),
                    DriverAvailability::unavailable(driver, date, Some(note.to_string())),
                );
            }
        }
    }

    /// Returns the rows in (driver, date) order.
    #[must_use]
    pub fn into_rows(self) -> Vec<DriverAvailability> {
        self.rows.into_values().collect()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row for a (driver, date) pair, if any.
    #[must_use]
    pub fn get(&self, driver: &DriverName, date: Date) -> Option<&DriverAvailability> {
        self.rows.get(&(driver.clone(), date))
    }
}

/// Derives holiday unavailability: every known driver is unavailable on
/// each holiday date falling inside the week.
pub fn apply_holidays(
    set: &mut AvailabilitySet,
    week: &PlanWeek,
    drivers: &[Driver],
    holidays: &[PublicHoliday],
) {
    for holiday in holidays {
        if !week.contains(holiday.date) {
            continue;
        }
        for driver in drivers {
            set.mark_unavailable(
                driver.name().clone(),
                holiday.date,
                &format!("Feiertag: {}", holiday.name),
            );
        }
    }
}

/// Overlays planning-grid no-work markers.
///
/// Marker driver names are raw sheet text and are matched
/// case-insensitively against known drivers; markers for unknown names
/// are returned so the caller can report them as warnings.
pub fn apply_grid_markers(
    set: &mut AvailabilitySet,
    week: &PlanWeek,
    drivers: &[Driver],
    markers: &[NoWorkMarker],
) -> Vec<NoWorkMarker> {
    let mut unmatched: Vec<NoWorkMarker> = Vec::new();

    for marker in markers {
        if !week.contains(marker.date) {
            continue;
        }
        match drivers
            .iter()
            .find(|d| d.name().matches_ignore_case(&marker.driver_name))
        {
            Some(driver) => {
                set.mark_unavailable(driver.name().clone(), marker.date, &marker.marker);
            }
            None => unmatched.push(marker.clone()),
        }
    }

    unmatched
}

/// Overlays `frei`-derived unavailability rows from assignment
/// resolution.
pub fn apply_frei_rows(set: &mut AvailabilitySet, rows: &[DriverAvailability]) {
    for row in rows {
        let note: &str = row.notes.as_deref().unwrap_or("Fixdienst: frei");
        set.mark_unavailable(row.driver_name.clone(), row.date, note);
    }
}

/// Overlays caller-supplied manual unavailability, the strongest signal.
///
/// Every entry's driver name must match a known driver; this is checked
/// for all entries before any row is written, so a failing request leaves
/// the set untouched.
///
/// # Errors
///
/// Returns `DomainError::DriverNotFound` naming the first unmatched
/// driver name.
pub fn apply_manual_unavailability(
    set: &mut AvailabilitySet,
    drivers: &[Driver],
    entries: &[ManualUnavailability],
) -> Result<usize, DomainError> {
    let mut matched: Vec<(&Driver, &ManualUnavailability)> = Vec::with_capacity(entries.len());
    for entry in entries {
        let driver: &Driver = drivers
            .iter()
            .find(|d| d.name().matches_ignore_case(&entry.driver_name))
            .ok_or_else(|| DomainError::DriverNotFound {
                name: entry.driver_name.clone(),
            })?;
        matched.push((driver, entry));
    }

    let mut applied: usize = 0;
    for (driver, entry) in matched {
        let note: String = entry
            .reason
            .clone()
            .unwrap_or_else(|| String::from("Manually set unavailable"));
        for date in &entry.dates {
            set.mark_unavailable(driver.name().clone(), *date, &note);
            applied += 1;
        }
    }
    Ok(applied)
}
