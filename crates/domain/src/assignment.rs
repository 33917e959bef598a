// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed-assignment resolution.
//!
//! Each driver may carry a fixed-route code per school status. The code is
//! resolved against the dated route set of the week: `frei` yields weekday
//! unavailability, `MB`/`DI`/`SOF` yield route-less special duties, and
//! anything else binds the driver to the concrete routes matching the
//! code's parts. A part with no matching route on a covered date is a
//! collected failure, never fatal.

use crate::error::DomainError;
use crate::types::{
    Driver, DriverAvailability, DriverName, FixedAssignment, FixedAssignmentDetails, Route,
    RouteCode, RouteType, SchoolStatus, SpecialDuty, split_combined_code,
};
use crate::week::PlanWeek;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// A fixed-route code part that could not be bound to a route.
///
/// These are reported to the operator alongside the success summary so the
/// source data can be corrected without losing the rest of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFailure {
    /// The driver whose fixed code failed to resolve.
    pub driver_name: String,
    /// The route code part that failed.
    pub code: String,
    /// The date the part should have covered.
    pub date: Date,
    /// Why resolution failed.
    pub reason: String,
}

impl std::fmt::Display for AssignmentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: code '{}' on {}: {}",
            self.driver_name, self.code, self.date, self.reason
        )
    }
}

/// Everything fixed-assignment resolution produces for one week.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignmentResolution {
    /// Concrete driver bindings, route-backed and special duties.
    pub assignments: Vec<FixedAssignment>,
    /// Unavailability rows derived from `frei` fixed codes.
    pub frei_unavailability: Vec<DriverAvailability>,
    /// Collected resolution failures.
    pub failures: Vec<AssignmentFailure>,
}

/// Resolves every driver's fixed-route code for the week.
///
/// # Arguments
///
/// * `drivers` - All parsed drivers
/// * `week` - The week being ingested
/// * `status` - The active school status, selects the `mS`/`oS` code
/// * `routes` - The dated, filtered route set of the week
/// * `pattern_offsets` - Per route code, the day offsets its definition
///   covers; codes absent here fall back to suffix classification
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
#[allow(clippy::missing_panics_doc)] // offsets are always < 7
pub fn resolve_fixed_assignments(
    drivers: &[Driver],
    week: &PlanWeek,
    status: SchoolStatus,
    routes: &[Route],
    pattern_offsets: &BTreeMap<String, Vec<u8>>,
) -> Result<AssignmentResolution, DomainError> {
    let mut existing: BTreeSet<(&str, Date)> = BTreeSet::new();
    for route in routes {
        existing.insert((route.name.value(), route.date));
    }

    let mut resolution: AssignmentResolution = AssignmentResolution::default();

    for driver in drivers {
        let Some(code) = driver.details.fixed_route_for(status) else {
            continue;
        };

        if code.eq_ignore_ascii_case("frei") {
            for offset in 0..5u8 {
                resolution
                    .frei_unavailability
                    .push(DriverAvailability::unavailable(
                        driver.name().clone(),
                        week.date_at(offset)?,
                        Some(format!("Fixdienst: frei ({status})")),
                    ));
            }
            continue;
        }

        if let Some(duty) = SpecialDuty::parse(code) {
            for offset in 0..5u8 {
                resolution.assignments.push(FixedAssignment {
                    driver_name: driver.name().clone(),
                    date: week.date_at(offset)?,
                    route_name: None,
                    details: FixedAssignmentDetails::special_duty(duty),
                });
            }
            continue;
        }

        let parts: Vec<String> = split_combined_code(code);
        for part in &parts {
            let siblings: Vec<String> = parts.iter().filter(|p| *p != part).cloned().collect();
            let offsets: Vec<u8> = covered_offsets(part, pattern_offsets);

            for offset in offsets {
                let date: Date = week.date_at(offset)?;
                if existing.contains(&(part.as_str(), date)) {
                    resolution.assignments.push(FixedAssignment {
                        driver_name: driver.name().clone(),
                        date,
                        route_name: Some(RouteCode::new(part)?),
                        details: FixedAssignmentDetails::regular(siblings.clone()),
                    });
                } else {
                    resolution.failures.push(AssignmentFailure {
                        driver_name: driver.name().value().to_string(),
                        code: part.clone(),
                        date,
                        reason: String::from("no route with this code exists on this date"),
                    });
                }
            }
        }
    }

    dedupe_per_driver_date(&mut resolution);
    Ok(resolution)
}

/// Returns the day offsets a fixed-code part should cover.
///
/// The definition's weekday pattern wins when known; otherwise the suffix
/// decides: `…SA` Saturday only, `…SO` Sunday only, anything else the
/// weekdays.
fn covered_offsets(part: &str, pattern_offsets: &BTreeMap<String, Vec<u8>>) -> Vec<u8> {
    if let Some(offsets) = pattern_offsets.get(part) {
        return offsets.clone();
    }
    match RouteCode::new(part).map(|code| code.classify(&[])) {
        Ok(RouteType::Saturday) => vec![5],
        Ok(RouteType::Sunday) => vec![6],
        _ => (0..5u8).collect(),
    }
}

/// Keeps the first assignment per (driver, date); later ones are reported
/// as failures so no driver ever holds two bindings for one date.
fn dedupe_per_driver_date(resolution: &mut AssignmentResolution) {
    let mut seen: BTreeSet<(DriverName, Date)> = BTreeSet::new();
    let mut kept: Vec<FixedAssignment> = Vec::with_capacity(resolution.assignments.len());

    for assignment in resolution.assignments.drain(..) {
        let key = (assignment.driver_name.clone(), assignment.date);
        if seen.insert(key) {
            kept.push(assignment);
        } else {
            resolution.failures.push(AssignmentFailure {
                driver_name: assignment.driver_name.value().to_string(),
                code: assignment
                    .route_name
                    .as_ref()
                    .map_or_else(String::new, |c| c.value().to_string()),
                date: assignment.date,
                reason: String::from("driver already holds a fixed assignment on this date"),
            });
        }
    }

    resolution.assignments = kept;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{DriverDetails, RouteDetails, Season};
    use time::macros::date;

    fn week() -> PlanWeek {
        PlanWeek::new(date!(2025 - 07 - 07)).unwrap()
    }

    fn driver(name: &str, with_school: Option<&str>) -> Driver {
        Driver::new(
            DriverName::new(name),
            DriverDetails {
                fixed_route_with_school: with_school.map(String::from),
                ..DriverDetails::default()
            },
        )
    }

    fn route(code: &str, date: Date) -> Route {
        Route::new(
            date,
            RouteCode::new(code).unwrap(),
            RouteDetails {
                route_type: RouteType::Regular,
                duration_hours: Some(8.0),
                diaeten: Some(8.0),
                vad_time: Some(String::from("06:45")),
                location: None,
                season: Season::Summer,
                school_status: SchoolStatus::WithSchool,
                duty_code: None,
                duty_name: None,
                extra: BTreeMap::new(),
            },
        )
    }

    fn weekday_routes(code: &str) -> Vec<Route> {
        (0..5i64)
            .map(|offset| route(code, date!(2025 - 07 - 07) + time::Duration::days(offset)))
            .collect()
    }

    #[test]
    fn test_plain_code_binds_all_weekdays() {
        let drivers: Vec<Driver> = vec![driver("Huber", Some("411"))];
        let routes: Vec<Route> = weekday_routes("411");

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &routes,
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(resolution.assignments.len(), 5);
        assert!(resolution.failures.is_empty());
        assert!(
            resolution
                .assignments
                .iter()
                .all(|a| a.route_name.as_ref().map(|c| c.value()) == Some("411"))
        );
    }

    #[test]
    fn test_unresolvable_code_collects_failures_without_aborting() {
        let drivers: Vec<Driver> = vec![
            driver("Huber", Some("999")),
            driver("Maier", Some("411")),
        ];
        let routes: Vec<Route> = weekday_routes("411");

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &routes,
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(resolution.failures.len(), 5);
        assert!(resolution.failures.iter().all(|f| f.code == "999"));
        assert_eq!(resolution.assignments.len(), 5);
        assert!(
            resolution
                .assignments
                .iter()
                .all(|a| a.driver_name.value() == "Maier")
        );
    }

    #[test]
    fn test_frei_marks_weekdays_unavailable() {
        let drivers: Vec<Driver> = vec![driver("Huber", Some("frei"))];

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &[],
            &BTreeMap::new(),
        )
        .unwrap();

        assert!(resolution.assignments.is_empty());
        assert_eq!(resolution.frei_unavailability.len(), 5);
        let first: &DriverAvailability = &resolution.frei_unavailability[0];
        assert!(!first.available);
        assert_eq!(
            first.notes.as_deref(),
            Some("Fixdienst: frei (mit_schule)")
        );
    }

    #[test]
    fn test_special_duty_yields_routeless_assignments() {
        let drivers: Vec<Driver> = vec![driver("Huber", Some("MB"))];

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &[],
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(resolution.assignments.len(), 5);
        let first: &FixedAssignment = &resolution.assignments[0];
        assert!(first.route_name.is_none());
        assert_eq!(first.details.duty_name.as_deref(), Some("Mobilbüro"));
        assert!(first.details.blocks_regular_assignment);
    }

    #[test]
    fn test_combined_code_links_siblings() {
        let drivers: Vec<Driver> = vec![driver("Huber", Some("411 + 412"))];
        let mut routes: Vec<Route> = weekday_routes("411");
        routes.extend(weekday_routes("412"));

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &routes,
            &BTreeMap::new(),
        )
        .unwrap();

        // One binding per date survives; the sibling shows up as linked.
        assert_eq!(resolution.assignments.len(), 5);
        assert_eq!(
            resolution.assignments[0].details.linked_routes,
            vec![String::from("412")]
        );
        assert_eq!(resolution.failures.len(), 5);
    }

    #[test]
    fn test_saturday_code_targets_saturday() {
        let drivers: Vec<Driver> = vec![driver("Huber", Some("452SA"))];
        let routes: Vec<Route> = vec![route("452SA", date!(2025 - 07 - 12))];

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &routes,
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(resolution.assignments.len(), 1);
        assert_eq!(resolution.assignments[0].date, date!(2025 - 07 - 12));
        assert!(resolution.failures.is_empty());
    }

    #[test]
    fn test_pattern_offsets_override_suffix_classification() {
        // An exempt Saturday-suffixed code carrying a weekday pattern.
        let drivers: Vec<Driver> = vec![driver("Huber", Some("531SA"))];
        let routes: Vec<Route> = weekday_routes("531SA");
        let mut offsets: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        offsets.insert(String::from("531SA"), vec![0, 1, 2, 3, 4]);

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &drivers,
            &week(),
            SchoolStatus::WithSchool,
            &routes,
            &offsets,
        )
        .unwrap();

        assert_eq!(resolution.assignments.len(), 5);
        assert!(resolution.failures.is_empty());
    }

    #[test]
    fn test_without_school_status_selects_other_code() {
        let mut d: Driver = driver("Huber", Some("411"));
        d.details.fixed_route_without_school = Some(String::from("412"));
        let routes: Vec<Route> = weekday_routes("412");

        let resolution: AssignmentResolution = resolve_fixed_assignments(
            &[d],
            &week(),
            SchoolStatus::WithoutSchool,
            &routes,
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(resolution.assignments.len(), 5);
        assert!(
            resolution
                .assignments
                .iter()
                .all(|a| a.route_name.as_ref().map(|c| c.value()) == Some("412"))
        );
    }
}
