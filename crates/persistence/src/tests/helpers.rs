// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.

use std::collections::BTreeMap;

use time::{Date, Duration};

use wochenplan_core::WeekPlan;
use wochenplan_domain::{
    Driver, DriverAvailability, DriverDetails, DriverName, FixedAssignment,
    FixedAssignmentDetails, PlanWeek, PublicHoliday, Route, RouteCode, RouteDetails, RouteType,
    SchoolResolution, SchoolStatus, SchoolStatusSource, Season, SpecialDuty,
};

pub fn create_route_details(route_type: RouteType) -> RouteDetails {
    RouteDetails {
        route_type,
        duration_hours: Some(7.5),
        diaeten: Some(1.0),
        vad_time: Some("06:45".to_string()),
        location: Some("Graz".to_string()),
        season: Season::Summer,
        school_status: SchoolStatus::WithSchool,
        duty_code: None,
        duty_name: None,
        extra: BTreeMap::new(),
    }
}

pub fn create_driver(name: &str, fixed_route: Option<&str>) -> Driver {
    Driver::new(
        DriverName::new(name),
        DriverDetails {
            monthly_hours_target: Some("173:00".to_string()),
            employment_percentage: Some(100),
            fixed_route_with_school: fixed_route.map(str::to_string),
            ..DriverDetails::default()
        },
    )
}

fn route(date: Date, code: &str, route_type: RouteType) -> Route {
    Route::new(
        date,
        RouteCode::new(code).unwrap(),
        create_route_details(route_type),
    )
}

/// A small but complete plan: two drivers, three dated routes, one
/// regular fixed assignment, one special duty, one holiday-driven
/// unavailability row.
pub fn create_test_plan(week_start: Date) -> WeekPlan {
    let week = PlanWeek::new(week_start).unwrap();
    let monday = week_start;
    let tuesday = week_start + Duration::days(1);
    let saturday = week_start + Duration::days(5);

    let huber = DriverName::new("Huber Max");
    let maier = DriverName::new("Maier Anna");

    WeekPlan {
        week,
        season: Season::Summer,
        school: SchoolResolution {
            status: SchoolStatus::WithSchool,
            source: SchoolStatusSource::Default,
        },
        drivers: vec![
            create_driver("Huber Max", Some("411")),
            create_driver("Maier Anna", None),
        ],
        routes: vec![
            route(monday, "411", RouteType::Regular),
            route(tuesday, "411", RouteType::Regular),
            route(saturday, "452SA", RouteType::Saturday),
        ],
        assignments: vec![
            FixedAssignment {
                driver_name: huber,
                date: monday,
                route_name: Some(RouteCode::new("411").unwrap()),
                details: FixedAssignmentDetails::regular(Vec::new()),
            },
            FixedAssignment {
                driver_name: maier.clone(),
                date: tuesday,
                route_name: None,
                details: FixedAssignmentDetails::special_duty(
                    SpecialDuty::parse("MB").unwrap(),
                ),
            },
        ],
        availability: vec![DriverAvailability::unavailable(
            maier,
            monday,
            Some("Feiertag: Testfeiertag".to_string()),
        )],
        holidays: vec![PublicHoliday {
            date: monday,
            name: "Testfeiertag".to_string(),
        }],
        resolution_failures: Vec::new(),
        warnings: Vec::new(),
    }
}
