// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ParsedSheets;
use wochenplan_domain::{
    Driver, DriverDetails, DriverName, EligibilityMatrix, PlanningConfig, RouteCode,
    RouteDefinition, RouteType, SchoolStatus, Season, WeekdayPattern,
};

pub fn create_test_config() -> PlanningConfig {
    PlanningConfig::default()
}

pub fn create_definition(code: &str, tag: &str) -> RouteDefinition {
    let code: RouteCode = RouteCode::new(code).unwrap();
    let route_type: RouteType = code.classify(&[]);
    RouteDefinition {
        code,
        group: Some(String::from("Linie 4")),
        vad_with_school: Some(String::from("05:30")),
        vad_without_school: Some(String::from("06:15")),
        diaeten: Some(8.5),
        pattern: WeekdayPattern::parse(tag).unwrap(),
        route_type,
        location: Some(String::from("Graz")),
    }
}

pub fn create_driver(name: &str, fixed_ms: Option<&str>, fixed_os: Option<&str>) -> Driver {
    let details: DriverDetails = DriverDetails {
        fixed_route_with_school: fixed_ms.map(String::from),
        fixed_route_without_school: fixed_os.map(String::from),
        ..DriverDetails::default()
    };
    Driver::new(DriverName::new(name), details)
}

/// A matrix listing every given code in all four columns.
pub fn matrix_with_all(codes: &[&str]) -> EligibilityMatrix {
    let mut matrix: EligibilityMatrix = EligibilityMatrix::default();
    for code in codes {
        for season in [Season::Summer, Season::Winter] {
            for status in [SchoolStatus::WithSchool, SchoolStatus::WithoutSchool] {
                matrix.insert(season, status, (*code).to_string());
            }
        }
    }
    matrix
}

pub fn create_test_sheets() -> ParsedSheets {
    ParsedSheets {
        route_definitions: vec![
            create_definition("411", "Mo-Fr"),
            create_definition("412", "Mo-Fr"),
            create_definition("452SA", "Sa."),
        ],
        matrix: matrix_with_all(&["411", "412", "452SA"]),
        drivers: vec![
            create_driver("Huber Max", Some("411"), Some("411")),
            create_driver("Maier Anna", None, None),
        ],
        holidays: Vec::new(),
        grid: wochenplan_domain::PlanningGridData::default(),
        warnings: Vec::new(),
    }
}
