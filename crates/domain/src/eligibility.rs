// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route eligibility filtering.
//!
//! The route sheet carries a four-column matrix (`SmS`, `SoS`, `WmS`,
//! `WoS`) listing which route codes run under each season/school
//! combination. The filter keeps the codes of the selected column, applies
//! the configured policy to codes the matrix never mentions, and drops the
//! rest.

use crate::config::UnmatrixedRoutePolicy;
use crate::types::{RouteDefinition, SchoolStatus, Season};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The seasonal-eligibility matrix parsed from the route sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EligibilityMatrix {
    /// Codes active in summer while school is in session (`SmS`).
    pub summer_with_school: BTreeSet<String>,
    /// Codes active in summer while school is out (`SoS`).
    pub summer_without_school: BTreeSet<String>,
    /// Codes active in winter while school is in session (`WmS`).
    pub winter_with_school: BTreeSet<String>,
    /// Codes active in winter while school is out (`WoS`).
    pub winter_without_school: BTreeSet<String>,
}

impl EligibilityMatrix {
    /// Returns the column for a season/school combination.
    #[must_use]
    pub const fn column(&self, season: Season, status: SchoolStatus) -> &BTreeSet<String> {
        match (season, status) {
            (Season::Summer, SchoolStatus::WithSchool) => &self.summer_with_school,
            (Season::Summer, SchoolStatus::WithoutSchool) => &self.summer_without_school,
            (Season::Winter, SchoolStatus::WithSchool) => &self.winter_with_school,
            (Season::Winter, SchoolStatus::WithoutSchool) => &self.winter_without_school,
        }
    }

    /// Inserts a code into the column for a season/school combination.
    pub fn insert(&mut self, season: Season, status: SchoolStatus, code: String) {
        let column: &mut BTreeSet<String> = match (season, status) {
            (Season::Summer, SchoolStatus::WithSchool) => &mut self.summer_with_school,
            (Season::Summer, SchoolStatus::WithoutSchool) => &mut self.summer_without_school,
            (Season::Winter, SchoolStatus::WithSchool) => &mut self.winter_with_school,
            (Season::Winter, SchoolStatus::WithoutSchool) => &mut self.winter_without_school,
        };
        column.insert(code);
    }

    /// Returns whether the code appears in any column.
    #[must_use]
    pub fn mentions(&self, code: &str) -> bool {
        self.summer_with_school.contains(code)
            || self.summer_without_school.contains(code)
            || self.winter_with_school.contains(code)
            || self.winter_without_school.contains(code)
    }

    /// Returns whether every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summer_with_school.is_empty()
            && self.summer_without_school.is_empty()
            && self.winter_with_school.is_empty()
            && self.winter_without_school.is_empty()
    }
}

/// Result of filtering route definitions against the matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutcome {
    /// Definitions that survive for the selected season/school column.
    pub retained: Vec<RouteDefinition>,
    /// Codes dropped because another column (but not the selected one)
    /// lists them.
    pub dropped: Vec<String>,
    /// Codes retained or dropped purely by the unmatrixed policy.
    pub unmatrixed: Vec<String>,
    /// Matrix codes that have no definition row at all.
    pub unknown_codes: Vec<String>,
}

/// Filters route definitions by the seasonal-eligibility matrix.
///
/// # Arguments
///
/// * `definitions` - All parsed route definitions
/// * `matrix` - The seasonal-eligibility matrix
/// * `season` - The resolved season
/// * `status` - The resolved school status
/// * `policy` - What to do with codes the matrix never mentions
///
/// # Returns
///
/// The retained definitions plus bookkeeping about dropped, unmatrixed
/// and unknown codes.
#[must_use]
pub fn filter_routes(
    definitions: Vec<RouteDefinition>,
    matrix: &EligibilityMatrix,
    season: Season,
    status: SchoolStatus,
    policy: UnmatrixedRoutePolicy,
) -> FilterOutcome {
    let selected: &BTreeSet<String> = matrix.column(season, status);
    let defined: BTreeSet<String> = definitions
        .iter()
        .map(|definition| definition.code.value().to_string())
        .collect();

    let mut outcome: FilterOutcome = FilterOutcome::default();

    for definition in definitions {
        let code: &str = definition.code.value();
        if selected.contains(code) {
            outcome.retained.push(definition);
        } else if matrix.mentions(code) {
            outcome.dropped.push(code.to_string());
        } else {
            outcome.unmatrixed.push(code.to_string());
            if policy == UnmatrixedRoutePolicy::Retain {
                outcome.retained.push(definition);
            }
        }
    }

    for code in selected {
        if !defined.contains(code) {
            outcome.unknown_codes.push(code.clone());
        }
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{RouteCode, RouteType, WeekdayPattern};

    fn definition(code: &str) -> RouteDefinition {
        RouteDefinition {
            code: RouteCode::new(code).unwrap(),
            group: None,
            vad_with_school: Some(String::from("06:45")),
            vad_without_school: Some(String::from("06:45")),
            diaeten: None,
            pattern: WeekdayPattern::monday_to_friday(),
            route_type: RouteType::Regular,
            location: None,
        }
    }

    fn matrix() -> EligibilityMatrix {
        let mut matrix: EligibilityMatrix = EligibilityMatrix::default();
        matrix.insert(
            Season::Summer,
            SchoolStatus::WithSchool,
            String::from("411"),
        );
        matrix.insert(
            Season::Winter,
            SchoolStatus::WithSchool,
            String::from("412"),
        );
        matrix
    }

    #[test]
    fn test_selected_column_retains_its_codes() {
        let outcome: FilterOutcome = filter_routes(
            vec![definition("411"), definition("412")],
            &matrix(),
            Season::Summer,
            SchoolStatus::WithSchool,
            UnmatrixedRoutePolicy::Retain,
        );
        assert_eq!(outcome.retained.len(), 1);
        assert_eq!(outcome.retained[0].code.value(), "411");
        assert_eq!(outcome.dropped, vec![String::from("412")]);
    }

    #[test]
    fn test_unmatrixed_code_retained_by_default_policy() {
        let outcome: FilterOutcome = filter_routes(
            vec![definition("411"), definition("999")],
            &matrix(),
            Season::Summer,
            SchoolStatus::WithSchool,
            UnmatrixedRoutePolicy::Retain,
        );
        assert_eq!(outcome.retained.len(), 2);
        assert_eq!(outcome.unmatrixed, vec![String::from("999")]);
    }

    #[test]
    fn test_unmatrixed_code_dropped_under_drop_policy() {
        let outcome: FilterOutcome = filter_routes(
            vec![definition("411"), definition("999")],
            &matrix(),
            Season::Summer,
            SchoolStatus::WithSchool,
            UnmatrixedRoutePolicy::Drop,
        );
        assert_eq!(outcome.retained.len(), 1);
        assert_eq!(outcome.retained[0].code.value(), "411");
        assert_eq!(outcome.unmatrixed, vec![String::from("999")]);
    }

    #[test]
    fn test_matrix_code_without_definition_is_unknown() {
        let mut m: EligibilityMatrix = matrix();
        m.insert(
            Season::Summer,
            SchoolStatus::WithSchool,
            String::from("777"),
        );
        let outcome: FilterOutcome = filter_routes(
            vec![definition("411")],
            &m,
            Season::Summer,
            SchoolStatus::WithSchool,
            UnmatrixedRoutePolicy::Retain,
        );
        assert_eq!(outcome.unknown_codes, vec![String::from("777")]);
    }

    #[test]
    fn test_empty_matrix_retains_everything_under_default_policy() {
        let outcome: FilterOutcome = filter_routes(
            vec![definition("411"), definition("412")],
            &EligibilityMatrix::default(),
            Season::Winter,
            SchoolStatus::WithoutSchool,
            UnmatrixedRoutePolicy::Retain,
        );
        assert_eq!(outcome.retained.len(), 2);
        assert_eq!(outcome.unmatrixed.len(), 2);
    }
}
