// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Season resolution.
//!
//! The season for an ingested week is decided solely by the week's Monday
//! and the configured season ranges. The contract is strict: exactly one
//! range must contain the date. A gap or an overlap in the configuration
//! is a data error and must surface, never default.

use crate::config::PlanningConfig;
use crate::error::DomainError;
use crate::types::Season;
use time::Date;

/// Resolves the season for a date against the configuration snapshot.
///
/// # Arguments
///
/// * `date` - The date to resolve, normally the week's Monday
/// * `config` - The configuration snapshot carrying the season ranges
///
/// # Returns
///
/// The single matching season.
///
/// # Errors
///
/// Returns `DomainError::AmbiguousSeason` when zero or more than one
/// configured range contains the date.
pub fn resolve_season(date: Date, config: &PlanningConfig) -> Result<Season, DomainError> {
    let matches: Vec<Season> = config
        .seasons
        .iter()
        .filter(|range| range.contains(date))
        .map(|range| range.season)
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        _ => Err(DomainError::AmbiguousSeason {
            date,
            matches: matches
                .iter()
                .map(|season| season.as_str().to_string())
                .collect(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{MonthDay, SeasonRange};
    use time::macros::date;

    fn two_season_config() -> PlanningConfig {
        PlanningConfig {
            seasons: vec![
                SeasonRange::new(Season::Summer, MonthDay::new(6, 1), MonthDay::new(9, 30)),
                SeasonRange::new(Season::Winter, MonthDay::new(10, 1), MonthDay::new(5, 31)),
            ],
            ..PlanningConfig::default()
        }
    }

    #[test]
    fn test_july_resolves_to_summer() {
        let config: PlanningConfig = two_season_config();
        assert_eq!(
            resolve_season(date!(2025 - 07 - 07), &config).unwrap(),
            Season::Summer
        );
    }

    #[test]
    fn test_december_resolves_to_winter_across_year_wrap() {
        let config: PlanningConfig = two_season_config();
        assert_eq!(
            resolve_season(date!(2025 - 12 - 01), &config).unwrap(),
            Season::Winter
        );
    }

    #[test]
    fn test_spring_resolves_to_winter_tail() {
        let config: PlanningConfig = two_season_config();
        assert_eq!(
            resolve_season(date!(2026 - 03 - 02), &config).unwrap(),
            Season::Winter
        );
    }

    #[test]
    fn test_boundary_days() {
        let config: PlanningConfig = two_season_config();
        assert_eq!(
            resolve_season(date!(2025 - 06 - 01), &config).unwrap(),
            Season::Summer
        );
        assert_eq!(
            resolve_season(date!(2025 - 09 - 30), &config).unwrap(),
            Season::Summer
        );
        assert_eq!(
            resolve_season(date!(2025 - 10 - 01), &config).unwrap(),
            Season::Winter
        );
        assert_eq!(
            resolve_season(date!(2026 - 05 - 31), &config).unwrap(),
            Season::Winter
        );
    }

    #[test]
    fn test_gap_in_ranges_is_ambiguous_with_no_matches() {
        let config: PlanningConfig = PlanningConfig {
            seasons: vec![SeasonRange::new(
                Season::Summer,
                MonthDay::new(6, 1),
                MonthDay::new(9, 30),
            )],
            ..PlanningConfig::default()
        };
        match resolve_season(date!(2025 - 12 - 01), &config).unwrap_err() {
            DomainError::AmbiguousSeason { date, matches } => {
                assert_eq!(date, date!(2025 - 12 - 01));
                assert!(matches.is_empty());
            }
            other => panic!("expected AmbiguousSeason, got {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_ranges_are_ambiguous() {
        let config: PlanningConfig = PlanningConfig {
            seasons: vec![
                SeasonRange::new(Season::Summer, MonthDay::new(6, 1), MonthDay::new(10, 31)),
                SeasonRange::new(Season::Winter, MonthDay::new(10, 1), MonthDay::new(5, 31)),
            ],
            ..PlanningConfig::default()
        };
        match resolve_season(date!(2025 - 10 - 15), &config).unwrap_err() {
            DomainError::AmbiguousSeason { matches, .. } => {
                assert_eq!(matches.len(), 2);
            }
            other => panic!("expected AmbiguousSeason, got {other:?}"),
        }
    }
}
