// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Expansion of route definitions into dated routes.
//!
//! After eligibility filtering, each surviving definition becomes one
//! `Route` row per covered date of the week. The VAD variant for the
//! active school status gates expansion: a definition whose selected VAD
//! is absent does not run that week at all.

use crate::error::DomainError;
use crate::types::{Route, RouteDefinition, RouteDetails, RouteType, SchoolStatus, Season};
use crate::week::PlanWeek;
use std::collections::BTreeMap;

/// Expands filtered route definitions into dated routes for one week.
///
/// # Arguments
///
/// * `definitions` - Definitions surviving the eligibility filter
/// * `week` - The week being ingested
/// * `season` - The resolved season, recorded on every route
/// * `status` - The resolved school status, selects the VAD variant
///
/// # Returns
///
/// Dated routes in (date, name) order.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn expand_week_routes(
    definitions: &[RouteDefinition],
    week: &PlanWeek,
    season: Season,
    status: SchoolStatus,
) -> Result<Vec<Route>, DomainError> {
    let mut routes: Vec<Route> = Vec::new();

    for definition in definitions {
        let Some(vad) = definition.vad_for(status) else {
            // Inactive under this school status.
            continue;
        };
        let vad: String = vad.to_string();

        let offsets: Vec<u8> = match definition.route_type {
            RouteType::Saturday => vec![5],
            RouteType::Sunday => vec![6],
            RouteType::Regular => definition.pattern.without_saturday().offsets(),
        };

        for offset in offsets {
            let date = week.date_at(offset)?;
            routes.push(Route::new(
                date,
                definition.code.clone(),
                RouteDetails {
                    route_type: definition.route_type,
                    duration_hours: definition.diaeten,
                    diaeten: definition.diaeten,
                    vad_time: Some(vad.clone()),
                    location: definition.location.clone(),
                    season,
                    school_status: status,
                    duty_code: None,
                    duty_name: None,
                    extra: BTreeMap::new(),
                },
            ));
        }
    }

    routes.sort_by(|a, b| (a.date, a.name.value()).cmp(&(b.date, b.name.value())));
    Ok(routes)
}
