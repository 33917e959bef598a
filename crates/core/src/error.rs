// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wochenplan_domain::DomainError;

/// Errors surfaced while assembling one week's plan.
///
/// Assembly itself is pure; everything that can go wrong is a planning
/// rule refusing the input, so this wraps [`DomainError`] and keeps the
/// wrapper open for assembly-specific failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A planning rule rejected the input.
    Domain(DomainError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "week assembly failed: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}
