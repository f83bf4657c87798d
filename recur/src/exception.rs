// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

use crate::walltime::WallTime;

/// Per-event overrides of the generated pattern: instants to remove and
/// standalone instants to insert.
///
/// Entries are wall-clock times; they are resolved to instants through the
/// same resolver as generation, so a floating exclusion matches a floating
/// rule resolved in the same reference zone. Matching is exact-instant
/// equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    /// Instants removed from the generated set.
    pub excluded: Vec<WallTime>,

    /// Standalone instants added alongside the generated set.
    pub added: Vec<WallTime>,
}

impl ExceptionSet {
    /// Whether the set holds no exclusions and no additions.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty() && self.added.is_empty()
    }
}
