// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

//! Wall-clock to instant resolution against injectable zone rules.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::error::Error;
use crate::walltime::ZoneRef;

/// Source of offset/DST rules for named time zones.
///
/// Injected into the expander so tests can supply synthetic rules instead
/// of the host's zone database.
pub trait ZoneProvider {
    /// Looks up a zone by name, returning `None` when unknown.
    fn find(&self, name: &str) -> Option<TimeZone>;
}

/// Zone rules from the platform's database (or jiff's bundled copy).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemZones;

impl ZoneProvider for SystemZones {
    fn find(&self, name: &str) -> Option<TimeZone> {
        TimeZone::get(name).ok()
    }
}

/// Resolves a zone reference to concrete zone rules.
pub(crate) fn resolve_zone(
    provider: &dyn ZoneProvider,
    zone: &ZoneRef,
    floating: &TimeZone,
) -> Result<TimeZone, Error> {
    match zone {
        ZoneRef::Floating => Ok(floating.clone()),
        ZoneRef::Utc => Ok(TimeZone::UTC),
        ZoneRef::Fixed(offset) => Ok(TimeZone::fixed(*offset)),
        ZoneRef::Named(name) => provider
            .find(name)
            .ok_or_else(|| Error::UnknownTimeZone(name.clone())),
    }
}

/// Resolves a wall-clock time to an instant.
///
/// A time inside a spring-forward gap shifts forward by the size of the
/// gap; a time repeated by a fall-back overlap resolves to the earlier
/// instant. Both policies are deterministic, so repeated resolution of the
/// same wall clock always yields the same instant.
pub(crate) fn resolve_civil(tz: &TimeZone, date_time: DateTime) -> Result<Timestamp, Error> {
    tz.to_ambiguous_timestamp(date_time)
        .compatible()
        .map_err(|_| Error::Overflow)
}
