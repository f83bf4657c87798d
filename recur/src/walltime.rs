// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

//! Wall-clock date-times paired with a time zone reference.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::Offset;

/// How a wall-clock time is tied to absolute time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneRef {
    /// No zone; resolved against the expander's reference zone.
    Floating,

    /// Absolute UTC.
    Utc,

    /// A fixed offset from UTC, with no DST rules.
    Fixed(Offset),

    /// A named zone resolved through the zone provider.
    Named(String),
}

/// A wall-clock date and time plus the zone it is expressed in.
///
/// This is the shape of an event's start (the seed every generated
/// occurrence inherits its time-of-day from) and of exception dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallTime {
    /// The civil date and time, unresolved.
    pub date_time: DateTime,

    /// The zone reference the date-time is expressed in.
    pub zone: ZoneRef,
}

impl WallTime {
    /// A floating wall-clock time.
    pub fn floating(date_time: DateTime) -> Self {
        WallTime {
            date_time,
            zone: ZoneRef::Floating,
        }
    }

    /// A wall-clock time in UTC.
    pub fn utc(date_time: DateTime) -> Self {
        WallTime {
            date_time,
            zone: ZoneRef::Utc,
        }
    }

    /// A wall-clock time at a fixed UTC offset.
    pub fn fixed(date_time: DateTime, offset: Offset) -> Self {
        WallTime {
            date_time,
            zone: ZoneRef::Fixed(offset),
        }
    }

    /// A wall-clock time in a named zone.
    pub fn zoned(date_time: DateTime, zone: impl Into<String>) -> Self {
        WallTime {
            date_time,
            zone: ZoneRef::Named(zone.into()),
        }
    }

    /// The date part.
    pub fn date(&self) -> Date {
        self.date_time.date()
    }

    /// The time part.
    pub fn time(&self) -> Time {
        self.date_time.time()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn constructors_set_zone() {
        let dt = date(2025, 7, 18).at(12, 30, 0, 0);
        assert_eq!(WallTime::floating(dt).zone, ZoneRef::Floating);
        assert_eq!(WallTime::utc(dt).zone, ZoneRef::Utc);
        assert_eq!(
            WallTime::zoned(dt, "Europe/Berlin").zone,
            ZoneRef::Named("Europe/Berlin".to_string())
        );
    }

    #[test]
    fn accessors_split_parts() {
        let dt = date(2025, 7, 18).at(12, 30, 45, 0);
        let wall = WallTime::floating(dt);
        assert_eq!(wall.date(), date(2025, 7, 18));
        assert_eq!(wall.time(), dt.time());
    }
}
