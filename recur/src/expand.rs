// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

//! Rule expansion: the generation pipeline and its lazy iterator.

use std::collections::VecDeque;

use jiff::Timestamp;
use jiff::civil::{DateTime, Time};
use jiff::tz::TimeZone;

use crate::error::Error;
use crate::exception::ExceptionSet;
use crate::rule::{Frequency, RecurrenceRule};
use crate::walltime::WallTime;
use crate::zone::{SystemZones, ZoneProvider, resolve_civil, resolve_zone};

mod cursor;
mod dayset;
mod timeset;

use cursor::Cursor;

/// Consecutive unit positions allowed to produce no candidate before the
/// expansion is declared non-terminating.
const MAX_BARREN_UNITS: u32 = 100_000;

/// How an occurrence entered the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceKind {
    /// Produced by the recurrence pattern itself.
    Generated,

    /// Inserted by the exception set's addition list.
    Added,
}

/// One concrete occurrence of a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// The resolved instant.
    pub instant: Timestamp,

    /// Whether the pattern or the addition list produced it.
    pub kind: OccurrenceKind,
}

/// A half-open instant interval `[start, end)` bounding which occurrences
/// are materialized.
///
/// The window limits iterator work only; it never changes rule semantics.
/// An occurrence outside the window still consumes COUNT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound, if any.
    pub start: Option<Timestamp>,

    /// Exclusive upper bound, if any.
    pub end: Option<Timestamp>,
}

impl TimeRange {
    /// The window `[start, end)`.
    pub fn between(start: Timestamp, end: Timestamp) -> Self {
        TimeRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// The window `[start, ..)`.
    pub fn starting_at(start: Timestamp) -> Self {
        TimeRange {
            start: Some(start),
            end: None,
        }
    }

    /// The window `[.., end)`.
    pub fn ending_before(end: Timestamp) -> Self {
        TimeRange {
            start: None,
            end: Some(end),
        }
    }
}

/// Expands recurrence rules into occurrence streams.
///
/// Holds the two pieces of ambient context an expansion needs: the source
/// of named-zone rules and the reference zone floating times resolve in.
/// The expander is stateless across calls and may be shared freely; each
/// returned [`Occurrences`] carries its own cursor.
#[derive(Debug, Clone)]
pub struct Expander<P = SystemZones> {
    zones: P,
    floating_zone: TimeZone,
}

impl Expander<SystemZones> {
    /// An expander over the platform zone database, resolving floating
    /// times in UTC.
    pub fn new() -> Self {
        Expander::with_zones(SystemZones)
    }
}

impl Default for Expander<SystemZones> {
    fn default() -> Self {
        Expander::new()
    }
}

impl<P: ZoneProvider> Expander<P> {
    /// An expander over a caller-supplied zone provider.
    pub fn with_zones(zones: P) -> Self {
        Expander {
            zones,
            floating_zone: TimeZone::UTC,
        }
    }

    /// Sets the reference zone floating times resolve in, typically the
    /// consuming application's local zone. Recorded here so repeated
    /// expansions of the same inputs are idempotent.
    #[must_use]
    pub fn floating_zone(mut self, zone: TimeZone) -> Self {
        self.floating_zone = zone;
        self
    }

    /// Expands `rule` from the event start `start`, applying `exceptions`,
    /// into a lazy time-ordered occurrence stream.
    ///
    /// Validation failures surface here, before any generation. COUNT is
    /// consumed before exclusion: an occurrence removed by the exclusion
    /// list still counts. Additions never consume COUNT and are not
    /// bounded by UNTIL.
    pub fn expand(
        &self,
        rule: &RecurrenceRule,
        start: &WallTime,
        exceptions: &ExceptionSet,
        window: Option<TimeRange>,
    ) -> Result<Occurrences, Error> {
        rule.validate()?;

        let tz = resolve_zone(&self.zones, &start.zone, &self.floating_zone)?;
        let seed = start.date_time;
        let anchor = resolve_civil(&tz, seed)?;
        tracing::debug!(
            freq = %rule.freq,
            interval = rule.interval,
            "expanding recurrence rule"
        );

        let mut excluded = self.resolve_exceptions(&exceptions.excluded)?;
        excluded.sort_unstable();
        excluded.dedup();
        let mut added = self.resolve_exceptions(&exceptions.added)?;
        added.sort_unstable();
        added.dedup();

        let window = window.unwrap_or_default();
        let mut cursor = Cursor::start(rule, seed);
        if rule.count.is_none()
            && let Some(window_start) = window.start
        {
            let target = window_start.to_zoned(tz.clone()).datetime();
            if target > seed {
                cursor.fast_forward(rule, target)?;
                tracing::trace!("fast-forwarded cursor to window start");
            }
        }

        let day_times = if rule.freq.is_sub_daily() {
            Vec::new()
        } else {
            timeset::day_times(rule, seed.time())
        };

        Ok(Occurrences {
            rule: rule.clone(),
            tz,
            anchor,
            seed,
            cursor,
            day_times,
            buffer: VecDeque::new(),
            added,
            next_added: 0,
            excluded,
            remaining: rule.count,
            window,
            last: None,
            finished: false,
            failed: false,
        })
    }

    /// The first occurrence at or after `from`, if any.
    pub fn next_occurrence(
        &self,
        rule: &RecurrenceRule,
        start: &WallTime,
        exceptions: &ExceptionSet,
        from: Timestamp,
    ) -> Result<Option<Occurrence>, Error> {
        self.expand(rule, start, exceptions, Some(TimeRange::starting_at(from)))?
            .next()
            .transpose()
    }

    fn resolve_exceptions(&self, entries: &[WallTime]) -> Result<Vec<Timestamp>, Error> {
        entries
            .iter()
            .map(|entry| {
                let tz = resolve_zone(&self.zones, &entry.zone, &self.floating_zone)?;
                resolve_civil(&tz, entry.date_time)
            })
            .collect()
    }
}

/// Expands a rule with the platform zone database and a UTC floating
/// reference; see [`Expander::expand`].
pub fn expand(
    rule: &RecurrenceRule,
    start: &WallTime,
    exceptions: &ExceptionSet,
    window: Option<TimeRange>,
) -> Result<Occurrences, Error> {
    Expander::new().expand(rule, start, exceptions, window)
}

/// Lazy, strictly time-ordered stream of [`Occurrence`]s.
///
/// Each pull re-enters the generation pipeline from the cursor's last
/// position, so bounded windows never pay for full-history generation.
/// The stream is finite whenever COUNT, UNTIL, or a window end bounds it;
/// otherwise it is logically infinite and the caller must bound its own
/// pulls. Not safe for concurrent pulls; clone or create independent
/// iterators instead.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    tz: TimeZone,
    anchor: Timestamp,
    seed: DateTime,
    cursor: Cursor,
    day_times: Vec<Time>,
    buffer: VecDeque<Timestamp>,
    added: Vec<Timestamp>,
    next_added: usize,
    excluded: Vec<Timestamp>,
    remaining: Option<u32>,
    window: TimeRange,
    last: Option<Timestamp>,
    finished: bool,
    failed: bool,
}

impl Occurrences {
    /// One unit's candidates: dates crossed with the time set, ascending,
    /// with BYSETPOS applied. The ascending sort is what makes BYSETPOS
    /// indexing correct.
    fn unit_candidates(&self) -> Result<Vec<DateTime>, Error> {
        let mut unit: Vec<DateTime> = match self.rule.freq {
            Frequency::Yearly => {
                cross(
                    dayset::yearly(&self.rule, self.cursor.year, self.seed.date()),
                    &self.day_times,
                )
            }
            Frequency::Monthly => cross(
                dayset::monthly(
                    &self.rule,
                    self.cursor.year,
                    self.cursor.month,
                    self.seed.date().day(),
                ),
                &self.day_times,
            ),
            Frequency::Weekly => cross(
                dayset::weekly(&self.rule, self.cursor.date()?, self.seed.date().weekday()),
                &self.day_times,
            ),
            Frequency::Daily => cross(
                dayset::daily(&self.rule, self.cursor.date()?),
                &self.day_times,
            ),
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                let date = self.cursor.date()?;
                if dayset::date_passes(&self.rule, date) {
                    timeset::sub_daily_times(&self.rule, self.cursor.time)
                        .into_iter()
                        .map(|time| date.to_datetime(time))
                        .collect()
                } else {
                    Vec::new()
                }
            }
        };
        if !self.rule.by_set_pos.is_empty() {
            unit = dayset::select_positions(unit, &self.rule.by_set_pos);
        }
        Ok(unit)
    }

    /// Refills the buffer from successive units until at least one instant
    /// is buffered or the stream terminates. Applies the ≥-anchor check,
    /// UNTIL, COUNT, the strict-monotonicity guard, and the safety cap.
    fn fill(&mut self) -> Result<(), Error> {
        let mut barren = 0u32;
        loop {
            if !self.buffer.is_empty() || self.finished {
                return Ok(());
            }
            if self.remaining == Some(0) {
                self.finished = true;
                return Ok(());
            }

            let mut produced = false;
            for date_time in self.unit_candidates()? {
                let instant = resolve_civil(&self.tz, date_time)?;
                if instant < self.anchor {
                    continue;
                }
                // A spring-forward shift can collide with or pass a later
                // wall clock; emitted instants stay strictly increasing.
                if self.last.is_some_and(|last| instant <= last) {
                    continue;
                }
                if self.rule.until.is_some_and(|until| instant > until) {
                    self.finished = true;
                    break;
                }
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                self.last = Some(instant);
                self.buffer.push_back(instant);
                produced = true;
                if self.remaining == Some(0) {
                    self.finished = true;
                    break;
                }
            }
            if self.finished {
                return Ok(());
            }

            if produced {
                barren = 0;
            } else {
                barren += 1;
                if barren >= MAX_BARREN_UNITS {
                    return Err(Error::Overflow);
                }
            }
            self.cursor.advance(&self.rule)?;
        }
    }

    fn peek_added(&self) -> Option<Timestamp> {
        self.added.get(self.next_added).copied()
    }
}

impl Iterator for Occurrences {
    type Item = Result<Occurrence, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if self.buffer.is_empty() && !self.finished {
                if let Err(e) = self.fill() {
                    self.failed = true;
                    return Some(Err(e));
                }
            }

            // Merge the generated stream with the sorted additions; both
            // are ascending, so the smaller head comes first and equal
            // heads collapse into the generated occurrence.
            let (instant, kind) = match (self.buffer.front().copied(), self.peek_added()) {
                (None, None) => return None,
                (Some(generated), Some(added)) if added < generated => {
                    self.next_added += 1;
                    (added, OccurrenceKind::Added)
                }
                (Some(generated), Some(added)) if added == generated => {
                    self.next_added += 1;
                    self.buffer.pop_front();
                    (generated, OccurrenceKind::Generated)
                }
                (Some(generated), _) => {
                    self.buffer.pop_front();
                    (generated, OccurrenceKind::Generated)
                }
                (None, Some(added)) => {
                    self.next_added += 1;
                    (added, OccurrenceKind::Added)
                }
            };

            if self.excluded.binary_search(&instant).is_ok() {
                continue;
            }
            if self.window.start.is_some_and(|start| instant < start) {
                continue;
            }
            if self.window.end.is_some_and(|end| instant >= end) {
                // Both streams are ascending; nothing later can re-enter
                // the window.
                self.finished = true;
                self.buffer.clear();
                self.next_added = self.added.len();
                return None;
            }
            return Some(Ok(Occurrence { instant, kind }));
        }
    }
}

fn cross(dates: Vec<jiff::civil::Date>, times: &[Time]) -> Vec<DateTime> {
    let mut unit = Vec::with_capacity(dates.len() * times.len());
    for date in dates {
        for &time in times {
            unit.push(date.to_datetime(time));
        }
    }
    unit
}
