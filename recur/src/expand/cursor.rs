// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::{Span, ToSpan};

use crate::error::Error;
use crate::expand::dayset::days_from;
use crate::rule::{Frequency, RecurrenceRule};

/// Upper bound on cursor years; advancing past it means an open rule ran
/// off the representable calendar.
const MAX_YEAR: i32 = 9999;

/// Generation cursor: one position per frequency unit.
///
/// Month and day are kept as plain numbers because a monthly cursor
/// legitimately points at day 31 of a 30-day month; only the frequencies
/// that walk real dates materialize a [`Date`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    pub(crate) year: i16,
    pub(crate) month: i8,
    day: i8,
    pub(crate) time: Time,
}

impl Cursor {
    /// Positions the cursor on the seed's unit. Weekly cursors sit at the
    /// start of the seed's week so BYDAY entries earlier in the week are
    /// still generated.
    pub(crate) fn start(rule: &RecurrenceRule, seed: DateTime) -> Self {
        let date = match rule.freq {
            Frequency::Weekly => week_start_containing(seed.date(), rule.week_start),
            _ => seed.date(),
        };
        Cursor {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            time: seed.time(),
        }
    }

    /// The cursor's date; meaningful for daily, weekly and sub-daily
    /// cursors, which always hold a real calendar date.
    pub(crate) fn date(&self) -> Result<Date, Error> {
        Date::new(self.year, self.month, self.day).map_err(|_| Error::Overflow)
    }

    /// Advances by one interval.
    pub(crate) fn advance(&mut self, rule: &RecurrenceRule) -> Result<(), Error> {
        self.advance_by(rule, i64::from(rule.interval))
    }

    /// Advances by `units` frequency units in a single jump.
    fn advance_by(&mut self, rule: &RecurrenceRule, units: i64) -> Result<(), Error> {
        match rule.freq {
            Frequency::Yearly => {
                let year = i64::from(self.year) + units;
                if year > i64::from(MAX_YEAR) {
                    return Err(Error::Overflow);
                }
                self.year = year as i16;
            }
            Frequency::Monthly => {
                let months = i64::from(self.year) * 12 + i64::from(self.month) - 1 + units;
                let year = months.div_euclid(12);
                if year > i64::from(MAX_YEAR) {
                    return Err(Error::Overflow);
                }
                self.year = year as i16;
                self.month = (months.rem_euclid(12) + 1) as i8;
            }
            Frequency::Weekly => self.add_days(units.checked_mul(7).ok_or(Error::Overflow)?)?,
            Frequency::Daily => self.add_days(units)?,
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                let span = match rule.freq {
                    Frequency::Hourly => Span::new().try_hours(units),
                    Frequency::Minutely => Span::new().try_minutes(units),
                    _ => Span::new().try_seconds(units),
                }
                .map_err(|_| Error::Overflow)?;
                let date_time = self
                    .date()?
                    .to_datetime(self.time)
                    .checked_add(span)
                    .map_err(|_| Error::Overflow)?;
                self.set_date(date_time.date());
                self.time = date_time.time();
            }
        }
        Ok(())
    }

    /// Jumps forward by whole interval multiples so the cursor lands on
    /// the last interval-aligned unit at or before `target`. Unit
    /// positions are generated independently, so skipping whole intervals
    /// preserves the expansion's contents past the jump.
    pub(crate) fn fast_forward(
        &mut self,
        rule: &RecurrenceRule,
        target: DateTime,
    ) -> Result<(), Error> {
        let units = match rule.freq {
            Frequency::Yearly => i64::from(target.date().year()) - i64::from(self.year),
            Frequency::Monthly => {
                let current = i64::from(self.year) * 12 + i64::from(self.month) - 1;
                let goal = i64::from(target.date().year()) * 12 + i64::from(target.date().month()) - 1;
                goal - current
            }
            Frequency::Weekly => i64::from((target.date() - self.date()?).get_days()).div_euclid(7),
            Frequency::Daily => i64::from((target.date() - self.date()?).get_days()),
            Frequency::Hourly => self.civil_seconds_until(target)?.div_euclid(3_600),
            Frequency::Minutely => self.civil_seconds_until(target)?.div_euclid(60),
            Frequency::Secondly => self.civil_seconds_until(target)?,
        };
        let intervals = units.div_euclid(i64::from(rule.interval));
        if intervals > 0 {
            self.advance_by(rule, intervals * i64::from(rule.interval))?;
        }
        Ok(())
    }

    fn civil_seconds_until(&self, target: DateTime) -> Result<i64, Error> {
        let days = i64::from((target.date() - self.date()?).get_days());
        Ok(days * 86_400 + seconds_of_day(target.time()) - seconds_of_day(self.time))
    }

    fn add_days(&mut self, days: i64) -> Result<(), Error> {
        let span = Span::new().try_days(days).map_err(|_| Error::Overflow)?;
        let date = self.date()?.checked_add(span).map_err(|_| Error::Overflow)?;
        self.set_date(date);
        Ok(())
    }

    fn set_date(&mut self, date: Date) {
        self.year = date.year();
        self.month = date.month();
        self.day = date.day();
    }
}

fn seconds_of_day(time: Time) -> i64 {
    i64::from(time.hour()) * 3_600 + i64::from(time.minute()) * 60 + i64::from(time.second())
}

/// Start of the week containing `date`, with weeks beginning on `wkst`.
fn week_start_containing(date: Date, wkst: Weekday) -> Date {
    let back = days_from(wkst, date.weekday());
    date.checked_sub(back.days()).unwrap_or(date)
}
