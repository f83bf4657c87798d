// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

use jiff::ToSpan;
use jiff::civil::{Date, DateTime, Weekday};

use crate::rule::{NthWeekday, RecurrenceRule};

/// Which unit a BYDAY ordinal counts within when used as a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NthScope {
    Month,
    Year,
}

/// Candidate dates for one yearly unit, per the RFC 5545 expand/limit
/// table: BYYEARDAY, BYWEEKNO and BYMONTH-rooted combinations expand, the
/// remaining date parts limit. Ascending, deduplicated.
pub(crate) fn yearly(rule: &RecurrenceRule, year: i16, seed: Date) -> Vec<Date> {
    let mut dates = if !rule.by_year_day.is_empty() {
        let mut dates = year_day_dates(&rule.by_year_day, year);
        dates.retain(|d| month_passes(&rule.by_month, *d));
        if !rule.by_month_day.is_empty() {
            dates.retain(|d| month_day_passes(&rule.by_month_day, *d));
        }
        if !rule.by_day.is_empty() {
            dates.retain(|d| by_day_limits(&rule.by_day, *d, NthScope::Year));
        }
        dates
    } else if !rule.by_week_no.is_empty() {
        let mut dates = week_no_dates(rule, year, seed.weekday());
        dates.retain(|d| month_passes(&rule.by_month, *d));
        if !rule.by_month_day.is_empty() {
            dates.retain(|d| month_day_passes(&rule.by_month_day, *d));
        }
        dates
    } else if !rule.by_month.is_empty() {
        let mut dates = Vec::new();
        for &month in &rule.by_month {
            dates.extend(monthly(rule, year, month, seed.day()));
        }
        dates
    } else if !rule.by_month_day.is_empty() {
        let mut dates = Vec::new();
        for month in 1..=12 {
            dates.extend(month_day_dates(&rule.by_month_day, year, month));
        }
        if !rule.by_day.is_empty() {
            dates.retain(|d| by_day_limits(&rule.by_day, *d, NthScope::Year));
        }
        dates
    } else if !rule.by_day.is_empty() {
        by_day_in_year(&rule.by_day, year)
    } else {
        // The seed's own month and day; absent in some years (Feb 29).
        Date::new(year, seed.month(), seed.day())
            .ok()
            .into_iter()
            .collect()
    };

    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Candidate dates for one monthly unit. BYMONTH limits the whole unit;
/// BYMONTHDAY expands; BYDAY expands when BYMONTHDAY is absent and limits
/// otherwise. Without date parts, the seed's day-of-month is used and a
/// month without it produces nothing.
pub(crate) fn monthly(rule: &RecurrenceRule, year: i16, month: i8, seed_day: i8) -> Vec<Date> {
    if !rule.by_month.is_empty() && !rule.by_month.contains(&month) {
        return Vec::new();
    }

    let mut dates = if !rule.by_month_day.is_empty() {
        let mut dates = month_day_dates(&rule.by_month_day, year, month);
        if !rule.by_day.is_empty() {
            dates.retain(|d| by_day_limits(&rule.by_day, *d, NthScope::Month));
        }
        dates
    } else if !rule.by_day.is_empty() {
        by_day_in_month(&rule.by_day, year, month)
    } else {
        resolve_month_day(seed_day, year, month).into_iter().collect()
    };

    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Candidate dates for one weekly unit starting at `week_start` (already
/// aligned to the rule's WKST). BYDAY expands within the week, defaulting
/// to the seed's weekday; BYMONTH limits.
pub(crate) fn weekly(rule: &RecurrenceRule, week_start: Date, seed_weekday: Weekday) -> Vec<Date> {
    let mut dates = Vec::new();
    if rule.by_day.is_empty() {
        let offset = days_from(rule.week_start, seed_weekday);
        if let Ok(date) = week_start.checked_add(offset.days()) {
            dates.push(date);
        }
    } else {
        for day in 0..7i64 {
            let Ok(date) = week_start.checked_add(day.days()) else {
                continue;
            };
            if rule.by_day.iter().any(|e| e.weekday == date.weekday()) {
                dates.push(date);
            }
        }
    }
    dates.retain(|d| month_passes(&rule.by_month, *d));
    dates
}

/// The daily unit's zero-or-one candidate: the cursor date itself when it
/// passes every date-level limit.
pub(crate) fn daily(rule: &RecurrenceRule, date: Date) -> Vec<Date> {
    if date_passes(rule, date) {
        vec![date]
    } else {
        Vec::new()
    }
}

/// Date-level limits for daily and sub-daily frequencies, where every date
/// part restricts rather than expands.
pub(crate) fn date_passes(rule: &RecurrenceRule, date: Date) -> bool {
    month_passes(&rule.by_month, date)
        && (rule.by_month_day.is_empty() || month_day_passes(&rule.by_month_day, date))
        && (rule.by_year_day.is_empty() || year_day_passes(&rule.by_year_day, date))
        && (rule.by_day.is_empty() || rule.by_day.iter().any(|e| e.weekday == date.weekday()))
}

/// Applies BYSETPOS to one unit's ascending candidate list. Positions are
/// 1-based from the start, negative from the end; out-of-range positions
/// are dropped.
pub(crate) fn select_positions(unit: Vec<DateTime>, positions: &[i16]) -> Vec<DateTime> {
    let len = unit.len() as i64;
    let mut keep = Vec::with_capacity(positions.len());
    for &pos in positions {
        let index = if pos > 0 {
            i64::from(pos) - 1
        } else {
            len + i64::from(pos)
        };
        if (0..len).contains(&index) {
            keep.push(index as usize);
        }
    }
    keep.sort_unstable();
    keep.dedup();
    keep.into_iter().filter_map(|i| unit.get(i).copied()).collect()
}

/// Days between two weekdays, walking forward from `from` to `to` (0-6).
pub(crate) fn days_from(from: Weekday, to: Weekday) -> i64 {
    i64::from((to.to_monday_zero_offset() - from.to_monday_zero_offset()).rem_euclid(7))
}

fn month_passes(by_month: &[i8], date: Date) -> bool {
    by_month.is_empty() || by_month.contains(&date.month())
}

fn month_day_passes(by_month_day: &[i8], date: Date) -> bool {
    by_month_day.iter().any(|&md| {
        if md > 0 {
            date.day() == md
        } else {
            date.day() == date.days_in_month() + md + 1
        }
    })
}

fn year_day_passes(by_year_day: &[i16], date: Date) -> bool {
    let day_of_year = date.day_of_year();
    let days_in_year = date.days_in_year();
    by_year_day.iter().any(|&yd| {
        if yd > 0 {
            day_of_year == yd
        } else {
            day_of_year == days_in_year + yd + 1
        }
    })
}

/// Whether `date` satisfies a BYDAY list used as a limit. An ordinal entry
/// requires the date to be that ordinal weekday of the scope unit.
fn by_day_limits(entries: &[NthWeekday], date: Date, scope: NthScope) -> bool {
    entries.iter().any(|entry| {
        if entry.weekday != date.weekday() {
            return false;
        }
        match entry.nth {
            None => true,
            Some(nth) => match scope {
                NthScope::Month => date.nth_weekday_of_month(nth, entry.weekday).ok() == Some(date),
                NthScope::Year => nth_weekday_of_year(date.year(), nth, entry.weekday) == Some(date),
            },
        }
    })
}

/// Resolves one BYMONTHDAY value inside a month; `None` when the month has
/// no such day.
fn resolve_month_day(month_day: i8, year: i16, month: i8) -> Option<Date> {
    let first = Date::new(year, month, 1).ok()?;
    let day = if month_day > 0 {
        month_day
    } else {
        first.days_in_month() + month_day + 1
    };
    (day >= 1 && day <= first.days_in_month())
        .then(|| Date::new(year, month, day).ok())
        .flatten()
}

fn month_day_dates(by_month_day: &[i8], year: i16, month: i8) -> Vec<Date> {
    let mut dates: Vec<Date> = by_month_day
        .iter()
        .filter_map(|&md| resolve_month_day(md, year, month))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

fn by_day_in_month(entries: &[NthWeekday], year: i16, month: i8) -> Vec<Date> {
    let Ok(first) = Date::new(year, month, 1) else {
        return Vec::new();
    };
    let mut dates = Vec::new();
    for entry in entries {
        match entry.nth {
            Some(nth) => {
                if let Ok(date) = first.nth_weekday_of_month(nth, entry.weekday) {
                    dates.push(date);
                }
            }
            None => {
                let mut date = match first.checked_add(days_from(first.weekday(), entry.weekday).days()) {
                    Ok(date) => date,
                    Err(_) => continue,
                };
                while date.month() == month {
                    dates.push(date);
                    match date.checked_add(1.weeks()) {
                        Ok(next) => date = next,
                        Err(_) => break,
                    }
                }
            }
        }
    }
    dates
}

fn by_day_in_year(entries: &[NthWeekday], year: i16) -> Vec<Date> {
    let Ok(jan1) = Date::new(year, 1, 1) else {
        return Vec::new();
    };
    let mut dates = Vec::new();
    for entry in entries {
        match entry.nth {
            Some(nth) => {
                if let Some(date) = nth_weekday_of_year(year, nth, entry.weekday) {
                    dates.push(date);
                }
            }
            None => {
                let mut date = match jan1.checked_add(days_from(jan1.weekday(), entry.weekday).days())
                {
                    Ok(date) => date,
                    Err(_) => continue,
                };
                while date.year() == year {
                    dates.push(date);
                    match date.checked_add(1.weeks()) {
                        Ok(next) => date = next,
                        Err(_) => break,
                    }
                }
            }
        }
    }
    dates
}

/// The `nth` weekday of a year; negative counts from the year's end.
fn nth_weekday_of_year(year: i16, nth: i8, weekday: Weekday) -> Option<Date> {
    if nth == 0 {
        return None;
    }
    let date = if nth > 0 {
        let jan1 = Date::new(year, 1, 1).ok()?;
        let first = jan1.checked_add(days_from(jan1.weekday(), weekday).days()).ok()?;
        first.checked_add((i64::from(nth) - 1).weeks()).ok()?
    } else {
        let dec31 = Date::new(year, 12, 31).ok()?;
        let last = dec31.checked_sub(days_from(weekday, dec31.weekday()).days()).ok()?;
        last.checked_add((i64::from(nth) + 1).weeks()).ok()?
    };
    (date.year() == year).then_some(date)
}

fn year_day_dates(by_year_day: &[i16], year: i16) -> Vec<Date> {
    let mut dates = Vec::new();
    let Ok(jan1) = Date::new(year, 1, 1) else {
        return dates;
    };
    let days_in_year = jan1.days_in_year();
    for &yd in by_year_day {
        let offset = if yd > 0 {
            i64::from(yd) - 1
        } else {
            i64::from(days_in_year) + i64::from(yd)
        };
        if offset < 0 || offset >= i64::from(days_in_year) {
            continue;
        }
        if let Ok(date) = jan1.checked_add(offset.days()) {
            dates.push(date);
        }
    }
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Dates selected by BYWEEKNO within one year. Week 1 is the first
/// `week_start`-based week containing at least four days of the year; a
/// selected week contributes its BYDAY weekdays, or the seed's weekday
/// when BYDAY is absent. Weeks may reach into adjacent years.
fn week_no_dates(rule: &RecurrenceRule, year: i16, seed_weekday: Weekday) -> Vec<Date> {
    let wkst = rule.week_start;
    let Some(first) = first_week_start(year, wkst) else {
        return Vec::new();
    };
    let total = weeks_in_year(year, wkst);

    let mut dates = Vec::new();
    for &week_no in &rule.by_week_no {
        let index = if week_no > 0 {
            i64::from(week_no) - 1
        } else {
            let Some(total) = total else { continue };
            total + i64::from(week_no)
        };
        if index < 0 || total.is_some_and(|t| index >= t) {
            continue;
        }
        let Ok(start) = first.checked_add((index * 7).days()) else {
            continue;
        };
        if rule.by_day.is_empty() {
            if let Ok(date) = start.checked_add(days_from(wkst, seed_weekday).days()) {
                dates.push(date);
            }
        } else {
            for entry in &rule.by_day {
                if let Ok(date) = start.checked_add(days_from(wkst, entry.weekday).days()) {
                    dates.push(date);
                }
            }
        }
    }
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Start of week 1 for a year: the `wkst`-based week containing January 1
/// when at least four of its days fall in the year, otherwise the next.
fn first_week_start(year: i16, wkst: Weekday) -> Option<Date> {
    let jan1 = Date::new(year, 1, 1).ok()?;
    let back = days_from(wkst, jan1.weekday());
    let candidate = jan1.checked_sub(back.days()).ok()?;
    if 7 - back >= 4 {
        Some(candidate)
    } else {
        candidate.checked_add(7.days()).ok()
    }
}

fn weeks_in_year(year: i16, wkst: Weekday) -> Option<i64> {
    let first = first_week_start(year, wkst)?;
    let next = first_week_start(year.checked_add(1)?, wkst)?;
    Some(i64::from((next - first).get_days()) / 7)
}
