// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Time;

use crate::rule::{Frequency, RecurrenceRule};

/// Time-of-day set for daily and coarser frequencies.
///
/// BYHOUR, BYMINUTE and BYSECOND expand; levels without a BY part keep the
/// seed's component. The result is ascending. A value with no calendar
/// representation (BYSECOND=60 outside a leap second) is skipped.
pub(crate) fn day_times(rule: &RecurrenceRule, seed: Time) -> Vec<Time> {
    let hours = or_seed(&rule.by_hour, seed.hour());
    let minutes = or_seed(&rule.by_minute, seed.minute());
    let seconds = or_seed(&rule.by_second, seed.second());

    let mut times = Vec::with_capacity(hours.len() * minutes.len() * seconds.len());
    for &hour in &hours {
        for &minute in &minutes {
            for &second in &seconds {
                if let Ok(time) = Time::new(hour, minute, second, seed.subsec_nanosecond()) {
                    times.push(time);
                }
            }
        }
    }
    times.sort_unstable();
    times
}

/// Times contributed by one sub-daily cursor position.
///
/// Parts at or above the frequency's granularity limit the cursor (an
/// empty result skips the position); parts below expand.
pub(crate) fn sub_daily_times(rule: &RecurrenceRule, cursor: Time) -> Vec<Time> {
    match rule.freq {
        Frequency::Hourly => {
            if !passes(&rule.by_hour, cursor.hour()) {
                return Vec::new();
            }
            let minutes = or_seed(&rule.by_minute, cursor.minute());
            let seconds = or_seed(&rule.by_second, cursor.second());
            let mut times = Vec::with_capacity(minutes.len() * seconds.len());
            for &minute in &minutes {
                for &second in &seconds {
                    if let Ok(time) =
                        Time::new(cursor.hour(), minute, second, cursor.subsec_nanosecond())
                    {
                        times.push(time);
                    }
                }
            }
            times.sort_unstable();
            times
        }
        Frequency::Minutely => {
            if !passes(&rule.by_hour, cursor.hour()) || !passes(&rule.by_minute, cursor.minute()) {
                return Vec::new();
            }
            let seconds = or_seed(&rule.by_second, cursor.second());
            let mut times = Vec::with_capacity(seconds.len());
            for &second in &seconds {
                if let Ok(time) = Time::new(
                    cursor.hour(),
                    cursor.minute(),
                    second,
                    cursor.subsec_nanosecond(),
                ) {
                    times.push(time);
                }
            }
            times.sort_unstable();
            times
        }
        Frequency::Secondly => {
            if passes(&rule.by_hour, cursor.hour())
                && passes(&rule.by_minute, cursor.minute())
                && passes(&rule.by_second, cursor.second())
            {
                vec![cursor]
            } else {
                Vec::new()
            }
        }
        Frequency::Daily | Frequency::Weekly | Frequency::Monthly | Frequency::Yearly => {
            day_times(rule, cursor)
        }
    }
}

fn or_seed(values: &[i8], seed: i8) -> Vec<i8> {
    if values.is_empty() {
        vec![seed]
    } else {
        let mut values = values.to_vec();
        values.sort_unstable();
        values.dedup();
        values
    }
}

fn passes(values: &[i8], value: i8) -> bool {
    values.is_empty() || values.contains(&value)
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;
    use crate::rule::Frequency;

    #[test]
    fn seed_time_without_by_parts() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        assert_eq!(day_times(&rule, time(9, 30, 15, 0)), vec![time(9, 30, 15, 0)]);
    }

    #[test]
    fn by_hour_expands_sorted() {
        let rule = RecurrenceRule {
            by_hour: vec![17, 9],
            ..RecurrenceRule::new(Frequency::Daily)
        };
        assert_eq!(
            day_times(&rule, time(12, 30, 0, 0)),
            vec![time(9, 30, 0, 0), time(17, 30, 0, 0)]
        );
    }

    #[test]
    fn cross_product_expansion() {
        let rule = RecurrenceRule {
            by_hour: vec![8, 9],
            by_minute: vec![30],
            ..RecurrenceRule::new(Frequency::Yearly)
        };
        assert_eq!(
            day_times(&rule, time(0, 0, 0, 0)),
            vec![time(8, 30, 0, 0), time(9, 30, 0, 0)]
        );
    }

    #[test]
    fn leap_second_value_is_skipped() {
        let rule = RecurrenceRule {
            by_second: vec![0, 60],
            ..RecurrenceRule::new(Frequency::Daily)
        };
        assert_eq!(day_times(&rule, time(9, 0, 0, 0)), vec![time(9, 0, 0, 0)]);
    }

    #[test]
    fn hourly_filters_on_hour() {
        let rule = RecurrenceRule {
            by_hour: vec![9, 17],
            ..RecurrenceRule::new(Frequency::Hourly)
        };
        assert!(sub_daily_times(&rule, time(8, 15, 0, 0)).is_empty());
        assert_eq!(
            sub_daily_times(&rule, time(9, 15, 0, 0)),
            vec![time(9, 15, 0, 0)]
        );
    }

    #[test]
    fn hourly_expands_minutes_below_granularity() {
        let rule = RecurrenceRule {
            by_minute: vec![0, 30],
            ..RecurrenceRule::new(Frequency::Hourly)
        };
        assert_eq!(
            sub_daily_times(&rule, time(9, 0, 0, 0)),
            vec![time(9, 0, 0, 0), time(9, 30, 0, 0)]
        );
    }

    #[test]
    fn secondly_filters_everything() {
        let rule = RecurrenceRule {
            by_hour: vec![9],
            by_second: vec![0, 30],
            ..RecurrenceRule::new(Frequency::Secondly)
        };
        assert!(sub_daily_times(&rule, time(9, 0, 15, 0)).is_empty());
        assert_eq!(
            sub_daily_times(&rule, time(9, 0, 30, 0)),
            vec![time(9, 0, 30, 0)]
        );
    }
}
