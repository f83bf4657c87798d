// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

//! The structured recurrence rule model and its validation.

use std::fmt::{self, Display};

use jiff::Timestamp;
use jiff::civil::Weekday;

use crate::error::ValidationError;

/// Recurrence frequency, the unit a rule repeats over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[expect(missing_docs)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Whether the frequency unit is finer than a day.
    pub(crate) fn is_sub_daily(self) -> bool {
        matches!(
            self,
            Frequency::Secondly | Frequency::Minutely | Frequency::Hourly
        )
    }
}

/// A BYDAY entry: a weekday with an optional signed ordinal.
///
/// `NthWeekday::nth(2, Weekday::Friday)` reads "the second Friday";
/// negative ordinals count from the end of the month or year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthWeekday {
    /// Day of the week.
    pub weekday: Weekday,

    /// Ordinal within the enclosing month or year, if any.
    pub nth: Option<i8>,
}

impl NthWeekday {
    /// Every occurrence of `weekday` within the unit.
    pub const fn every(weekday: Weekday) -> Self {
        NthWeekday { weekday, nth: None }
    }

    /// The `nth` occurrence of `weekday` within the unit; negative counts
    /// from the end.
    pub const fn nth(nth: i8, weekday: Weekday) -> Self {
        NthWeekday {
            weekday,
            nth: Some(nth),
        }
    }
}

impl Display for NthWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(nth) = self.nth {
            write!(f, "{nth}{}", weekday_keyword(self.weekday))
        } else {
            write!(f, "{}", weekday_keyword(self.weekday))
        }
    }
}

/// RFC 5545 two-letter keyword for a weekday.
fn weekday_keyword(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "MO",
        Weekday::Tuesday => "TU",
        Weekday::Wednesday => "WE",
        Weekday::Thursday => "TH",
        Weekday::Friday => "FR",
        Weekday::Saturday => "SA",
        Weekday::Sunday => "SU",
    }
}

/// An immutable recurrence rule.
///
/// Field semantics follow RFC 5545 §3.3.10; empty vectors mean the part is
/// absent. Construct with [`RecurrenceRule::new`] and struct update syntax:
///
/// ```
/// use cadence_recur::{Frequency, RecurrenceRule};
///
/// let rule = RecurrenceRule {
///     interval: 2,
///     count: Some(10),
///     ..RecurrenceRule::new(Frequency::Weekly)
/// };
/// assert!(rule.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Frequency of recurrence.
    pub freq: Frequency,

    /// Repeat every `interval` frequency units; must be at least 1.
    pub interval: u32,

    /// Cap on the number of generated occurrences; exclusive with `until`.
    pub count: Option<u32>,

    /// Inclusive upper bound on occurrence instants; exclusive with `count`.
    pub until: Option<Timestamp>,

    /// Seconds 0-60 (60 admits a leap second, per the RFC grammar).
    pub by_second: Vec<i8>,

    /// Minutes 0-59.
    pub by_minute: Vec<i8>,

    /// Hours 0-23.
    pub by_hour: Vec<i8>,

    /// Weekdays, optionally with an ordinal for monthly/yearly rules.
    pub by_day: Vec<NthWeekday>,

    /// Days of month, 1-31 or -31..-1 counted from the month's end.
    pub by_month_day: Vec<i8>,

    /// Days of year, 1-366 or -366..-1 counted from the year's end.
    pub by_year_day: Vec<i16>,

    /// Week numbers, 1-53 or -53..-1 counted from the year's end; yearly
    /// rules only.
    pub by_week_no: Vec<i8>,

    /// Months 1-12.
    pub by_month: Vec<i8>,

    /// Positions selected from each unit's expanded candidate set, 1-based
    /// from the start or negative from the end.
    pub by_set_pos: Vec<i16>,

    /// First day of the week, used for weekly interval counting and week
    /// numbering.
    pub week_start: Weekday,
}

impl RecurrenceRule {
    /// A rule repeating at `freq` with interval 1 and no other parts.
    pub fn new(freq: Frequency) -> Self {
        RecurrenceRule {
            freq,
            interval: 1,
            count: None,
            until: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: Weekday::Monday,
        }
    }

    /// Checks the rule's structural constraints.
    ///
    /// Pure and side-effect-free; returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval == 0 {
            return Err(ValidationError::ZeroInterval);
        }
        if self.count == Some(0) {
            return Err(ValidationError::ZeroCount);
        }
        if self.count.is_some() && self.until.is_some() {
            return Err(ValidationError::CountAndUntil);
        }

        check_range("BYSECOND", iter_i32(&self.by_second), 0, 60, false)?;
        check_range("BYMINUTE", iter_i32(&self.by_minute), 0, 59, false)?;
        check_range("BYHOUR", iter_i32(&self.by_hour), 0, 23, false)?;
        check_range("BYMONTH", iter_i32(&self.by_month), 1, 12, false)?;
        check_range("BYMONTHDAY", iter_i32(&self.by_month_day), -31, 31, true)?;
        check_range(
            "BYYEARDAY",
            self.by_year_day.iter().map(|&v| i32::from(v)),
            -366,
            366,
            true,
        )?;
        check_range("BYWEEKNO", iter_i32(&self.by_week_no), -53, 53, true)?;
        check_range(
            "BYSETPOS",
            self.by_set_pos.iter().map(|&v| i32::from(v)),
            -366,
            366,
            true,
        )?;

        if !self.by_month_day.is_empty() && self.freq == Frequency::Weekly {
            return Err(ValidationError::PartNotAllowed {
                part: "BYMONTHDAY",
                freq: self.freq,
            });
        }
        if !self.by_year_day.is_empty()
            && matches!(
                self.freq,
                Frequency::Daily | Frequency::Weekly | Frequency::Monthly
            )
        {
            return Err(ValidationError::PartNotAllowed {
                part: "BYYEARDAY",
                freq: self.freq,
            });
        }
        if !self.by_week_no.is_empty() && self.freq != Frequency::Yearly {
            return Err(ValidationError::PartNotAllowed {
                part: "BYWEEKNO",
                freq: self.freq,
            });
        }

        for entry in &self.by_day {
            let Some(nth) = entry.nth else { continue };
            if nth == 0 || !(-53..=53).contains(&nth) {
                return Err(ValidationError::OutOfRange {
                    part: "BYDAY",
                    value: i32::from(nth),
                });
            }
            if !matches!(self.freq, Frequency::Monthly | Frequency::Yearly) {
                return Err(ValidationError::OrdinalNotAllowed(nth));
            }
            if !self.by_week_no.is_empty() {
                return Err(ValidationError::OrdinalWithWeekNo);
            }
        }

        if !self.by_set_pos.is_empty() && !self.has_other_by_rule() {
            return Err(ValidationError::SetPosWithoutByRule);
        }

        Ok(())
    }

    /// Whether any BY rule part other than BYSETPOS is present.
    fn has_other_by_rule(&self) -> bool {
        !self.by_second.is_empty()
            || !self.by_minute.is_empty()
            || !self.by_hour.is_empty()
            || !self.by_day.is_empty()
            || !self.by_month_day.is_empty()
            || !self.by_year_day.is_empty()
            || !self.by_week_no.is_empty()
            || !self.by_month.is_empty()
    }
}

fn iter_i32(values: &[i8]) -> impl Iterator<Item = i32> + '_ {
    values.iter().map(|&v| i32::from(v))
}

fn check_range<I>(
    part: &'static str,
    values: I,
    min: i32,
    max: i32,
    forbid_zero: bool,
) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = i32>,
{
    for value in values {
        if value < min || value > max || (forbid_zero && value == 0) {
            return Err(ValidationError::OutOfRange { part, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rule_is_valid() {
        for freq in [
            Frequency::Secondly,
            Frequency::Minutely,
            Frequency::Hourly,
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            assert_eq!(RecurrenceRule::new(freq).validate(), Ok(()), "{freq}");
        }
    }

    #[test]
    fn rejects_zero_interval() {
        let rule = RecurrenceRule {
            interval: 0,
            ..RecurrenceRule::new(Frequency::Daily)
        };
        assert_eq!(rule.validate(), Err(ValidationError::ZeroInterval));
    }

    #[test]
    fn rejects_count_and_until_together() {
        let rule = RecurrenceRule {
            count: Some(3),
            until: Some(Timestamp::UNIX_EPOCH),
            ..RecurrenceRule::new(Frequency::Daily)
        };
        assert_eq!(rule.validate(), Err(ValidationError::CountAndUntil));
    }

    #[test]
    fn rejects_zero_count() {
        let rule = RecurrenceRule {
            count: Some(0),
            ..RecurrenceRule::new(Frequency::Daily)
        };
        assert_eq!(rule.validate(), Err(ValidationError::ZeroCount));
    }

    #[test]
    fn rejects_setpos_without_other_by_rule() {
        let rule = RecurrenceRule {
            by_set_pos: vec![-1],
            ..RecurrenceRule::new(Frequency::Monthly)
        };
        assert_eq!(rule.validate(), Err(ValidationError::SetPosWithoutByRule));

        let rule = RecurrenceRule {
            by_set_pos: vec![-1],
            by_day: vec![NthWeekday::every(Weekday::Monday)],
            ..RecurrenceRule::new(Frequency::Monthly)
        };
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_values() {
        for (rule, value) in [
            (
                RecurrenceRule {
                    by_month: vec![13],
                    ..RecurrenceRule::new(Frequency::Yearly)
                },
                13,
            ),
            (
                RecurrenceRule {
                    by_month_day: vec![0],
                    ..RecurrenceRule::new(Frequency::Monthly)
                },
                0,
            ),
            (
                RecurrenceRule {
                    by_hour: vec![24],
                    ..RecurrenceRule::new(Frequency::Daily)
                },
                24,
            ),
            (
                RecurrenceRule {
                    by_week_no: vec![-54],
                    ..RecurrenceRule::new(Frequency::Yearly)
                },
                -54,
            ),
        ] {
            match rule.validate() {
                Err(ValidationError::OutOfRange { value: v, .. }) => assert_eq!(v, value),
                other => panic!("expected OutOfRange({value}), got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_parts_incompatible_with_frequency() {
        let rule = RecurrenceRule {
            by_month_day: vec![15],
            ..RecurrenceRule::new(Frequency::Weekly)
        };
        assert!(matches!(
            rule.validate(),
            Err(ValidationError::PartNotAllowed {
                part: "BYMONTHDAY",
                ..
            })
        ));

        let rule = RecurrenceRule {
            by_year_day: vec![100],
            ..RecurrenceRule::new(Frequency::Monthly)
        };
        assert!(matches!(
            rule.validate(),
            Err(ValidationError::PartNotAllowed {
                part: "BYYEARDAY",
                ..
            })
        ));

        let rule = RecurrenceRule {
            by_week_no: vec![20],
            ..RecurrenceRule::new(Frequency::Monthly)
        };
        assert!(matches!(
            rule.validate(),
            Err(ValidationError::PartNotAllowed {
                part: "BYWEEKNO",
                ..
            })
        ));

        // BYYEARDAY is admitted for sub-daily and yearly frequencies.
        let rule = RecurrenceRule {
            by_year_day: vec![100],
            ..RecurrenceRule::new(Frequency::Hourly)
        };
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn rejects_ordinals_outside_monthly_yearly() {
        let rule = RecurrenceRule {
            by_day: vec![NthWeekday::nth(2, Weekday::Friday)],
            ..RecurrenceRule::new(Frequency::Weekly)
        };
        assert_eq!(rule.validate(), Err(ValidationError::OrdinalNotAllowed(2)));

        let rule = RecurrenceRule {
            by_day: vec![NthWeekday::nth(2, Weekday::Friday)],
            ..RecurrenceRule::new(Frequency::Monthly)
        };
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn rejects_ordinal_with_week_numbers() {
        let rule = RecurrenceRule {
            by_day: vec![NthWeekday::nth(1, Weekday::Monday)],
            by_week_no: vec![20],
            ..RecurrenceRule::new(Frequency::Yearly)
        };
        assert_eq!(rule.validate(), Err(ValidationError::OrdinalWithWeekNo));
    }

    #[test]
    fn frequency_keywords_round_trip() {
        assert_eq!(Frequency::Daily.to_string(), "DAILY");
        assert_eq!("YEARLY".parse(), Ok(Frequency::Yearly));
        assert!("FORTNIGHTLY".parse::<Frequency>().is_err());
    }

    #[test]
    fn nth_weekday_display() {
        assert_eq!(NthWeekday::every(Weekday::Monday).to_string(), "MO");
        assert_eq!(NthWeekday::nth(2, Weekday::Friday).to_string(), "2FR");
        assert_eq!(NthWeekday::nth(-1, Weekday::Sunday).to_string(), "-1SU");
    }
}
