// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

use crate::rule::Frequency;

/// Errors produced while expanding a recurrence rule.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The rule violates a structural constraint; reported before any
    /// generation begins.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A named time zone could not be resolved by the zone provider.
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// The expansion exceeded its iteration safety cap (or ran off the end
    /// of the representable calendar) without reaching COUNT, UNTIL, or a
    /// window bound.
    #[error("recurrence expansion exceeded its iteration safety cap")]
    Overflow,
}

/// A structural constraint violated by a [`RecurrenceRule`].
///
/// [`RecurrenceRule`]: crate::RecurrenceRule
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// INTERVAL was zero.
    #[error("INTERVAL must be at least 1")]
    ZeroInterval,

    /// COUNT was zero.
    #[error("COUNT must be at least 1")]
    ZeroCount,

    /// Both COUNT and UNTIL were set.
    #[error("COUNT and UNTIL are mutually exclusive")]
    CountAndUntil,

    /// BYSETPOS was set without any other BY rule part to select from.
    #[error("BYSETPOS requires at least one other BY rule part")]
    SetPosWithoutByRule,

    /// A BY rule part contained a value outside its permitted range.
    #[error("{part} value {value} is out of range")]
    OutOfRange {
        /// The offending rule part, e.g. `"BYMONTHDAY"`.
        part: &'static str,
        /// The rejected value.
        value: i32,
    },

    /// A BY rule part was combined with a frequency that does not admit it.
    #[error("{part} is not valid with FREQ={freq}")]
    PartNotAllowed {
        /// The offending rule part, e.g. `"BYWEEKNO"`.
        part: &'static str,
        /// The rule's frequency.
        freq: Frequency,
    },

    /// A BYDAY entry carried an ordinal with a frequency other than
    /// monthly or yearly.
    #[error("BYDAY ordinal {0} is only valid with FREQ=MONTHLY or FREQ=YEARLY")]
    OrdinalNotAllowed(i8),

    /// A BYDAY entry carried an ordinal while BYWEEKNO was present.
    #[error("BYDAY ordinals cannot be combined with BYWEEKNO")]
    OrdinalWithWeekNo,
}
