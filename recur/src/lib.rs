// SPDX-FileCopyrightText: 2026 Cadence Maintainers
//
// SPDX-License-Identifier: Apache-2.0

//! Expand RFC 5545 recurrence rules into concrete occurrence instants.
//!
//! The crate takes an already-parsed [`RecurrenceRule`], the event's start
//! as a [`WallTime`], and an [`ExceptionSet`], and produces a lazy,
//! time-ordered stream of [`Occurrence`]s. Parsing, wire transport and
//! persistence live in the surrounding layers; this crate is pure
//! computation over immutable inputs.
//!
//! ```
//! use cadence_recur::{ExceptionSet, Frequency, RecurrenceRule, WallTime, expand};
//! use jiff::civil::date;
//!
//! let rule = RecurrenceRule {
//!     count: Some(3),
//!     ..RecurrenceRule::new(Frequency::Daily)
//! };
//! let start = WallTime::utc(date(2025, 1, 1).at(9, 0, 0, 0));
//!
//! let occurrences = expand(&rule, &start, &ExceptionSet::default(), None)?
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! assert_eq!(occurrences.len(), 3);
//! let first: jiff::Timestamp = "2025-01-01T09:00:00Z".parse()?;
//! let third: jiff::Timestamp = "2025-01-03T09:00:00Z".parse()?;
//! assert_eq!(occurrences[0].instant, first);
//! assert_eq!(occurrences[2].instant, third);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::similar_names
)]

mod error;
mod exception;
mod expand;
mod rule;
mod walltime;
mod zone;

pub use crate::error::{Error, ValidationError};
pub use crate::exception::ExceptionSet;
pub use crate::expand::{
    Expander, Occurrence, OccurrenceKind, Occurrences, TimeRange, expand,
};
pub use crate::rule::{Frequency, NthWeekday, RecurrenceRule};
pub use crate::walltime::{WallTime, ZoneRef};
pub use crate::zone::{SystemZones, ZoneProvider};
