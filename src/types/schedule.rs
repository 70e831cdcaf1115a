// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time program types for the domestic hot water schedule.
//!
//! The controller stores up to three switching periods per weekday and
//! exchanges them as space-separated `HH:MM-HH:MM` strings, padding unused
//! periods with `##:##-##:##`.
//!
//! # Examples
//!
//! ```
//! use chrono::{NaiveTime, Weekday};
//! use bsblan_lib::types::{DaySchedule, DhwSchedule, TimeSlot};
//!
//! let morning = TimeSlot::new(
//!     NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
//! ).unwrap();
//! let day = DaySchedule::new(vec![morning]).unwrap();
//! assert_eq!(day.to_string(), "06:00-08:00");
//!
//! let schedule = DhwSchedule::new().with_day(Weekday::Mon, day);
//! assert!(schedule.has_any_schedule());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};

use crate::error::ValueError;

/// Slot time format.
const SLOT_TIME_FORMAT: &str = "%H:%M";

/// Padding the controller uses for unused periods.
const EMPTY_SLOT: &str = "##:##-##:##";

/// Marker for "no data".
const UNDEFINED: &str = "---";

/// Weekdays in storage order.
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Maximum periods per day.
pub const MAX_SLOTS_PER_DAY: usize = 3;

// =============================================================================
// TimeSlot
// =============================================================================

/// One switching period within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TimeSlotOrder` unless `start` is strictly before `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValueError> {
        if start >= end {
            return Err(ValueError::TimeSlotOrder {
                start: start.format(SLOT_TIME_FORMAT).to_string(),
                end: end.format(SLOT_TIME_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Period start.
    #[must_use]
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Period end.
    #[must_use]
    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(SLOT_TIME_FORMAT),
            self.end.format(SLOT_TIME_FORMAT)
        )
    }
}

impl FromStr for TimeSlot {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidTimeSlot(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start, SLOT_TIME_FORMAT).map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end, SLOT_TIME_FORMAT).map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

// =============================================================================
// DaySchedule
// =============================================================================

/// The switching periods of one weekday (at most three).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaySchedule {
    slots: Vec<TimeSlot>,
}

impl DaySchedule {
    /// Creates a day schedule.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TooManySlots` for more than three periods.
    pub fn new(slots: Vec<TimeSlot>) -> Result<Self, ValueError> {
        if slots.len() > MAX_SLOTS_PER_DAY {
            return Err(ValueError::TooManySlots(slots.len()));
        }
        Ok(Self { slots })
    }

    /// A day without any period.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the periods.
    #[must_use]
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Returns true when the day has no period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .slots
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&joined)
    }
}

impl FromStr for DaySchedule {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == UNDEFINED {
            return Ok(Self::empty());
        }
        let slots = trimmed
            .split_whitespace()
            .filter(|part| *part != EMPTY_SLOT)
            .map(str::parse)
            .collect::<Result<Vec<TimeSlot>, _>>()?;
        Self::new(slots)
    }
}

// =============================================================================
// DhwSchedule
// =============================================================================

/// A weekly hot water time program. Days left unset are not written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DhwSchedule {
    days: [Option<DaySchedule>; 7],
}

impl DhwSchedule {
    /// Creates a schedule without any day.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the program for `weekday`.
    #[must_use]
    pub fn with_day(mut self, weekday: Weekday, schedule: DaySchedule) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = Some(schedule);
        self
    }

    /// Returns the program for `weekday`, if set.
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    /// Returns true if at least one day is set.
    #[must_use]
    pub fn has_any_schedule(&self) -> bool {
        self.days.iter().any(Option::is_some)
    }

    /// Iterates over the set days, Monday first.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        WEEK.into_iter()
            .zip(self.days.iter())
            .filter_map(|(weekday, day)| day.as_ref().map(|day| (weekday, day)))
    }
}
