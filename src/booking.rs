use crate::time_slot::{TimeSlot, format_time};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The person a booking is made for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
}

impl Teacher {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A reservation of one classroom for one date and time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub teacher: Teacher,
}

impl Booking {
    pub fn new(date: NaiveDate, time_slot: TimeSlot, teacher: Teacher) -> Self {
        Self {
            date,
            time_slot,
            teacher,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time_slot(&self) -> &TimeSlot {
        &self.time_slot
    }

    pub fn teacher(&self) -> &Teacher {
        &self.teacher
    }

    /// True when `self` and a candidate `(date, slot)` clash.
    pub fn conflicts_with(&self, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.date == date && self.time_slot.overlaps_with(slot)
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}-{}, {}",
            self.date.format("%Y-%m-%d"),
            self.time_slot.day_of_week(),
            format_time(self.time_slot.start_time()),
            format_time(self.time_slot.end_time()),
            self.teacher.name
        )
    }
}
