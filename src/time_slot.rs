use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSlotError {
    #[error("time slot start {start} must be before end {end}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },
    #[error("{0}")]
    Parse(String),
}

/// A half-open `[start_time, end_time)` interval tagged with a day of week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot")]
pub struct TimeSlot {
    day_of_week: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

#[derive(Deserialize)]
struct RawTimeSlot {
    day_of_week: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(raw: RawTimeSlot) -> Result<Self, Self::Error> {
        TimeSlot::new(raw.day_of_week, raw.start_time, raw.end_time)
    }
}

impl TimeSlot {
    pub fn new(
        day_of_week: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, TimeSlotError> {
        if start_time >= end_time {
            return Err(TimeSlotError::InvalidInterval {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            day_of_week,
            start_time,
            end_time,
        })
    }

    /// Builds a slot whose day of week is taken from `date`.
    pub fn for_date(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, TimeSlotError> {
        Self::new(date.weekday(), start_time, end_time)
    }

    /// Parses textual input such as `("Mon", "09:00", "10:00")`.
    pub fn parse(day: &str, start: &str, end: &str) -> Result<Self, TimeSlotError> {
        let day_of_week = day
            .trim()
            .parse::<Weekday>()
            .map_err(|_| TimeSlotError::Parse(format!("invalid day of week '{day}'")))?;
        Self::new(day_of_week, parse_time(start)?, parse_time(end)?)
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    /// True when both slots fall on the same day of week and their ranges
    /// intersect. Slots that only touch at an endpoint do not overlap.
    pub fn overlaps_with(&self, other: &TimeSlot) -> bool {
        self.day_of_week == other.day_of_week
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day_of_week,
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(input: &str) -> Result<NaiveTime, TimeSlotError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| TimeSlotError::Parse(format!("invalid time '{input}': {e}")))
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_intervals() {
        assert_eq!(
            TimeSlot::new(Weekday::Mon, t(10, 0), t(10, 0)),
            Err(TimeSlotError::InvalidInterval {
                start: t(10, 0),
                end: t(10, 0)
            })
        );
        assert!(TimeSlot::new(Weekday::Mon, t(11, 0), t(10, 0)).is_err());
    }

    #[test]
    fn parse_accepts_short_and_long_times() {
        let slot = TimeSlot::parse("Tue", "08:30", "09:15:00").unwrap();
        assert_eq!(slot.day_of_week(), Weekday::Tue);
        assert_eq!(slot.start_time(), t(8, 30));
        assert_eq!(slot.end_time(), t(9, 15));
        assert_eq!(slot.duration(), TimeDelta::minutes(45));
        assert_eq!(slot.to_string(), "Tue 08:30-09:15");
    }

    #[test]
    fn parse_reports_bad_tokens() {
        assert!(matches!(
            TimeSlot::parse("Someday", "08:00", "09:00"),
            Err(TimeSlotError::Parse(_))
        ));
        assert!(matches!(
            TimeSlot::parse("Mon", "8am", "09:00"),
            Err(TimeSlotError::Parse(_))
        ));
    }

    #[test]
    fn deserialize_enforces_interval() {
        let bad = r#"{"day_of_week":"Mon","start_time":"10:00:00","end_time":"09:00:00"}"#;
        assert!(serde_json::from_str::<TimeSlot>(bad).is_err());

        let good = r#"{"day_of_week":"Mon","start_time":"09:00:00","end_time":"10:00:00"}"#;
        let slot: TimeSlot = serde_json::from_str(good).unwrap();
        assert_eq!(slot.start_time(), t(9, 0));
    }
}
