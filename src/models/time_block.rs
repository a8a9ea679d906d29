use chrono::NaiveDateTime;

use crate::errors::ScheduleError;

const SAME_DAY_FORMAT: &str = "%-I:%M %p";
const FULL_FORMAT: &str = "%-m/%-d/%y %-I:%M %p";

/// A closed wall-clock interval. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeBlock {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Touching endpoints count as an overlap.
    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn display(&self, now: NaiveDateTime) -> String {
        let today = now.date();
        let format = if self.start.date() == today && self.end.date() == today {
            SAME_DAY_FORMAT
        } else {
            FULL_FORMAT
        };
        format!("{} - {}", self.start.format(format), self.end.format(format))
    }
}
