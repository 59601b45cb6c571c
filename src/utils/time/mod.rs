// Time utility functions
// Minute-granularity time-of-day arithmetic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
}

impl TimeOfDay {
    pub fn new(hours: u8, minutes: u8) -> Self {
        Self { hours, minutes }
    }

    /// Minutes elapsed since midnight.
    pub fn to_minutes(self) -> u32 {
        self.hours as u32 * 60 + self.minutes as u32
    }

    /// Inverse of [`TimeOfDay::to_minutes`]. Values past the end of the day
    /// wrap around midnight.
    pub fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hours: (minutes / 60) as u8,
            minutes: (minutes % 60) as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Time must be in HH:MM format: {}", s))?;
        let hours: u8 = h.parse().map_err(|_| format!("Invalid hours: {}", h))?;
        let minutes: u8 = m.parse().map_err(|_| format!("Invalid minutes: {}", m))?;

        if hours > 23 || minutes > 59 {
            return Err(format!("Time out of range: {}", s));
        }

        Ok(Self { hours, minutes })
    }
}

/// End of an interval in minutes since midnight. May exceed one day.
pub fn end_minutes(start: TimeOfDay, duration_minutes: u32) -> u32 {
    start.to_minutes() + duration_minutes
}

/// Half-open interval overlap: touching endpoints do not overlap.
pub fn intervals_overlap(s1: u32, e1: u32, s2: u32, e2: u32) -> bool {
    s1 < e2 && s2 < e1
}
