// Occurrence overrides
// Per-date cancellations and reschedules layered over the weekly schedule

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::lesson::Lesson;
use crate::utils::time::{end_minutes, TimeOfDay};

/// Suppresses a single recurrence of a lesson on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledOccurrence {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub cancelled_at: DateTime<Local>,
}

impl CancelledOccurrence {
    pub fn matches(&self, lesson_id: Uuid, date: NaiveDate) -> bool {
        self.lesson_id == lesson_id && self.date == date
    }
}

/// Moves the recurrence on `original_date` to `new_date` at `new_start_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduledOccurrence {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub original_date: NaiveDate,
    pub new_date: NaiveDate,
    pub new_start_time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_duration: Option<u32>,
    pub rescheduled_at: DateTime<Local>,
}

impl RescheduledOccurrence {
    pub fn matches(&self, lesson_id: Uuid, original_date: NaiveDate) -> bool {
        self.lesson_id == lesson_id && self.original_date == original_date
    }

    /// Explicit override, else the lesson's first-slot duration.
    pub fn effective_duration(&self, lesson: &Lesson) -> u32 {
        self.new_duration.unwrap_or_else(|| lesson.default_duration())
    }

    pub fn start_minutes(&self) -> u32 {
        self.new_start_time.to_minutes()
    }

    pub fn end_minutes(&self, lesson: &Lesson) -> u32 {
        end_minutes(self.new_start_time, self.effective_duration(lesson))
    }
}
