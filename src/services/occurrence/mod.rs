//! Occurrence resolution.
//! Expands weekly lesson schedules over a sequence of dates and reconciles
//! them with cancellation and reschedule overrides.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::lesson::{Lesson, ScheduleSlot};
use crate::models::overrides::{CancelledOccurrence, RescheduledOccurrence};
use crate::models::state::AppState;
use crate::utils::date::{day_of_week, week_dates};
use crate::utils::time::{end_minutes, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceKind {
    /// Recurring instance at its scheduled time.
    Live,
    /// Instance moved onto this date from `original_date`.
    RescheduledIn { original_date: NaiveDate },
    /// Display-only marker left behind on the recurring date.
    RescheduledAway { rescheduled_to: NaiveDate },
}

/// One concrete, dated instance of a lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub lesson_id: Uuid,
    pub lesson_title: String,
    pub color: Option<String>,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub duration: u32,
    pub slot_index: usize,
    /// The recurring slot this occurrence derives from.
    pub slot: ScheduleSlot,
    pub kind: OccurrenceKind,
}

impl Occurrence {
    fn from_slot(lesson: &Lesson, date: NaiveDate, slot_index: usize, slot: ScheduleSlot, kind: OccurrenceKind) -> Self {
        Self {
            lesson_id: lesson.id,
            lesson_title: lesson.title.clone(),
            color: lesson.color.clone(),
            date,
            start_time: slot.start_time,
            duration: slot.duration,
            slot_index,
            slot,
            kind,
        }
    }

    pub fn is_rescheduled(&self) -> bool {
        matches!(self.kind, OccurrenceKind::RescheduledIn { .. })
    }

    pub fn is_rescheduled_away(&self) -> bool {
        matches!(self.kind, OccurrenceKind::RescheduledAway { .. })
    }

    pub fn original_date(&self) -> Option<NaiveDate> {
        match self.kind {
            OccurrenceKind::RescheduledIn { original_date } => Some(original_date),
            _ => None,
        }
    }

    pub fn rescheduled_to_date(&self) -> Option<NaiveDate> {
        match self.kind {
            OccurrenceKind::RescheduledAway { rescheduled_to } => Some(rescheduled_to),
            _ => None,
        }
    }

    /// Date of the recurrence this instance stands for.
    pub fn recurring_date(&self) -> NaiveDate {
        self.original_date().unwrap_or(self.date)
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_time.to_minutes()
    }

    pub fn end_minutes(&self) -> u32 {
        end_minutes(self.start_time, self.duration)
    }

    pub fn is_draggable(&self) -> bool {
        !self.is_rescheduled_away()
    }
}

/// Resolve the occurrences of `lessons` on each of `dates`, in date order.
pub fn resolve<I>(
    lessons: &[Lesson],
    cancellations: &[CancelledOccurrence],
    reschedules: &[RescheduledOccurrence],
    dates: I,
) -> Vec<Occurrence>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut occurrences = Vec::new();

    for date in dates {
        let day = day_of_week(date);

        for lesson in lessons {
            for (slot_index, slot) in lesson.slots_on(day) {
                if cancellations.iter().any(|c| c.matches(lesson.id, date)) {
                    continue;
                }

                let kind = match reschedules.iter().find(|r| r.matches(lesson.id, date)) {
                    Some(moved) => OccurrenceKind::RescheduledAway {
                        rescheduled_to: moved.new_date,
                    },
                    None => OccurrenceKind::Live,
                };

                occurrences.push(Occurrence::from_slot(lesson, date, slot_index, *slot, kind));
            }
        }

        for moved in reschedules.iter().filter(|r| r.new_date == date) {
            let Some(lesson) = lessons.iter().find(|l| l.id == moved.lesson_id) else {
                log::debug!(
                    "Skipping reschedule {} of missing lesson {}",
                    moved.id,
                    moved.lesson_id
                );
                continue;
            };
            let Some(slot) = lesson.schedule.first().copied() else {
                continue;
            };

            occurrences.push(Occurrence {
                start_time: moved.new_start_time,
                duration: moved.effective_duration(lesson),
                ..Occurrence::from_slot(
                    lesson,
                    date,
                    0,
                    slot,
                    OccurrenceKind::RescheduledIn {
                        original_date: moved.original_date,
                    },
                )
            });
        }
    }

    occurrences
}

/// Occurrences of the Monday-based week containing `reference`.
pub fn resolve_week(state: &AppState, reference: NaiveDate) -> Vec<Occurrence> {
    let occurrences = resolve(
        &state.lessons,
        &state.cancelled_occurrences,
        &state.rescheduled_occurrences,
        week_dates(reference),
    );
    log::debug!(
        "Resolved {} occurrences for week of {}",
        occurrences.len(),
        reference
    );
    occurrences
}

/// Occurrences on a single day.
pub fn resolve_day(state: &AppState, date: NaiveDate) -> Vec<Occurrence> {
    resolve(
        &state.lessons,
        &state.cancelled_occurrences,
        &state.rescheduled_occurrences,
        [date],
    )
}
