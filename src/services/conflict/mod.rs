//! Conflict detection for candidate lesson times.
//!
//! Two forms are supported: a recurring check against the weekly schedule
//! (lesson create/edit) and a date-specific check that also honours the
//! override tables (reschedule and drag).

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::lesson::{Lesson, ScheduleSlot};
use crate::models::overrides::{CancelledOccurrence, RescheduledOccurrence};
use crate::models::state::AppState;
use crate::utils::date::{day_of_week, DayOfWeek};
use crate::utils::time::{end_minutes, intervals_overlap, TimeOfDay};

/// An existing lesson that collides with a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictInfo {
    pub lesson_id: Uuid,
    pub lesson_title: String,
    /// Set when the collision is with an instance moved onto the date.
    pub rescheduled: bool,
}

impl ConflictInfo {
    fn recurring(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id,
            lesson_title: lesson.title.clone(),
            rescheduled: false,
        }
    }

    fn moved_in(lesson: &Lesson) -> Self {
        Self {
            rescheduled: true,
            ..Self::recurring(lesson)
        }
    }
}

/// What a date-specific check should ignore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclusion {
    /// Lesson being edited or moved; its recurring instances are skipped.
    pub lesson_id: Option<Uuid>,
    /// Recurring date of the instance being moved, paired with `lesson_id`.
    pub original_date: Option<NaiveDate>,
}

impl Exclusion {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn lesson(lesson_id: Uuid) -> Self {
        Self {
            lesson_id: Some(lesson_id),
            original_date: None,
        }
    }

    pub fn occurrence(lesson_id: Uuid, original_date: NaiveDate) -> Self {
        Self {
            lesson_id: Some(lesson_id),
            original_date: Some(original_date),
        }
    }

    fn skips_lesson(&self, lesson_id: Uuid) -> bool {
        self.lesson_id == Some(lesson_id)
    }

    fn skips_reschedule(&self, moved: &RescheduledOccurrence) -> bool {
        self.lesson_id == Some(moved.lesson_id) && self.original_date == Some(moved.original_date)
    }
}

/// Lessons whose weekly slots on `day` overlap the candidate interval.
pub fn find_recurring_conflicts(
    lessons: &[Lesson],
    day: DayOfWeek,
    start: TimeOfDay,
    duration: u32,
    exclude_lesson: Option<Uuid>,
) -> Vec<ConflictInfo> {
    if duration == 0 {
        return Vec::new();
    }

    let s1 = start.to_minutes();
    let e1 = end_minutes(start, duration);

    lessons
        .iter()
        .filter(|lesson| Some(lesson.id) != exclude_lesson)
        .filter(|lesson| {
            lesson
                .slots_on(day)
                .any(|(_, slot)| intervals_overlap(s1, e1, slot.start_minutes(), slot.end_minutes()))
        })
        .map(ConflictInfo::recurring)
        .collect()
}

/// Union of recurring conflicts for every slot of a lesson being edited,
/// one entry per conflicting lesson in first-seen order.
pub fn find_schedule_conflicts(
    lessons: &[Lesson],
    slots: &[ScheduleSlot],
    exclude_lesson: Option<Uuid>,
) -> Vec<ConflictInfo> {
    let mut conflicts: Vec<ConflictInfo> = Vec::new();

    for slot in slots {
        for conflict in find_recurring_conflicts(
            lessons,
            slot.day_of_week,
            slot.start_time,
            slot.duration,
            exclude_lesson,
        ) {
            if !conflicts.iter().any(|c| c.lesson_id == conflict.lesson_id) {
                conflicts.push(conflict);
            }
        }
    }

    conflicts
}

/// Collisions on a concrete date, honouring cancellations and reschedules.
pub fn find_date_conflicts(
    lessons: &[Lesson],
    cancellations: &[CancelledOccurrence],
    reschedules: &[RescheduledOccurrence],
    date: NaiveDate,
    start: TimeOfDay,
    duration: u32,
    exclusion: Exclusion,
) -> Vec<ConflictInfo> {
    if duration == 0 {
        return Vec::new();
    }

    let day = day_of_week(date);
    let s1 = start.to_minutes();
    let e1 = end_minutes(start, duration);
    let mut conflicts = Vec::new();

    for lesson in lessons {
        if exclusion.skips_lesson(lesson.id) || !lesson.runs_on(day) {
            continue;
        }
        if cancellations.iter().any(|c| c.matches(lesson.id, date)) {
            continue;
        }
        if reschedules.iter().any(|r| r.matches(lesson.id, date)) {
            continue;
        }

        let collides = lesson
            .slots_on(day)
            .any(|(_, slot)| intervals_overlap(s1, e1, slot.start_minutes(), slot.end_minutes()));
        if collides {
            conflicts.push(ConflictInfo::recurring(lesson));
        }
    }

    for moved in reschedules.iter().filter(|r| r.new_date == date) {
        if exclusion.skips_reschedule(moved) {
            continue;
        }
        let Some(lesson) = lessons.iter().find(|l| l.id == moved.lesson_id) else {
            continue;
        };

        if intervals_overlap(s1, e1, moved.start_minutes(), moved.end_minutes(lesson)) {
            conflicts.push(ConflictInfo::moved_in(lesson));
        }
    }

    conflicts
}

/// Conflict queries bound to one state snapshot.
pub struct ConflictDetector<'a> {
    state: &'a AppState,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn recurring(
        &self,
        day: DayOfWeek,
        start: TimeOfDay,
        duration: u32,
        exclude_lesson: Option<Uuid>,
    ) -> Vec<ConflictInfo> {
        find_recurring_conflicts(&self.state.lessons, day, start, duration, exclude_lesson)
    }

    pub fn schedule(&self, slots: &[ScheduleSlot], exclude_lesson: Option<Uuid>) -> Vec<ConflictInfo> {
        find_schedule_conflicts(&self.state.lessons, slots, exclude_lesson)
    }

    pub fn on_date(
        &self,
        date: NaiveDate,
        start: TimeOfDay,
        duration: u32,
        exclusion: Exclusion,
    ) -> Vec<ConflictInfo> {
        find_date_conflicts(
            &self.state.lessons,
            &self.state.cancelled_occurrences,
            &self.state.rescheduled_occurrences,
            date,
            start,
            duration,
            exclusion,
        )
    }
}
