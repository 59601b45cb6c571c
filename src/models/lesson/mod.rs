// Lesson module
// Recurring weekly lesson with one or more schedule slots

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::date::DayOfWeek;
use crate::utils::time::{end_minutes, TimeOfDay};

/// Shortest slot the lesson form accepts, in minutes.
pub const MIN_SLOT_DURATION: u32 = 15;
/// Longest slot the lesson form accepts, in minutes.
pub const MAX_SLOT_DURATION: u32 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Paid,
    Free,
}

impl Default for LessonType {
    fn default() -> Self {
        Self::Paid
    }
}

/// Where a lesson normally happens every week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    /// Length in minutes
    pub duration: u32,
}

impl ScheduleSlot {
    pub fn new(day_of_week: DayOfWeek, start_time: TimeOfDay, duration: u32) -> Self {
        Self {
            day_of_week,
            start_time,
            duration,
        }
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_time.to_minutes()
    }

    pub fn end_minutes(&self) -> u32 {
        end_minutes(self.start_time, self.duration)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SLOT_DURATION..=MAX_SLOT_DURATION).contains(&self.duration) {
            return Err(format!(
                "Slot duration must be between {} and {} minutes",
                MIN_SLOT_DURATION, MAX_SLOT_DURATION
            ));
        }
        if self.start_time.hours > 23 || self.start_time.minutes > 59 {
            return Err("Slot start time is out of range".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub schedule: Vec<ScheduleSlot>,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Lesson {
    /// Create a builder for a lesson draft
    pub fn builder() -> LessonBuilder {
        LessonBuilder::new()
    }

    /// Slots that fall on `day`, with their index in the schedule.
    pub fn slots_on(&self, day: DayOfWeek) -> impl Iterator<Item = (usize, &ScheduleSlot)> {
        self.schedule
            .iter()
            .enumerate()
            .filter(move |(_, slot)| slot.day_of_week == day)
    }

    pub fn runs_on(&self, day: DayOfWeek) -> bool {
        self.slots_on(day).next().is_some()
    }

    /// Duration of the first slot, used when no better slot is known.
    pub fn default_duration(&self) -> u32 {
        self.schedule.first().map(|slot| slot.duration).unwrap_or(0)
    }

    pub fn has_participant(&self, participant_id: Uuid) -> bool {
        self.participant_ids.contains(&participant_id)
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.title, &self.schedule, self.color.as_deref())
    }
}

fn validate_fields(title: &str, schedule: &[ScheduleSlot], color: Option<&str>) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Lesson title cannot be empty".to_string());
    }

    if schedule.is_empty() {
        return Err("Lesson must have at least one schedule slot".to_string());
    }

    for slot in schedule {
        slot.validate()?;
    }

    if let Some(color) = color {
        if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
            return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
        }
    }

    Ok(())
}

/// Lesson content without identity or timestamps; the mutation engine
/// assigns those when the draft is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub title: String,
    pub schedule: Vec<ScheduleSlot>,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LessonDraft {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.title, &self.schedule, self.color.as_deref())
    }

    pub fn into_lesson(self, id: Uuid, now: DateTime<Local>) -> Lesson {
        let mut participant_ids = self.participant_ids;
        dedup_preserving_order(&mut participant_ids);

        Lesson {
            id,
            title: self.title,
            schedule: self.schedule,
            lesson_type: self.lesson_type,
            participant_ids,
            color: self.color,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial lesson update. `None` leaves a field untouched; for the optional
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub schedule: Option<Vec<ScheduleSlot>>,
    pub lesson_type: Option<LessonType>,
    pub participant_ids: Option<Vec<Uuid>>,
    pub color: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl LessonPatch {
    pub fn apply_to(self, lesson: &mut Lesson) {
        if let Some(title) = self.title {
            lesson.title = title;
        }
        if let Some(schedule) = self.schedule {
            lesson.schedule = schedule;
        }
        if let Some(lesson_type) = self.lesson_type {
            lesson.lesson_type = lesson_type;
        }
        if let Some(mut participant_ids) = self.participant_ids {
            dedup_preserving_order(&mut participant_ids);
            lesson.participant_ids = participant_ids;
        }
        if let Some(color) = self.color {
            lesson.color = color;
        }
        if let Some(notes) = self.notes {
            lesson.notes = notes;
        }
    }
}

fn dedup_preserving_order(ids: &mut Vec<Uuid>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

/// Builder for lesson drafts with validation
pub struct LessonBuilder {
    title: Option<String>,
    schedule: Vec<ScheduleSlot>,
    lesson_type: LessonType,
    participant_ids: Vec<Uuid>,
    color: Option<String>,
    notes: Option<String>,
}

impl LessonBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            schedule: Vec::new(),
            lesson_type: LessonType::default(),
            participant_ids: Vec::new(),
            color: None,
            notes: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a weekly slot
    pub fn slot(mut self, day_of_week: DayOfWeek, start_time: TimeOfDay, duration: u32) -> Self {
        self.schedule
            .push(ScheduleSlot::new(day_of_week, start_time, duration));
        self
    }

    pub fn lesson_type(mut self, lesson_type: LessonType) -> Self {
        self.lesson_type = lesson_type;
        self
    }

    pub fn participant(mut self, participant_id: Uuid) -> Self {
        self.participant_ids.push(participant_id);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn build(self) -> Result<LessonDraft, String> {
        let title = self.title.ok_or("Lesson title is required")?;

        let draft = LessonDraft {
            title: title.trim().to_string(),
            schedule: self.schedule,
            lesson_type: self.lesson_type,
            participant_ids: self.participant_ids,
            color: self.color,
            notes: self.notes.filter(|notes| !notes.trim().is_empty()),
        };

        draft.validate()?;
        Ok(draft)
    }
}

impl Default for LessonBuilder {
    fn default() -> Self {
        Self::new()
    }
}
