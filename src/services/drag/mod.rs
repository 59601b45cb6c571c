//! Drag-and-drop repositioning of lesson occurrences on the week grid.
//!
//! A [`DragSession`] lives for one pointer gesture. Every pointer move
//! recomputes the candidate slot and its conflicts from the current state
//! snapshot; nothing is committed until [`DragSession::end`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::state::AppState;
use crate::services::conflict::{ConflictDetector, ConflictInfo, Exclusion};
use crate::services::occurrence::Occurrence;
use crate::services::schedule::{apply_all, Action};
use crate::utils::date::day_of_week;
use crate::utils::time::{TimeOfDay, MINUTES_PER_DAY};

/// Tuning for pointer handling on the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Movement in either axis before a press becomes a drag
    pub threshold_px: f32,
    pub snap_minutes: u32,
    pub px_per_hour: f32,
    pub column_width: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold_px: 5.0,
            snap_minutes: 15,
            px_per_hour: 60.0,
            column_width: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position of the time grid's top-left corner (Monday column, first hour).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridGeometry {
    pub left: f32,
    pub top: f32,
}

#[derive(Debug, Clone)]
struct DragOrigin {
    occurrence: Occurrence,
    week: [NaiveDate; 7],
    day_index: usize,
    time_minutes: u32,
    pointer: Point,
    calendar_start_hour: u8,
    /// Duration a reschedule without override resolves to
    fallback_duration: u32,
    /// Slot start times on the recurring date's weekday
    home_starts: Vec<TimeOfDay>,
}

impl DragOrigin {
    /// Refresh lesson-derived fields from `state`; keeps the occurrence's
    /// own slot values when the lesson is gone.
    fn bind_lesson(&mut self, state: &AppState) {
        let Some(lesson) = state.lesson(self.occurrence.lesson_id) else {
            return;
        };
        let weekday = day_of_week(self.occurrence.recurring_date());
        self.fallback_duration = lesson.default_duration();
        self.home_starts = lesson
            .slots_on(weekday)
            .map(|(_, slot)| slot.start_time)
            .collect();
    }

    /// Whether dropping at `date`/`start` puts the instance back on its
    /// recurring slot. Moved-in instances no longer know their slot, so
    /// any slot of that weekday counts.
    fn is_home(&self, date: NaiveDate, start: TimeOfDay) -> bool {
        let occurrence = &self.occurrence;
        if date != occurrence.recurring_date() {
            return false;
        }
        if occurrence.is_rescheduled() {
            self.home_starts.contains(&start)
        } else {
            start == occurrence.slot.start_time
        }
    }
}

/// Latest pointed-at slot and its conflicts.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCandidate {
    pub day_index: usize,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub conflicts: Vec<ConflictInfo>,
}

impl DragCandidate {
    pub fn is_blocked(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
enum DragPhase {
    #[default]
    Idle,
    Armed(DragOrigin),
    Dragging {
        origin: DragOrigin,
        candidate: Option<DragCandidate>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    NotStarted,
    BelowThreshold,
    NoCandidate,
    Unchanged,
    Conflicts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Discarded(DiscardReason),
    /// Actions to apply, in order
    Committed(Vec<Action>),
}

impl DropOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, DropOutcome::Committed(_))
    }

    /// Apply the committed actions, or return `state` untouched.
    pub fn apply(self, state: AppState) -> AppState {
        match self {
            DropOutcome::Committed(actions) => apply_all(state, actions),
            DropOutcome::Discarded(_) => state,
        }
    }
}

pub struct DragSession {
    config: DragConfig,
    grid: GridGeometry,
    phase: DragPhase,
    suppress_click: bool,
}

impl DragSession {
    pub fn new(config: DragConfig, grid: GridGeometry) -> Self {
        Self {
            config,
            grid,
            phase: DragPhase::Idle,
            suppress_click: false,
        }
    }

    /// Pointer-down over `occurrence`. Returns whether the session armed;
    /// moved-away markers and dates outside `week` are not draggable.
    pub fn begin(
        &mut self,
        occurrence: &Occurrence,
        week: [NaiveDate; 7],
        pointer: Point,
        calendar_start_hour: u8,
    ) -> bool {
        if !occurrence.is_draggable() {
            log::debug!("Ignoring drag of moved-away occurrence {}", occurrence.lesson_id);
            self.phase = DragPhase::Idle;
            return false;
        }

        let Some(day_index) = week.iter().position(|d| *d == occurrence.date) else {
            self.phase = DragPhase::Idle;
            return false;
        };

        self.phase = DragPhase::Armed(DragOrigin {
            occurrence: occurrence.clone(),
            week,
            day_index,
            time_minutes: occurrence.start_minutes(),
            pointer,
            calendar_start_hour,
            fallback_duration: occurrence.slot.duration,
            home_starts: vec![occurrence.slot.start_time],
        });
        true
    }

    /// Pointer movement. Returns the current candidate once dragging.
    pub fn pointer_move(&mut self, pointer: Point, state: &AppState) -> Option<&DragCandidate> {
        if let DragPhase::Armed(origin) = &self.phase {
            let dx = (pointer.x - origin.pointer.x).abs();
            let dy = (pointer.y - origin.pointer.y).abs();
            if dx < self.config.threshold_px && dy < self.config.threshold_px {
                return None;
            }
            let mut origin = origin.clone();
            origin.bind_lesson(state);
            self.phase = DragPhase::Dragging {
                origin,
                candidate: None,
            };
        }

        let (config, grid) = (self.config, self.grid);
        match &mut self.phase {
            DragPhase::Dragging { origin, candidate } => {
                if let Some(next) = compute_candidate(&config, &grid, origin, pointer, state) {
                    *candidate = Some(next);
                }
                candidate.as_ref()
            }
            _ => None,
        }
    }

    /// Pointer-up. Always returns the session to idle.
    pub fn end(&mut self) -> DropOutcome {
        let (origin, candidate) = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return DropOutcome::Discarded(DiscardReason::NotStarted),
            DragPhase::Armed(_) => return DropOutcome::Discarded(DiscardReason::BelowThreshold),
            DragPhase::Dragging { origin, candidate } => (origin, candidate),
        };

        let Some(candidate) = candidate else {
            return DropOutcome::Discarded(DiscardReason::NoCandidate);
        };

        if candidate.day_index == origin.day_index
            && candidate.start_time.to_minutes() == origin.time_minutes
        {
            return DropOutcome::Discarded(DiscardReason::Unchanged);
        }

        if candidate.is_blocked() {
            log::debug!(
                "Drop of {} blocked by {} conflict(s)",
                origin.occurrence.lesson_title,
                candidate.conflicts.len()
            );
            return DropOutcome::Discarded(DiscardReason::Conflicts);
        }

        let occurrence = &origin.occurrence;
        let recurring_date = occurrence.recurring_date();
        let mut actions = Vec::with_capacity(2);

        if occurrence.is_rescheduled() {
            actions.push(Action::UnrescheduleOccurrence {
                lesson_id: occurrence.lesson_id,
                original_date: recurring_date,
            });
        }

        if !origin.is_home(candidate.date, candidate.start_time) {
            actions.push(Action::RescheduleOccurrence {
                lesson_id: occurrence.lesson_id,
                original_date: recurring_date,
                new_date: candidate.date,
                new_start_time: candidate.start_time,
                new_duration: (occurrence.duration != origin.fallback_duration)
                    .then_some(occurrence.duration),
            });
        }

        log::info!(
            "Dropped {} on {} {}",
            occurrence.lesson_title,
            candidate.date,
            candidate.start_time
        );
        self.suppress_click = true;
        DropOutcome::Committed(actions)
    }

    /// Abandon the gesture without an outcome.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    /// Clear the post-drop click suppression at the next frame.
    pub fn next_frame(&mut self) {
        self.suppress_click = false;
    }

    /// Whether a click should be swallowed because a drop just happened.
    pub fn take_click_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, DragPhase::Armed(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn candidate(&self) -> Option<&DragCandidate> {
        match &self.phase {
            DragPhase::Dragging { candidate, .. } => candidate.as_ref(),
            _ => None,
        }
    }
}

fn compute_candidate(
    config: &DragConfig,
    grid: &GridGeometry,
    origin: &DragOrigin,
    pointer: Point,
    state: &AppState,
) -> Option<DragCandidate> {
    let column = ((pointer.x - grid.left) / config.column_width).floor();
    if !(0.0..7.0).contains(&column) {
        return None;
    }
    let day_index = column as usize;
    let date = origin.week[day_index];

    let raw_minutes = origin.calendar_start_hour as f32 * 60.0
        + (pointer.y - grid.top) / config.px_per_hour * 60.0;
    let start_time = TimeOfDay::from_minutes(snap_minutes(raw_minutes, config.snap_minutes));

    let occurrence = &origin.occurrence;
    let conflicts = ConflictDetector::new(state).on_date(
        date,
        start_time,
        occurrence.duration,
        Exclusion::occurrence(occurrence.lesson_id, occurrence.recurring_date()),
    );

    Some(DragCandidate {
        day_index,
        date,
        start_time,
        conflicts,
    })
}

/// Round to the nearest grid step and clamp to the last step of the day.
fn snap_minutes(raw: f32, step: u32) -> u32 {
    let step = step.max(1);
    let latest = MINUTES_PER_DAY - step;
    let snapped = (raw / step as f32).round() * step as f32;
    (snapped.max(0.0) as u32).min(latest)
}
