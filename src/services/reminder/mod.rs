//! Upcoming-lesson reminders.
//!
//! The host polls [`ReminderTracker::poll`] every [`POLL_INTERVAL_SECS`];
//! each occurrence is announced at most once while it sits inside the
//! configured lead window.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use uuid::Uuid;

use crate::models::state::AppState;
use crate::services::occurrence::{resolve_day, OccurrenceKind};
use crate::utils::time::TimeOfDay;

pub const POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub lesson_id: Uuid,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub key: ReminderKey,
    pub lesson_title: String,
    pub minutes_until: u32,
    /// Occurrence was moved onto today
    pub rescheduled: bool,
}

impl Reminder {
    pub fn summary(&self) -> String {
        if self.rescheduled {
            format!("{} (rescheduled)", self.lesson_title)
        } else {
            self.lesson_title.clone()
        }
    }

    pub fn body(&self) -> String {
        format!("Starts in {} min", self.minutes_until)
    }
}

/// Occurrences of `now`'s date whose start is within the lead window.
/// Returns nothing when reminders are switched off.
pub fn due_reminders(state: &AppState, now: NaiveDateTime) -> Vec<Reminder> {
    if !state.settings.notifications_enabled {
        return Vec::new();
    }

    let lead = state.settings.notification_minutes_before;
    let current = now.hour() * 60 + now.minute();
    let today = now.date();

    resolve_day(state, today)
        .into_iter()
        .filter(|o| !o.is_rescheduled_away())
        .filter_map(|o| {
            let start = o.start_minutes();
            let window_start = start.saturating_sub(lead);
            if current < window_start || current >= start {
                return None;
            }
            Some(Reminder {
                key: ReminderKey {
                    lesson_id: o.lesson_id,
                    date: today,
                    start_time: o.start_time,
                },
                lesson_title: o.lesson_title,
                minutes_until: start - current,
                rescheduled: matches!(o.kind, OccurrenceKind::RescheduledIn { .. }),
            })
        })
        .collect()
}

/// Remembers which reminders have already gone out.
#[derive(Debug, Default)]
pub struct ReminderTracker {
    sent: HashSet<ReminderKey>,
}

impl ReminderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Due reminders that have not been returned before.
    pub fn poll(&mut self, state: &AppState, now: NaiveDateTime) -> Vec<Reminder> {
        let fresh: Vec<Reminder> = due_reminders(state, now)
            .into_iter()
            .filter(|r| self.sent.insert(r.key))
            .collect();
        if !fresh.is_empty() {
            log::debug!("{} reminder(s) due at {}", fresh.len(), now);
        }
        fresh
    }

    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    /// Forget keys from days before `today`.
    pub fn prune_before(&mut self, today: NaiveDate) {
        self.sent.retain(|key| key.date >= today);
    }
}
