//! Aggregate root holding every collection of the scheduler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::lesson::Lesson;
use crate::models::overrides::{CancelledOccurrence, RescheduledOccurrence};
use crate::models::participant::Participant;
use crate::models::payment::PaymentRecord;
use crate::models::settings::Settings;

/// Whole application state. Transitions replace it wholesale via
/// [`crate::services::schedule::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub lessons: Vec<Lesson>,
    pub participants: Vec<Participant>,
    pub payment_records: Vec<PaymentRecord>,
    pub cancelled_occurrences: Vec<CancelledOccurrence>,
    pub rescheduled_occurrences: Vec<RescheduledOccurrence>,
    pub settings: Settings,
}

impl AppState {
    pub fn lesson(&self, id: Uuid) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
            && self.participants.is_empty()
            && self.payment_records.is_empty()
            && self.cancelled_occurrences.is_empty()
            && self.rescheduled_occurrences.is_empty()
    }
}
