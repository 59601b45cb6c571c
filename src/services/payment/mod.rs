// Payment module
// Monthly payment queries over the participant/lesson ledger

use uuid::Uuid;

use crate::models::lesson::{Lesson, LessonType};
use crate::models::payment::{PaymentRecord, PaymentStatus};
use crate::models::state::AppState;
use crate::services::schedule::Action;
use crate::utils::date::{months_around, YearMonth};

/// Months shown on either side of the current one in an overview.
pub const OVERVIEW_RANGE: u32 = 3;

/// Status of one (participant, lesson, month) cell. No record means unpaid.
pub fn payment_status(
    records: &[PaymentRecord],
    participant_id: Uuid,
    lesson_id: Uuid,
    month: YearMonth,
) -> PaymentStatus {
    records
        .iter()
        .find(|r| r.matches(participant_id, lesson_id, month))
        .map(|r| r.status)
        .unwrap_or_default()
}

/// Action flipping the current status of a cell.
pub fn toggle_payment(
    records: &[PaymentRecord],
    participant_id: Uuid,
    lesson_id: Uuid,
    month: YearMonth,
) -> Action {
    Action::SetPaymentStatus {
        participant_id,
        lesson_id,
        month,
        status: payment_status(records, participant_id, lesson_id, month).toggled(),
    }
}

/// Lessons the participant is enrolled in.
pub fn participant_lessons(state: &AppState, participant_id: Uuid) -> Vec<&Lesson> {
    state
        .lessons
        .iter()
        .filter(|l| l.has_participant(participant_id))
        .collect()
}

/// Enrolled lessons that are billed.
pub fn paid_lessons_for(state: &AppState, participant_id: Uuid) -> Vec<&Lesson> {
    participant_lessons(state, participant_id)
        .into_iter()
        .filter(|l| l.lesson_type == LessonType::Paid)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRow {
    pub lesson_id: Uuid,
    pub lesson_title: String,
    /// One entry per requested month, in order.
    pub cells: Vec<(YearMonth, PaymentStatus)>,
}

impl PaymentRow {
    pub fn paid_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|(_, status)| *status == PaymentStatus::Paid)
            .count()
    }
}

/// Payment grid for a participant: one row per billed lesson.
pub fn payment_overview(
    state: &AppState,
    participant_id: Uuid,
    months: &[YearMonth],
) -> Vec<PaymentRow> {
    paid_lessons_for(state, participant_id)
        .into_iter()
        .map(|lesson| PaymentRow {
            lesson_id: lesson.id,
            lesson_title: lesson.title.clone(),
            cells: months
                .iter()
                .map(|&month| {
                    (
                        month,
                        payment_status(&state.payment_records, participant_id, lesson.id, month),
                    )
                })
                .collect(),
        })
        .collect()
}

/// Overview over the standard window around `center`.
pub fn overview_around(state: &AppState, participant_id: Uuid, center: YearMonth) -> Vec<PaymentRow> {
    payment_overview(state, participant_id, &months_around(center, OVERVIEW_RANGE))
}
