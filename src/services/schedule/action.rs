// Schedule actions
//
// The closed set of state transitions accepted by the mutation engine.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::lesson::{LessonDraft, LessonPatch};
use crate::models::participant::{ParticipantDraft, ParticipantPatch};
use crate::models::payment::PaymentStatus;
use crate::models::settings::SettingsPatch;
use crate::models::state::AppState;
use crate::utils::date::YearMonth;
use crate::utils::time::TimeOfDay;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddLesson(LessonDraft),
    UpdateLesson {
        id: Uuid,
        patch: LessonPatch,
    },
    DeleteLesson {
        id: Uuid,
    },
    CancelOccurrence {
        lesson_id: Uuid,
        date: NaiveDate,
        reason: Option<String>,
    },
    UncancelOccurrence {
        lesson_id: Uuid,
        date: NaiveDate,
    },
    RescheduleOccurrence {
        lesson_id: Uuid,
        original_date: NaiveDate,
        new_date: NaiveDate,
        new_start_time: TimeOfDay,
        new_duration: Option<u32>,
    },
    UnrescheduleOccurrence {
        lesson_id: Uuid,
        original_date: NaiveDate,
    },
    AddParticipant(ParticipantDraft),
    UpdateParticipant {
        id: Uuid,
        patch: ParticipantPatch,
    },
    DeleteParticipant {
        id: Uuid,
    },
    SetPaymentStatus {
        participant_id: Uuid,
        lesson_id: Uuid,
        month: YearMonth,
        status: PaymentStatus,
    },
    UpdateSettings(SettingsPatch),
    /// Initial load from persistence
    Hydrate(Box<AppState>),
    /// Wholesale replacement, e.g. after an import
    Replace(Box<AppState>),
}

impl Action {
    /// Get a human-readable description of the action
    pub fn describe(&self) -> String {
        match self {
            Action::AddLesson(draft) => format!("Add lesson \"{}\"", draft.title),
            Action::UpdateLesson { id, .. } => format!("Update lesson {}", id),
            Action::DeleteLesson { id } => format!("Delete lesson {}", id),
            Action::CancelOccurrence { lesson_id, date, .. } => {
                format!("Cancel lesson {} on {}", lesson_id, date)
            }
            Action::UncancelOccurrence { lesson_id, date } => {
                format!("Restore lesson {} on {}", lesson_id, date)
            }
            Action::RescheduleOccurrence {
                lesson_id,
                original_date,
                new_date,
                new_start_time,
                ..
            } => format!(
                "Move lesson {} from {} to {} {}",
                lesson_id, original_date, new_date, new_start_time
            ),
            Action::UnrescheduleOccurrence {
                lesson_id,
                original_date,
            } => format!("Undo move of lesson {} from {}", lesson_id, original_date),
            Action::AddParticipant(draft) => format!("Add participant \"{}\"", draft.name),
            Action::UpdateParticipant { id, .. } => format!("Update participant {}", id),
            Action::DeleteParticipant { id } => format!("Delete participant {}", id),
            Action::SetPaymentStatus {
                participant_id,
                lesson_id,
                month,
                status,
            } => format!(
                "Mark {} as {:?} for lesson {} ({})",
                participant_id, status, lesson_id, month
            ),
            Action::UpdateSettings(_) => "Update settings".to_string(),
            Action::Hydrate(_) => "Load state".to_string(),
            Action::Replace(_) => "Replace state".to_string(),
        }
    }
}
