//! Schedule mutation engine.
//! A pure `(state, action) -> state` transition with referential-integrity
//! cleanup. Unknown ids are no-ops; no transition fails.

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::models::overrides::{CancelledOccurrence, RescheduledOccurrence};
use crate::models::payment::{PaymentRecord, PaymentStatus};
use crate::models::state::AppState;

mod action;

pub use action::Action;

/// Apply `action` to `state`, stamping new rows with the current local time.
pub fn apply(state: AppState, action: Action) -> AppState {
    apply_at(state, action, Local::now())
}

/// Apply a sequence of actions in order.
pub fn apply_all<I>(state: AppState, actions: I) -> AppState
where
    I: IntoIterator<Item = Action>,
{
    actions.into_iter().fold(state, apply)
}

/// Same as [`apply`] with an explicit timestamp.
pub fn apply_at(mut state: AppState, action: Action, now: DateTime<Local>) -> AppState {
    log::debug!("Applying action: {}", action.describe());

    match action {
        Action::AddLesson(draft) => {
            state.lessons.push(draft.into_lesson(Uuid::new_v4(), now));
        }

        Action::UpdateLesson { id, patch } => {
            if let Some(lesson) = state.lessons.iter_mut().find(|l| l.id == id) {
                patch.apply_to(lesson);
                lesson.updated_at = now;
            }
        }

        Action::DeleteLesson { id } => {
            state.lessons.retain(|l| l.id != id);
            state.cancelled_occurrences.retain(|c| c.lesson_id != id);
            state.rescheduled_occurrences.retain(|r| r.lesson_id != id);
            state.payment_records.retain(|p| p.lesson_id != id);
        }

        Action::CancelOccurrence {
            lesson_id,
            date,
            reason,
        } => {
            // Upsert: at most one cancellation per (lesson, date)
            match state
                .cancelled_occurrences
                .iter_mut()
                .find(|c| c.matches(lesson_id, date))
            {
                Some(existing) => {
                    existing.reason = reason;
                    existing.cancelled_at = now;
                }
                None => state.cancelled_occurrences.push(CancelledOccurrence {
                    id: Uuid::new_v4(),
                    lesson_id,
                    date,
                    reason,
                    cancelled_at: now,
                }),
            }
        }

        Action::UncancelOccurrence { lesson_id, date } => {
            state
                .cancelled_occurrences
                .retain(|c| !c.matches(lesson_id, date));
        }

        Action::RescheduleOccurrence {
            lesson_id,
            original_date,
            new_date,
            new_start_time,
            new_duration,
        } => {
            // Upsert: at most one reschedule per (lesson, original date)
            match state
                .rescheduled_occurrences
                .iter_mut()
                .find(|r| r.matches(lesson_id, original_date))
            {
                Some(existing) => {
                    existing.new_date = new_date;
                    existing.new_start_time = new_start_time;
                    existing.new_duration = new_duration;
                    existing.rescheduled_at = now;
                }
                None => state.rescheduled_occurrences.push(RescheduledOccurrence {
                    id: Uuid::new_v4(),
                    lesson_id,
                    original_date,
                    new_date,
                    new_start_time,
                    new_duration,
                    rescheduled_at: now,
                }),
            }
        }

        Action::UnrescheduleOccurrence {
            lesson_id,
            original_date,
        } => {
            state
                .rescheduled_occurrences
                .retain(|r| !r.matches(lesson_id, original_date));
        }

        Action::AddParticipant(draft) => {
            state
                .participants
                .push(draft.into_participant(Uuid::new_v4(), now));
        }

        Action::UpdateParticipant { id, patch } => {
            if let Some(participant) = state.participants.iter_mut().find(|p| p.id == id) {
                patch.apply_to(participant);
            }
        }

        Action::DeleteParticipant { id } => {
            state.participants.retain(|p| p.id != id);
            for lesson in &mut state.lessons {
                lesson.participant_ids.retain(|pid| *pid != id);
            }
            state.payment_records.retain(|p| p.participant_id != id);
        }

        Action::SetPaymentStatus {
            participant_id,
            lesson_id,
            month,
            status,
        } => {
            let paid_at = (status == PaymentStatus::Paid).then_some(now);
            match state
                .payment_records
                .iter_mut()
                .find(|p| p.matches(participant_id, lesson_id, month))
            {
                Some(existing) => {
                    existing.status = status;
                    existing.paid_at = paid_at;
                }
                None => state.payment_records.push(PaymentRecord {
                    id: Uuid::new_v4(),
                    participant_id,
                    lesson_id,
                    month,
                    status,
                    paid_at,
                }),
            }
        }

        Action::UpdateSettings(patch) => {
            patch.apply_to(&mut state.settings);
        }

        Action::Hydrate(next) | Action::Replace(next) => {
            return *next;
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lesson::{Lesson, LessonDraft, LessonPatch};
    use crate::models::participant::ParticipantDraft;
    use crate::models::settings::SettingsPatch;
    use crate::utils::date::{DayOfWeek, YearMonth};
    use crate::utils::time::TimeOfDay;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
    }

    fn draft(title: &str) -> LessonDraft {
        Lesson::builder()
            .title(title)
            .slot(DayOfWeek::Monday, TimeOfDay::new(10, 0), 60)
            .build()
            .unwrap()
    }

    fn month() -> YearMonth {
        YearMonth::new(2025, 1).unwrap()
    }

    fn with_lesson(title: &str) -> (AppState, Uuid) {
        let state = apply(AppState::default(), Action::AddLesson(draft(title)));
        let id = state.lessons[0].id;
        (state, id)
    }

    #[test]
    fn test_add_lesson_assigns_identity_and_timestamps() {
        let now = Local::now();
        let state = apply_at(AppState::default(), Action::AddLesson(draft("Piano")), now);

        assert_eq!(state.lessons.len(), 1);
        assert!(!state.lessons[0].id.is_nil());
        assert_eq!(state.lessons[0].created_at, now);
        assert_eq!(state.lessons[0].updated_at, now);
    }

    #[test]
    fn test_update_lesson_stamps_updated_at() {
        let (state, id) = with_lesson("Piano");
        let created = state.lessons[0].created_at;
        let later = created + Duration::minutes(5);

        let state = apply_at(
            state,
            Action::UpdateLesson {
                id,
                patch: LessonPatch {
                    title: Some("Piano II".to_string()),
                    ..Default::default()
                },
            },
            later,
        );

        assert_eq!(state.lessons[0].title, "Piano II");
        assert_eq!(state.lessons[0].created_at, created);
        assert_eq!(state.lessons[0].updated_at, later);
    }

    #[test]
    fn test_update_unknown_lesson_is_noop() {
        let (state, _) = with_lesson("Piano");
        let before = state.clone();
        let state = apply(
            state,
            Action::UpdateLesson {
                id: Uuid::new_v4(),
                patch: LessonPatch {
                    title: Some("X".to_string()),
                    ..Default::default()
                },
            },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_lesson_cascades() {
        let (state, piano) = with_lesson("Piano");
        let state = apply(state, Action::AddLesson(draft("Violin")));
        let violin = state.lessons[1].id;
        let student = Uuid::new_v4();

        let state = apply_all(
            state,
            [
                Action::CancelOccurrence { lesson_id: piano, date: monday(), reason: None },
                Action::RescheduleOccurrence {
                    lesson_id: piano,
                    original_date: monday() + Duration::days(7),
                    new_date: monday() + Duration::days(8),
                    new_start_time: TimeOfDay::new(9, 0),
                    new_duration: None,
                },
                Action::SetPaymentStatus { participant_id: student, lesson_id: piano, month: month(), status: PaymentStatus::Paid },
                Action::SetPaymentStatus { participant_id: student, lesson_id: violin, month: month(), status: PaymentStatus::Paid },
                Action::CancelOccurrence { lesson_id: violin, date: monday(), reason: None },
            ],
        );

        let state = apply(state, Action::DeleteLesson { id: piano });

        assert_eq!(state.lessons.len(), 1);
        assert_eq!(state.lessons[0].id, violin);
        assert!(state.rescheduled_occurrences.is_empty());
        assert_eq!(state.cancelled_occurrences.len(), 1);
        assert_eq!(state.cancelled_occurrences[0].lesson_id, violin);
        assert_eq!(state.payment_records.len(), 1);
        assert_eq!(state.payment_records[0].lesson_id, violin);
    }

    #[test]
    fn test_cancel_is_upsert_by_key() {
        let (state, id) = with_lesson("Piano");
        let state = apply_all(
            state,
            [
                Action::CancelOccurrence { lesson_id: id, date: monday(), reason: None },
                Action::CancelOccurrence { lesson_id: id, date: monday(), reason: Some("sick".to_string()) },
            ],
        );

        assert_eq!(state.cancelled_occurrences.len(), 1);
        assert_eq!(state.cancelled_occurrences[0].reason.as_deref(), Some("sick"));
    }

    #[test]
    fn test_uncancel_removes_only_matching() {
        let (state, id) = with_lesson("Piano");
        let next_monday = monday() + Duration::days(7);
        let state = apply_all(
            state,
            [
                Action::CancelOccurrence { lesson_id: id, date: monday(), reason: None },
                Action::CancelOccurrence { lesson_id: id, date: next_monday, reason: None },
                Action::UncancelOccurrence { lesson_id: id, date: monday() },
            ],
        );

        assert_eq!(state.cancelled_occurrences.len(), 1);
        assert_eq!(state.cancelled_occurrences[0].date, next_monday);
    }

    #[test]
    fn test_reschedule_is_upsert_and_unreschedule_removes() {
        let (state, id) = with_lesson("Piano");
        let reschedule = |day: i64, hour: u8| Action::RescheduleOccurrence {
            lesson_id: id,
            original_date: monday(),
            new_date: monday() + Duration::days(day),
            new_start_time: TimeOfDay::new(hour, 0),
            new_duration: None,
        };

        let state = apply_all(state, [reschedule(1, 9), reschedule(2, 14)]);
        assert_eq!(state.rescheduled_occurrences.len(), 1);
        assert_eq!(state.rescheduled_occurrences[0].new_date, monday() + Duration::days(2));
        assert_eq!(state.rescheduled_occurrences[0].new_start_time, TimeOfDay::new(14, 0));

        let state = apply(state, Action::UnrescheduleOccurrence { lesson_id: id, original_date: monday() });
        assert!(state.rescheduled_occurrences.is_empty());
    }

    #[test]
    fn test_delete_participant_cascades() {
        let state = apply_all(
            AppState::default(),
            [
                Action::AddParticipant(ParticipantDraft::new("Anna").unwrap()),
                Action::AddParticipant(ParticipantDraft::new("Boris").unwrap()),
            ],
        );
        let anna = state.participants[0].id;
        let boris = state.participants[1].id;

        let mut group = draft("Group");
        group.participant_ids = vec![anna, boris];
        let mut solo = draft("Solo");
        solo.participant_ids = vec![boris];
        let state = apply_all(state, [Action::AddLesson(group), Action::AddLesson(solo)]);
        let group_id = state.lessons[0].id;
        let solo_id = state.lessons[1].id;

        let state = apply_all(
            state,
            [
                Action::SetPaymentStatus { participant_id: anna, lesson_id: group_id, month: month(), status: PaymentStatus::Paid },
                Action::SetPaymentStatus { participant_id: boris, lesson_id: solo_id, month: month(), status: PaymentStatus::Paid },
                Action::DeleteParticipant { id: anna },
            ],
        );

        assert_eq!(state.participants.len(), 1);
        assert_eq!(state.lessons[0].participant_ids, vec![boris]);
        assert_eq!(state.lessons[1].participant_ids, vec![boris]);
        assert_eq!(state.payment_records.len(), 1);
        assert_eq!(state.payment_records[0].participant_id, boris);
    }

    #[test]
    fn test_payment_upsert_updates_single_record() {
        let (state, lesson_id) = with_lesson("Piano");
        let student = Uuid::new_v4();
        let set = |status| Action::SetPaymentStatus {
            participant_id: student,
            lesson_id,
            month: month(),
            status,
        };

        let state = apply(state, set(PaymentStatus::Paid));
        assert_eq!(state.payment_records.len(), 1);
        let record_id = state.payment_records[0].id;
        assert!(state.payment_records[0].paid_at.is_some());

        let state = apply(state, set(PaymentStatus::Unpaid));
        assert_eq!(state.payment_records.len(), 1);
        assert_eq!(state.payment_records[0].id, record_id);
        assert_eq!(state.payment_records[0].status, PaymentStatus::Unpaid);
        assert!(state.payment_records[0].paid_at.is_none());
    }

    #[test]
    fn test_update_settings() {
        let state = apply(
            AppState::default(),
            Action::UpdateSettings(SettingsPatch {
                calendar_start_hour: Some(7),
                ..Default::default()
            }),
        );
        assert_eq!(state.settings.calendar_start_hour, 7);
    }

    #[test]
    fn test_replace_discards_previous_state() {
        let (state, _) = with_lesson("Piano");
        let state = apply(state, Action::Replace(Box::default()));
        assert!(state.is_empty());

        let (loaded, _) = with_lesson("Violin");
        let state = apply(state, Action::Hydrate(Box::new(loaded.clone())));
        assert_eq!(state, loaded);
    }
}
