// Integration tests for the data file store
// Covers save/load, backup recovery, import of older documents and the drag flow after reload

mod fixtures;

use std::fs;

use fixtures::{dates, lesson, state_with_lessons};
use lesson_calendar::models::state::AppState;
use lesson_calendar::services::drag::{DragConfig, DragSession, GridGeometry, Point};
use lesson_calendar::services::occurrence::resolve_week;
use lesson_calendar::services::schedule::{apply, Action};
use lesson_calendar::services::storage::{checksum_of, import_data, StateStore, StorageError};
use lesson_calendar::utils::date::{week_dates, DayOfWeek};
use lesson_calendar::utils::time::TimeOfDay;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_state_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("lessons.json"));

    let state = state_with_lessons(&[("A", DayOfWeek::Monday, TimeOfDay::new(10, 0), 60)]);
    let id = lesson(&state, "A").id;
    let state = apply(
        state,
        Action::CancelOccurrence {
            lesson_id: id,
            date: dates::monday(),
            reason: Some("Sick".to_string()),
        },
    );

    store.save(&state).unwrap();
    let loaded = store.load_strict().unwrap();
    assert_eq!(loaded, state);
    assert!(resolve_week(&loaded, dates::monday()).is_empty());
}

#[test]
fn test_both_files_corrupt_gives_empty_state() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("lessons.json"));
    fs::write(store.path(), "garbage").unwrap();
    fs::write(store.backup_path(), "more garbage").unwrap();

    assert_eq!(store.load(), AppState::default());
}

#[test]
fn test_version_one_document_imports() {
    let data = json!({
        "lessons": [{
            "id": "6f1c1c3e-3d55-4c61-9a52-1f7d2b0c8a11",
            "title": "Piano",
            "dayOfWeek": 2,
            "startTime": {"hours": 16, "minutes": 30},
            "duration": 45,
            "type": "paid",
            "participantIds": [],
            "createdAt": "2024-09-01T10:00:00+00:00",
            "updatedAt": "2024-09-01T10:00:00+00:00"
        }],
        "participants": [],
        "paymentRecords": [],
        "cancelledOccurrences": [],
        "rescheduledOccurrences": [],
        "settings": {"calendarStartHour": 9}
    });
    let envelope = json!({
        "version": 1,
        "timestamp": "2024-09-01T10:00:00+00:00",
        "checksum": checksum_of(&data).unwrap(),
        "data": data,
    });

    let state = import_data(&envelope.to_string()).unwrap();
    assert_eq!(state.lessons.len(), 1);
    let slot = state.lessons[0].schedule[0];
    assert_eq!(slot.day_of_week, DayOfWeek::Wednesday);
    assert_eq!(slot.start_time, TimeOfDay::new(16, 30));
    assert_eq!(slot.duration, 45);
    assert_eq!(state.settings.calendar_start_hour, 9);
    assert_eq!(state.settings.calendar_end_hour, 22);
}

#[test]
fn test_unversioned_document_treated_as_version_one() {
    let data = json!({"lessons": []});
    let envelope = json!({"checksum": checksum_of(&data).unwrap(), "data": data});
    assert_eq!(import_data(&envelope.to_string()).unwrap(), AppState::default());
}

#[test]
fn test_bad_checksum_rejected() {
    let envelope = json!({"version": 2, "checksum": "0", "data": {"lessons": []}});
    assert!(matches!(
        import_data(&envelope.to_string()),
        Err(StorageError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_drag_after_reload() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("lessons.json"));
    store
        .save(&state_with_lessons(&[("A", DayOfWeek::Monday, TimeOfDay::new(10, 0), 60)]))
        .unwrap();

    let state = store.load();
    let occurrence = resolve_week(&state, dates::monday()).remove(0);
    let config = DragConfig::default();
    let mut drag = DragSession::new(config, GridGeometry::default());

    // Grid starts at 08:00, so 10:00 sits two hours down the column.
    let origin = Point::new(10.0, 2.0 * config.px_per_hour);
    assert!(drag.begin(&occurrence, week_dates(dates::monday()), origin, 8));
    drag.pointer_move(
        Point::new(2.0 * config.column_width + 10.0, 6.0 * config.px_per_hour),
        &state,
    );

    let state = drag.end().apply(state);
    store.save(&state).unwrap();

    let reloaded = store.load();
    assert_eq!(reloaded.rescheduled_occurrences.len(), 1);
    let moved = &reloaded.rescheduled_occurrences[0];
    assert_eq!(moved.new_date, dates::wednesday());
    assert_eq!(moved.new_start_time, TimeOfDay::new(14, 0));
}
