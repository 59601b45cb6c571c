// Test fixtures - reusable test data
// Provides consistent dates and lessons across integration tests

#![allow(dead_code)]

use chrono::NaiveDate;

use lesson_calendar::models::lesson::Lesson;
use lesson_calendar::models::state::AppState;
use lesson_calendar::services::schedule::{apply, Action};
use lesson_calendar::utils::date::DayOfWeek;
use lesson_calendar::utils::time::TimeOfDay;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, Jan 13 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
    }

    /// Wednesday of the same week
    pub fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    /// Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }
}

/// State with one single-slot lesson per entry, added in order.
pub fn state_with_lessons(lessons: &[(&str, DayOfWeek, TimeOfDay, u32)]) -> AppState {
    lessons
        .iter()
        .fold(AppState::default(), |state, &(title, day, start, duration)| {
            let draft = Lesson::builder()
                .title(title)
                .slot(day, start, duration)
                .build()
                .expect("fixture lesson should be valid");
            apply(state, Action::AddLesson(draft))
        })
}

/// The lesson with `title`.
pub fn lesson<'a>(state: &'a AppState, title: &str) -> &'a Lesson {
    state
        .lessons
        .iter()
        .find(|l| l.title == title)
        .expect("fixture lesson should exist")
}
