// Lesson Calendar
// Command-line entry point: prints the week's lessons and sends due reminders

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use lesson_calendar::config::AppConfig;
use lesson_calendar::services::notification::NotificationService;
use lesson_calendar::services::occurrence::{resolve_week, Occurrence, OccurrenceKind};
use lesson_calendar::services::reminder::ReminderTracker;
use lesson_calendar::services::storage::StateStore;
use lesson_calendar::utils::date::{day_of_week, parse_date, week_dates};
use lesson_calendar::utils::time::TimeOfDay;

struct Args {
    config_path: Option<PathBuf>,
    date: Option<NaiveDate>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: None,
        date: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config_path = Some(PathBuf::from(path));
            }
            other if args.date.is_none() => {
                let date = parse_date(other)
                    .with_context(|| format!("Expected a date like 2025-01-13, got {}", other))?;
                args.date = Some(date);
            }
            other => bail!("Unexpected argument: {}", other),
        }
    }
    Ok(args)
}

fn describe(occurrence: &Occurrence) -> String {
    let mut line = format!(
        "  {}-{}  {}",
        occurrence.start_time,
        TimeOfDay::from_minutes(occurrence.end_minutes()),
        occurrence.lesson_title
    );
    match occurrence.kind {
        OccurrenceKind::Live => {}
        OccurrenceKind::RescheduledIn { original_date } => {
            line.push_str(&format!("  (moved from {})", original_date));
        }
        OccurrenceKind::RescheduledAway { rescheduled_to } => {
            line.push_str(&format!("  (moved to {})", rescheduled_to));
        }
    }
    line
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config_path = match args.config_path {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load(&config_path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    log::info!("Starting Lesson Calendar");

    let data_path = match &config.data_file {
        Some(path) => path.clone(),
        None => StateStore::default_path()?,
    };
    let state = StateStore::new(data_path).load();

    let now = Local::now().naive_local();
    let reference = args.date.unwrap_or(now.date());
    let occurrences = resolve_week(&state, reference);

    for date in week_dates(reference) {
        println!("{} {}", day_of_week(date).short_name(), date);
        for occurrence in occurrences.iter().filter(|o| o.date == date) {
            println!("{}", describe(occurrence));
        }
    }

    let notifier = NotificationService::new(state.settings.notifications_enabled);
    let mut tracker = ReminderTracker::new();
    for reminder in tracker.poll(&state, now) {
        println!("Reminder: {} - {}", reminder.summary(), reminder.body());
        if let Err(err) = notifier.show_reminder(&reminder) {
            log::warn!("{:#}", err);
        }
    }

    Ok(())
}
