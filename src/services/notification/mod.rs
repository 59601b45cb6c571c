use anyhow::Result;
use notify_rust::{Notification, Timeout};

use crate::services::reminder::Reminder;

/// Reminders starting this close are shown longer.
const URGENT_MINUTES: u32 = 5;

/// Service for displaying desktop notifications
pub struct NotificationService {
    enabled: bool,
}

impl NotificationService {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Show a lesson reminder
    pub fn show_reminder(&self, reminder: &Reminder) -> Result<()> {
        let urgency = NotificationUrgency::for_minutes(reminder.minutes_until);
        self.show(&reminder.summary(), &reminder.body(), urgency)
    }

    /// Show a notification with a title and body
    pub fn show(&self, title: &str, body: &str, urgency: NotificationUrgency) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        Notification::new()
            .summary(title)
            .body(body)
            .timeout(urgency.timeout())
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        log::debug!("Notification shown: {}", title);
        Ok(())
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Notification urgency level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationUrgency {
    Normal,
    Critical,
}

impl NotificationUrgency {
    pub fn for_minutes(minutes_until: u32) -> Self {
        if minutes_until <= URGENT_MINUTES {
            NotificationUrgency::Critical
        } else {
            NotificationUrgency::Normal
        }
    }

    fn timeout(self) -> Timeout {
        match self {
            NotificationUrgency::Normal => Timeout::Milliseconds(5000),
            NotificationUrgency::Critical => Timeout::Milliseconds(10000),
        }
    }
}
