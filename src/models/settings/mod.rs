// Settings module
// Calendar display window and reminder preferences

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// First hour shown on the time grid
    pub calendar_start_hour: u8,
    /// Hour at which the time grid ends
    pub calendar_end_hour: u8,
    pub notifications_enabled: bool,
    /// Reminder lead time in minutes
    pub notification_minutes_before: u32,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calendar_start_hour: 8,
            calendar_end_hour: 22,
            notifications_enabled: false,
            notification_minutes_before: 15,
            theme: Theme::Light,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.calendar_end_hour > 24 {
            return Err("Calendar end hour must be at most 24".to_string());
        }
        if self.calendar_start_hour >= self.calendar_end_hour {
            return Err("Calendar start hour must be before end hour".to_string());
        }
        if self.notification_minutes_before == 0 {
            return Err("Reminder lead time must be positive".to_string());
        }
        Ok(())
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub calendar_start_hour: Option<u8>,
    pub calendar_end_hour: Option<u8>,
    pub notifications_enabled: Option<bool>,
    pub notification_minutes_before: Option<u32>,
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(hour) = self.calendar_start_hour {
            settings.calendar_start_hour = hour;
        }
        if let Some(hour) = self.calendar_end_hour {
            settings.calendar_end_hour = hour;
        }
        if let Some(enabled) = self.notifications_enabled {
            settings.notifications_enabled = enabled;
        }
        if let Some(minutes) = self.notification_minutes_before {
            settings.notification_minutes_before = minutes;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
    }
}
