// Payment module
// Monthly payment status per participant and lesson

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::date::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Paid => PaymentStatus::Unpaid,
            PaymentStatus::Unpaid => PaymentStatus::Paid,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

/// At most one record exists per (participant, lesson, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub lesson_id: Uuid,
    pub month: YearMonth,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Local>>,
}

impl PaymentRecord {
    pub fn matches(&self, participant_id: Uuid, lesson_id: Uuid, month: YearMonth) -> bool {
        self.participant_id == participant_id && self.lesson_id == lesson_id && self.month == month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(PaymentStatus::Paid.toggled(), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::Unpaid.toggled(), PaymentStatus::Paid);
    }

    #[test]
    fn test_month_serializes_as_string() {
        let record = PaymentRecord {
            id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            month: "2025-02".parse().unwrap(),
            status: PaymentStatus::Unpaid,
            paid_at: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["month"], "2025-02");
        assert_eq!(value["status"], "unpaid");
    }
}
