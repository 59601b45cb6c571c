// Service module exports
// Scheduling logic over the application state

pub mod conflict;
pub mod drag;
pub mod notification;
pub mod occurrence;
pub mod payment;
pub mod reminder;
pub mod schedule;
pub mod storage;
