// Lesson Calendar Library
// Weekly lesson scheduling: recurrence, overrides, conflicts and drag repositioning

pub mod config;
pub mod models;
pub mod services;
pub mod utils;
