// Module exports for models

pub mod lesson;
pub mod overrides;
pub mod participant;
pub mod payment;
pub mod settings;
pub mod state;
