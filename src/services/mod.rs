//! Business logic services.

pub mod daily;
pub mod dashboard;
pub mod delay;
pub mod history;
pub mod loader;
pub mod stores;
