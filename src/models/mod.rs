//! Database models and DTOs for the monitored entities.

pub mod client;
pub mod execution;
pub mod execution_log;
pub mod store_record;
