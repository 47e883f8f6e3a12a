pub mod alert_report;
pub mod fleet_service;
pub mod snapshot;
pub mod summary;
pub mod types;
