//! HTTP handlers for the report service.

pub mod extract;
pub mod health;
pub mod report;

pub use extract::ReportJson;
pub use health::health_check;
pub use report::generate_report;
