//! Domain models for the report service.

pub mod report;
pub mod session;

pub use report::{PromptBundle, ReportResponse};
pub use session::{LengthMode, NumericField, ScoreFormat, SessionInput};
