pub mod gateway;
pub mod prompt;
pub mod providers;

pub use gateway::{GenerationResult, ReportGateway};
