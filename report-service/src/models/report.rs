//! Builder output and the response body returned to callers.

use serde::{Deserialize, Serialize};

/// Prompt text produced for one session, plus the derived lines the
/// generator is told to reproduce verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBundle {
    /// System instruction. `None` when the service runs the combined layout.
    pub system: Option<String>,
    /// User content, or the whole prompt in the combined layout.
    pub user: String,
    /// True iff a numeric score was supplied.
    pub test_taken: bool,
    pub greeting: String,
    /// Rendered primary score, `미응시` when the test was not taken.
    pub score_line: String,
    /// `※ 테스트 미응시: …` when the test was not taken.
    pub not_taken_line: Option<String>,
}

/// JSON body of every `/generate` response, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
    /// Machine-readable error kind; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportResponse {
    pub fn success(report: String) -> Self {
        Self {
            report,
            error: None,
        }
    }
}
