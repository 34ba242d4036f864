//! Test score normalization and the score-related report lines.

use crate::models::{ScoreFormat, SessionInput};
use crate::models::session::non_blank;

/// Reason used when the test was skipped because the student was absent.
pub const ABSENT_REASON: &str = "결석";
/// Reason used when nothing explains why the test was skipped.
pub const UNSPECIFIED_REASON: &str = "사유 미기재";
/// Score line for a test that was not taken.
pub const NOT_TAKEN: &str = "미응시";

/// Denominator if it is usable for rescaling.
fn usable_base(base: Option<f64>) -> Option<f64> {
    base.filter(|b| b.is_finite() && *b > 0.0)
}

/// Rescale `score` to 0..=100.
///
/// With a positive finite `base` the score is `score / base * 100`, otherwise
/// it is taken as already on a 100-point scale. Rounds half away from zero,
/// then clamps.
pub fn normalize_score(score: f64, base: Option<f64>) -> u8 {
    let scaled = match usable_base(base) {
        Some(base) => score / base * 100.0,
        None => score,
    };
    if scaled.is_nan() {
        return 0;
    }
    scaled.round().clamp(0.0, 100.0) as u8
}

/// Render the primary score in the requested format.
pub fn score_line(score: f64, base: Option<f64>, format: ScoreFormat) -> String {
    let normalized = normalize_score(score, base);
    match (format, usable_base(base)) {
        (ScoreFormat::Normalized, Some(_)) => format!("{}점 (100점 만점 기준)", normalized),
        (ScoreFormat::Raw, Some(base)) => format!("{}/{}점", score, base),
        (ScoreFormat::Raw, None) => format!("{}점", score),
        (ScoreFormat::Both, Some(base)) => {
            format!("{}/{}점 → {}점 (100점 만점 기준)", score, base, normalized)
        }
        (ScoreFormat::Normalized | ScoreFormat::Both, None) => format!("{}점", normalized),
    }
}

/// Secondary "취약유사" score, always on its own line.
pub fn weak_score_line(weak_score: f64) -> String {
    format!("취약유사: {}점", weak_score)
}

/// Why the test was skipped: explicit `testReason`, else derived from attendance.
pub fn not_taken_reason(input: &SessionInput) -> String {
    if let Some(reason) = non_blank(&input.test_reason) {
        return reason.to_string();
    }
    if input.attendance().contains(ABSENT_REASON) {
        ABSENT_REASON.to_string()
    } else {
        UNSPECIFIED_REASON.to_string()
    }
}

pub fn not_taken_line(reason: &str) -> String {
    format!("※ 테스트 미응시: {}", reason)
}
