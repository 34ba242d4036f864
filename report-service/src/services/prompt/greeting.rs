//! Report date and opening greeting.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::models::SessionInput;
use crate::models::session::non_blank;

/// Reports are dated in Korea Standard Time (UTC+9) regardless of host zone.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Source of "today" for reports that do not carry a `dateStr`.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Current date in Asia/Seoul.
#[derive(Debug, Clone, Copy, Default)]
pub struct KstClock;

impl Clock for KstClock {
    fn today(&self) -> NaiveDate {
        kst_date(Utc::now())
    }
}

/// Calendar date in Korea at the instant `now`.
pub fn kst_date(now: DateTime<Utc>) -> NaiveDate {
    match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => now.with_timezone(&kst).date_naive(),
        None => now.date_naive(),
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// `dateStr` when supplied, otherwise `MM월 DD일`.
pub fn date_text(input: &SessionInput, today: NaiveDate) -> String {
    match non_blank(&input.date_str) {
        Some(date) => date.to_string(),
        None => today.format("%m월 %d일").to_string(),
    }
}

/// Opening sentence of the report.
///
/// Names the teacher only when `teacherName` is non-blank and
/// `includeTeacher` is not switched off.
pub fn greeting(input: &SessionInput, academy: &str, date: &str) -> String {
    let name = non_blank(&input.name).unwrap_or_default();
    let class = match (input.include_class(), non_blank(&input.class_name)) {
        (true, Some(class)) => format!("{}반 ", class),
        _ => String::new(),
    };

    match non_blank(&input.teacher_name).filter(|_| input.include_teacher()) {
        Some(teacher) => format!(
            "안녕하세요. {}{}학생을 지도하고 있는 {} {} 선생님 입니다. {} 데일리 리포트 입니다.",
            class, name, academy, teacher, date
        ),
        None => format!(
            "안녕하세요. {} 입니다. {}{}학생의 {} 데일리 리포트 입니다.",
            academy, class, name, date
        ),
    }
}
