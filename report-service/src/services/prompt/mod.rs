//! Daily report prompt construction.
//!
//! Turns a [`SessionInput`] into the system/user prompt pair sent to the
//! generation provider. Pure: the calendar date is passed in and nothing here
//! performs I/O.

pub mod greeting;
pub mod score;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::session::non_blank;
use crate::models::{PromptBundle, SessionInput};

pub use greeting::{Clock, FixedClock, KstClock};

/// Placeholder for optional free-text fields the caller left out.
const NOT_PROVIDED: &str = "미기재";
const NONE: &str = "없음";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("{0} 항목이 필요합니다")]
    MissingField(&'static str),
}

/// Shape of the prompt handed to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptLayout {
    /// Separate system instruction and user content.
    #[default]
    Split,
    /// One prompt string sent as a single user message.
    Combined,
}

/// Service-wide prompt settings.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub academy_name: String,
    pub academy_location: String,
    pub layout: PromptLayout,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            academy_name: "고수학".to_string(),
            academy_location: "경기도 광명시 철산동".to_string(),
            layout: PromptLayout::Split,
        }
    }
}

/// Build the prompt for one session.
///
/// Fails only when `name` or `className` is missing or blank.
pub fn build_prompt(
    input: &SessionInput,
    options: &PromptOptions,
    today: NaiveDate,
) -> Result<PromptBundle, PromptError> {
    let name = non_blank(&input.name).ok_or(PromptError::MissingField("name"))?;
    let class_name = non_blank(&input.class_name).ok_or(PromptError::MissingField("className"))?;

    let date = greeting::date_text(input, today);
    let academy = format!("{} 학원", options.academy_name);
    let greeting = greeting::greeting(input, &academy, &date);

    let score = input.score.as_ref().and_then(|s| s.value());
    let base = input.base.as_ref().and_then(|b| b.value());
    let weak_line = input
        .weak_score
        .as_ref()
        .and_then(|w| w.value())
        .map(score::weak_score_line);

    let (score_line, not_taken_line) = match score {
        Some(score) => (score::score_line(score, base, input.score_format()), None),
        None => {
            let reason = score::not_taken_reason(input);
            (score::NOT_TAKEN.to_string(), Some(score::not_taken_line(&reason)))
        }
    };

    let notice_line = non_blank(&input.notice).map(|notice| {
        format!(
            "※ 공지: {}",
            notice.split_whitespace().collect::<Vec<_>>().join(" ")
        )
    });

    let sections = Sections {
        greeting: &greeting,
        score_line: &score_line,
        not_taken_line: not_taken_line.as_deref(),
        weak_line: weak_line.as_deref(),
        notice_line: notice_line.as_deref(),
    };

    let system = system_instruction(input, options, &sections);
    let user = user_content(input, name, class_name, &date, &sections);

    let (system, user) = match options.layout {
        PromptLayout::Split => (Some(system), user),
        PromptLayout::Combined => (None, format!("{}\n\n{}", system, user)),
    };

    Ok(PromptBundle {
        system,
        user,
        test_taken: score.is_some(),
        greeting,
        score_line,
        not_taken_line,
    })
}

struct Sections<'a> {
    greeting: &'a str,
    score_line: &'a str,
    not_taken_line: Option<&'a str>,
    weak_line: Option<&'a str>,
    notice_line: Option<&'a str>,
}

fn system_instruction(input: &SessionInput, options: &PromptOptions, s: &Sections<'_>) -> String {
    let guide = input.length_mode().sentence_guide();

    let mut lines = vec![
        format!(
            "당신은 {}의 수학 전문 학원 '{}' 데일리 리포트 전용 AI입니다.",
            options.academy_location, options.academy_name
        ),
        "아래 정보를 바탕으로 **간결하고 핵심만 요약한 리포트**를 작성해 주세요.".to_string(),
        String::new(),
        "[작성 규칙]".to_string(),
        "- 인사말은 반드시 아래 문장으로 시작:".to_string(),
        s.greeting.to_string(),
        "- 각 항목은 한두 줄로만 간결하게 작성".to_string(),
        "- 불필요한 장황한 설명은 제거".to_string(),
        format!("- 수업리뷰는 {} 분량으로 핵심만 작성", guide),
        "- 학생의 태도나 출결, 과제 상태는 간단히 명시".to_string(),
        "- 진도에서 한 가지 개념을 구체적으로 언급".to_string(),
    ];
    match s.not_taken_line {
        Some(line) => {
            lines.push("- 테스트 항목에는 아래 문장을 그대로 사용:".to_string());
            lines.push(line.to_string());
        }
        None => {
            lines.push("- 테스트 점수는 아래 표기를 그대로 사용:".to_string());
            lines.push(s.score_line.to_string());
        }
    }
    if let Some(line) = s.weak_line {
        lines.push(
            "- 취약유사 점수는 테스트 점수와 합치지 말고 별도의 줄에 아래 표기 그대로 작성:"
                .to_string(),
        );
        lines.push(line.to_string());
    }
    if let Some(line) = s.notice_line {
        lines.push("- 리포트 마지막에 아래 공지를 한 줄로 덧붙임:".to_string());
        lines.push(line.to_string());
    }

    lines.extend(
        [
            "",
            "[리포트 포맷]",
            "안녕하세요. (선생님 이름 유무에 맞는 인사말)",
            "",
            "출결: ○○",
            "태도: ○○",
            "과제: ○○",
            "",
            "진도: (한 줄)",
            "과제: (한 줄)",
            "테스트: (테스트 종류와 점수 요약)",
        ]
        .map(str::to_string),
    );
    if s.weak_line.is_some() {
        lines.push("취약유사: (점수)".to_string());
    }
    lines.push(String::new());
    lines.push(format!("수업리뷰: ({} 분량으로 간단히 작성)", guide));
    if s.notice_line.is_some() {
        lines.push("※ 공지: (공지 내용)".to_string());
    }

    lines.join("\n")
}

fn user_content(
    input: &SessionInput,
    name: &str,
    class_name: &str,
    date: &str,
    s: &Sections<'_>,
) -> String {
    let mut lines = vec![
        "[입력 데이터]".to_string(),
        format!("날짜: {}", date),
        format!("학생: {}", name),
    ];
    if input.include_class() {
        lines.push(format!("반: {}", class_name));
    }
    if input.include_teacher() {
        if let Some(teacher) = non_blank(&input.teacher_name) {
            lines.push(format!("담당 선생님: {}", teacher));
        }
    }
    lines.extend([
        format!("출결: {}", input.attendance()),
        format!("태도: {}", input.attitude()),
        format!("과제: {}", input.homework_status()),
        format!("수업 진도: {}", non_blank(&input.progress).unwrap_or(NOT_PROVIDED)),
        format!("과제 내용: {}", non_blank(&input.homework).unwrap_or(NOT_PROVIDED)),
        format!("테스트 범위: {}", non_blank(&input.test_range).unwrap_or(NOT_PROVIDED)),
        format!(
            "데일리 테스트 점수: {}",
            s.not_taken_line.unwrap_or(s.score_line)
        ),
        format!(
            "취약유사 점수: {}",
            s.weak_line
                .map(|line| line.trim_start_matches("취약유사: "))
                .unwrap_or(NONE)
        ),
        format!("추가 요구조건: {}", non_blank(&input.extra_request).unwrap_or(NONE)),
    ]);
    if let Some(line) = s.notice_line {
        lines.push(line.to_string());
    }

    lines.join("\n")
}
