//! Keyword-matched checklist templates.
//!
//! # Responsibility
//! - Map a task title to an ordered list of canned step texts.
//!
//! # Invariants
//! - Pure lookup: no I/O, no state, same title always yields same steps.
//! - Rules are checked in table order; the first rule with any matching
//!   keyword wins.
//! - ASCII keywords match whole words only; Hangul keywords match anywhere,
//!   since particles attach directly to the noun.
//! - A title matching no rule yields `FALLBACK_STEPS`.

struct TemplateRule {
    keywords: &'static [&'static str],
    steps: &'static [&'static str],
}

const TEMPLATE_RULES: &[TemplateRule] = &[
    TemplateRule {
        keywords: &["공부", "study", "영어", "시험"],
        steps: &["공부 범위 정하기", "25분 집중해서 학습하기", "배운 내용 복습하기"],
    },
    TemplateRule {
        keywords: &["운동", "헬스", "러닝", "workout", "run", "running"],
        steps: &["운동복 챙기기", "10분 스트레칭", "본 운동 30분", "기록 남기기"],
    },
    TemplateRule {
        keywords: &["청소", "정리", "clean"],
        steps: &["정리할 구역 고르기", "버릴 것 분리하기", "닦고 마무리하기"],
    },
    TemplateRule {
        keywords: &["여행", "trip", "travel"],
        steps: &["일정과 예산 정하기", "교통편 예약하기", "숙소 예약하기", "짐 목록 만들기"],
    },
    TemplateRule {
        keywords: &["장보기", "구매", "사기", "shopping", "buy"],
        steps: &["필요한 물건 목록 쓰기", "가격 비교하기", "구매하기"],
    },
    TemplateRule {
        keywords: &["책", "독서", "read", "reading"],
        steps: &["읽을 분량 정하기", "읽기", "한 줄 요약 남기기"],
    },
];

/// Steps used when no keyword rule matches.
pub const FALLBACK_STEPS: [&str; 3] = ["목표 구체화하기", "첫 행동 정하기", "완료 기준 정하기"];

/// Returns the template steps for `title`.
///
/// Matching is case-insensitive on the trimmed title.
pub fn suggest_steps(title: &str) -> Vec<&'static str> {
    let normalized = title.trim().to_lowercase();
    let words: Vec<&str> = normalized
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    TEMPLATE_RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| keyword_matches(keyword, &normalized, &words))
        })
        .map(|rule| rule.steps.to_vec())
        .unwrap_or_else(|| FALLBACK_STEPS.to_vec())
}

fn keyword_matches(keyword: &str, normalized: &str, words: &[&str]) -> bool {
    if keyword.is_ascii() {
        words.contains(&keyword)
    } else {
        normalized.contains(keyword)
    }
}
