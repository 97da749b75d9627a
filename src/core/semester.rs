use crate::domain::model::{Season, SubjectRecord, Term};
use crate::utils::error::{GpaError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn term_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(SPRING|SUMMER|FALL|SP|SU|FA)([0-9]{4}|[0-9]{2})$").unwrap()
    })
}

/// 去掉空白與分隔符並轉大寫，例如 " Fall-2022 " -> "FALL2022"
fn compact(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}

/// 把學期標籤拆成（季節, 年份末兩位）。
///
/// 接受全名或兩字母縮寫，年份可為兩位或四位："Fall 2022"、"Fall2022"、"FA22"
/// 都得到同一個 `Term`。無法辨識時回傳 None。
pub fn parse_term(label: &str) -> Option<Term> {
    let compacted = compact(label);
    let caps = term_pattern().captures(&compacted)?;

    let season = match &caps[1] {
        "SPRING" | "SP" => Season::Spring,
        "SUMMER" | "SU" => Season::Summer,
        "FALL" | "FA" => Season::Fall,
        _ => return None,
    };
    let digits = &caps[2];
    let year: u8 = digits[digits.len() - 2..].parse().ok()?;

    Some(Term { season, year })
}

/// 比對用的學期鍵；無法拆解的標籤退回以正規化字串比較
#[derive(Debug, Clone, PartialEq, Eq)]
enum SemesterKey {
    Term(Term),
    Literal(String),
}

impl SemesterKey {
    fn of(label: &str) -> Self {
        match parse_term(label) {
            Some(term) => SemesterKey::Term(term),
            None => SemesterKey::Literal(compact(label)),
        }
    }

    fn display(&self, raw: &str) -> String {
        match self {
            SemesterKey::Term(term) => term.to_string(),
            SemesterKey::Literal(_) => raw.trim().to_string(),
        }
    }
}

/// 取出屬於指定學期的科目；沒有任何科目符合時回傳 `UnknownSemester`
pub fn select_semester(records: &[SubjectRecord], requested: &str) -> Result<Vec<SubjectRecord>> {
    let key = SemesterKey::of(requested);

    let selected: Vec<SubjectRecord> = match &key {
        SemesterKey::Literal(literal) if literal.is_empty() => Vec::new(),
        _ => records
            .iter()
            .filter(|r| SemesterKey::of(&r.semester_label) == key)
            .cloned()
            .collect(),
    };

    if selected.is_empty() {
        return Err(GpaError::UnknownSemester {
            requested: requested.trim().to_string(),
            available: available_semesters(records),
            row_errors: Vec::new(),
        });
    }

    tracing::debug!(
        "Selected {} of {} records for semester '{}'",
        selected.len(),
        records.len(),
        key.display(requested)
    );
    Ok(selected)
}

/// 成績單中出現過的學期（依首次出現順序，去重）
pub fn available_semesters(records: &[SubjectRecord]) -> Vec<String> {
    let mut seen: Vec<SemesterKey> = Vec::new();
    let mut labels = Vec::new();

    for record in records {
        if record.semester_label.trim().is_empty() {
            continue;
        }
        let key = SemesterKey::of(&record.semester_label);
        if !seen.contains(&key) {
            labels.push(key.display(&record.semester_label));
            seen.push(key);
        }
    }
    labels
}
