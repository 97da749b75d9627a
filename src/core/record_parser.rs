use crate::domain::model::{Cell, ColumnLayout, GradeScale, SubjectRecord};
use crate::utils::error::{MalformedRowError, RowField};
use regex::Regex;
use std::sync::OnceLock;

/// 科目代碼：2-4 個字母 + 2-4 個數字，可帶字尾（例如 PRF192、SWE201C）
fn subject_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{2,4}[0-9]{2,4}[A-Z0-9]*$").unwrap())
}

/// 整份成績單的解析結果：可用的科目與被收集的錯誤列
#[derive(Debug, Clone, Default)]
pub struct ParsedTranscript {
    pub records: Vec<SubjectRecord>,
    pub errors: Vec<MalformedRowError>,
}

#[derive(Debug, Clone)]
pub struct RecordParser {
    layout: ColumnLayout,
    scale: GradeScale,
}

impl RecordParser {
    pub fn new(layout: ColumnLayout, scale: GradeScale) -> Self {
        Self { layout, scale }
    }

    /// 解析所有列，錯誤列收集後繼續處理下一列
    pub fn parse_all(&self, rows: &[Vec<Cell>]) -> ParsedTranscript {
        let mut parsed = ParsedTranscript::default();

        for (index, row) in rows.iter().enumerate() {
            match self.parse_row(index, row) {
                Ok(Some(record)) => parsed.records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("⚠️ Skipping malformed {}", e);
                    parsed.errors.push(e);
                }
            }
        }

        tracing::debug!(
            "Parsed {} subject records, {} malformed rows, from {} rows",
            parsed.records.len(),
            parsed.errors.len(),
            rows.len()
        );
        parsed
    }

    /// 解析單列。表頭、表尾及空白列（沒有合法科目代碼）回傳 `Ok(None)`。
    ///
    /// `index` 是列在輸入中的位置（從 0 起算），錯誤訊息中轉成從 1 起算的列號。
    pub fn parse_row(
        &self,
        index: usize,
        row: &[Cell],
    ) -> Result<Option<SubjectRecord>, MalformedRowError> {
        let row_number = index + 1;

        let subject_code = match self.subject_code(row) {
            Some(code) => code,
            None => {
                tracing::debug!("Row {} has no subject code, treated as header/footer", row_number);
                return Ok(None);
            }
        };

        let credits_cell = cell_at(row, self.layout.credits);
        let credits = coerce_credits(credits_cell).map_err(|reason| MalformedRowError {
            row: row_number,
            field: RowField::Credits,
            value: credits_cell.to_string(),
            reason,
        })?;

        let grade_cell = cell_at(row, self.layout.grade);
        let grade = coerce_grade(grade_cell, self.scale).map_err(|reason| MalformedRowError {
            row: row_number,
            field: RowField::Grade,
            value: grade_cell.to_string(),
            reason,
        })?;

        Ok(Some(SubjectRecord {
            row: row_number,
            subject_code,
            semester_label: cell_at(row, self.layout.semester).to_string(),
            credits,
            grade,
        }))
    }

    fn subject_code(&self, row: &[Cell]) -> Option<String> {
        match cell_at(row, self.layout.subject_code) {
            Cell::Text(raw) => {
                let code = raw.trim().to_uppercase();
                subject_code_pattern().is_match(&code).then_some(code)
            }
            _ => None,
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

fn cell_at(row: &[Cell], column: usize) -> &Cell {
    row.get(column).unwrap_or(&EMPTY_CELL)
}

/// 文字轉數字，接受逗號小數點（例如 "7,5"）
fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce_credits(cell: &Cell) -> Result<u32, String> {
    let value = match cell {
        Cell::Empty => return Err("credits are required".to_string()),
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) => return Err("not a number".to_string()),
        Cell::Text(text) => match parse_number(text) {
            Some(n) => n,
            None if text.trim().is_empty() => return Err("credits are required".to_string()),
            None => return Err("not a number".to_string()),
        },
    };

    if value < 0.0 {
        return Err("credits cannot be negative".to_string());
    }
    if value.fract() != 0.0 {
        return Err("credits must be a whole number".to_string());
    }
    if value > f64::from(u32::MAX) {
        return Err("credits value is too large".to_string());
    }
    Ok(value as u32)
}

/// 空白或非數字的佔位字（如 "N/A"）視為沒有成績；超出量表範圍才算錯誤
fn coerce_grade(cell: &Cell, scale: GradeScale) -> Result<Option<f64>, String> {
    let value = match cell {
        Cell::Empty => return Ok(None),
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) => return Ok(None),
        Cell::Text(text) => match parse_number(text) {
            Some(n) => n,
            None => return Ok(None),
        },
    };

    if value < 0.0 || value > scale.max() {
        return Err(format!("outside the {} grade scale", scale));
    }
    Ok(Some(value))
}
