use crate::core::aggregator::aggregate;
use crate::core::exemption::ExemptionSet;
use crate::core::record_parser::RecordParser;
use crate::core::semester::select_semester;
use crate::domain::model::{CalculationRequest, Cell, GpaResult, SubjectRecord};
use crate::utils::error::{GpaError, MalformedRowError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Exempt,
    Ungraded,
    NoCredits,
}

/// 在選定範圍內但沒有計入平均的科目，保留給使用者檢視
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedSubject {
    pub row: usize,
    pub subject_code: String,
    pub semester_label: String,
    pub reason: ExclusionReason,
}

impl ExcludedSubject {
    fn new(record: &SubjectRecord, reason: ExclusionReason) -> Self {
        Self {
            row: record.row,
            subject_code: record.subject_code.clone(),
            semester_label: record.semester_label.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalculationOutcome {
    pub result: GpaResult,
    /// 解析時收集的錯誤列；有結果時只是警告
    pub warnings: Vec<MalformedRowError>,
    pub excluded: Vec<ExcludedSubject>,
}

/// parse -> select -> filter -> aggregate
pub struct CalculationPipeline<'a> {
    parser: RecordParser,
    exemptions: &'a ExemptionSet,
}

impl<'a> CalculationPipeline<'a> {
    pub fn new(parser: RecordParser, exemptions: &'a ExemptionSet) -> Self {
        Self { parser, exemptions }
    }

    pub fn run(&self, rows: &[Vec<Cell>], request: &CalculationRequest) -> Result<CalculationOutcome> {
        // Parse
        let parsed = self.parser.parse_all(rows);
        if parsed.records.is_empty() && !parsed.errors.is_empty() {
            return Err(GpaError::AllRowsMalformed {
                errors: parsed.errors,
            });
        }
        tracing::info!(
            "📄 Parsed {} subjects ({} malformed rows)",
            parsed.records.len(),
            parsed.errors.len()
        );

        // Select
        let (scoped, scope) = match request {
            CalculationRequest::Overall => (parsed.records, "the whole program".to_string()),
            CalculationRequest::Semester { label } => match select_semester(&parsed.records, label) {
                Ok(selected) => (selected, format!("semester '{}'", label.trim())),
                Err(e) => return Err(e.with_row_errors(parsed.errors)),
            },
        };

        // Filter
        let (counted, excluded) = self.filter(scoped);
        tracing::info!(
            "🔎 {} subjects in {}, {} excluded",
            counted.len() + excluded.len(),
            scope,
            excluded.len()
        );

        // Aggregate；失敗時一併回報錯誤列
        let result = match aggregate(&counted, &scope) {
            Ok(result) => result,
            Err(e) => return Err(e.with_row_errors(parsed.errors)),
        };

        Ok(CalculationOutcome {
            result,
            warnings: parsed.errors,
            excluded,
        })
    }

    fn filter(&self, records: Vec<SubjectRecord>) -> (Vec<SubjectRecord>, Vec<ExcludedSubject>) {
        let mut counted = Vec::new();
        let mut excluded = Vec::new();

        for record in records {
            if self.exemptions.is_exempt(&record) {
                excluded.push(ExcludedSubject::new(&record, ExclusionReason::Exempt));
            } else if record.grade.is_none() {
                excluded.push(ExcludedSubject::new(&record, ExclusionReason::Ungraded));
            } else if record.credits == 0 {
                excluded.push(ExcludedSubject::new(&record, ExclusionReason::NoCredits));
            } else {
                counted.push(record);
            }
        }
        (counted, excluded)
    }
}
