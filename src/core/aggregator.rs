use crate::domain::model::{GpaResult, SubjectRecord};
use crate::utils::error::{GpaError, Result};

/// 學分加權平均。只有成績存在且學分大於 0 的科目會計入。
///
/// 單科學分是 u32，總學分以 u64 累加，不會溢位。
///
/// `scope` 只用在錯誤訊息中（例如 "the whole program"、"semester 'Fall 2022'"）。
pub fn aggregate(records: &[SubjectRecord], scope: &str) -> Result<GpaResult> {
    let mut weighted_sum = 0.0;
    let mut total_credits: u64 = 0;
    let mut counted = 0;

    for record in records {
        let Some(grade) = record.grade else {
            continue;
        };
        if record.credits == 0 {
            continue;
        }
        weighted_sum += grade * f64::from(record.credits);
        total_credits += u64::from(record.credits);
        counted += 1;
    }

    if total_credits == 0 {
        return Err(GpaError::NoGradableSubjects {
            scope: scope.to_string(),
            row_errors: Vec::new(),
        });
    }

    let result = GpaResult::new(weighted_sum, total_credits, counted);
    tracing::debug!(
        "Aggregated {} subjects: {:.4} grade points over {} credits",
        counted,
        weighted_sum,
        total_credits
    );
    Ok(result)
}
