use crate::core::pipeline::{CalculationOutcome, ExcludedSubject};
use crate::core::session::GpaSession;
use crate::domain::model::{CalculationRequest, GradeScale, Mode};
use crate::utils::error::{MalformedRowError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GpaReport {
    pub mode: Mode,
    pub semester: Option<String>,
    pub scale: GradeScale,
    pub gpa: f64,
    pub weighted_sum: f64,
    pub total_credits: u64,
    pub subjects_counted: usize,
    pub exemption_rules: Vec<String>,
    pub excluded: Vec<ExcludedSubject>,
    pub warnings: Vec<MalformedRowError>,
    pub generated_at: DateTime<Utc>,
}

impl GpaReport {
    pub fn new(session: &GpaSession, request: &CalculationRequest, outcome: &CalculationOutcome) -> Self {
        Self {
            mode: request.mode(),
            semester: request.semester_label().map(|s| s.trim().to_string()),
            scale: session.scale(),
            gpa: outcome.result.rounded(),
            weighted_sum: outcome.result.weighted_sum(),
            total_credits: outcome.result.total_credits(),
            subjects_counted: outcome.result.subjects_counted(),
            exemption_rules: session.exemptions().rules().map(String::from).collect(),
            excluded: outcome.excluded.clone(),
            warnings: outcome.warnings.clone(),
            generated_at: Utc::now(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        if !self.warnings.is_empty() {
            lines.push(format!("⚠️ {} row(s) could not be read:", self.warnings.len()));
            for warning in &self.warnings {
                lines.push(format!("  - {}", warning));
            }
        }

        if !self.exemption_rules.is_empty() {
            lines.push(format!("Exempted subjects: {}", self.exemption_rules.join(", ")));
        }
        lines.push(format!(
            "Subjects counted: {} ({} credits, scale {})",
            self.subjects_counted, self.total_credits, self.scale
        ));
        lines.push(format!("Your GPA score is: {:.2}", self.gpa));

        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
