use crate::core::exemption::ExemptionSet;
use crate::core::pipeline::{CalculationOutcome, CalculationPipeline};
use crate::core::record_parser::RecordParser;
use crate::domain::model::{CalculationRequest, Cell, ColumnLayout, GradeScale};
use crate::domain::ports::{ConfigProvider, TranscriptSource};
use crate::utils::error::Result;

/// 一次互動使用期間的狀態。
///
/// 免計科目集合只屬於這個 session，在兩次計算之間增減，不會寫回磁碟。
#[derive(Debug, Clone)]
pub struct GpaSession {
    layout: ColumnLayout,
    scale: GradeScale,
    exemptions: ExemptionSet,
}

impl GpaSession {
    pub fn new(layout: ColumnLayout, scale: GradeScale, exemptions: ExemptionSet) -> Self {
        Self {
            layout,
            scale,
            exemptions,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let exemptions = ExemptionSet::from_prefixes(config.default_exemptions())?;
        Ok(Self::new(config.column_layout(), config.grade_scale(), exemptions))
    }

    pub fn scale(&self) -> GradeScale {
        self.scale
    }

    pub fn exemptions(&self) -> &ExemptionSet {
        &self.exemptions
    }

    pub fn add_exemption(&mut self, prefix: &str) -> Result<bool> {
        self.exemptions.add_rule(prefix)
    }

    pub fn remove_exemption(&mut self, prefix: &str) -> bool {
        self.exemptions.remove_rule(prefix)
    }

    pub fn calculate(&self, rows: &[Vec<Cell>], request: &CalculationRequest) -> Result<CalculationOutcome> {
        tracing::info!("🚀 Calculating {} GPA", request.mode());
        let parser = RecordParser::new(self.layout, self.scale);
        let outcome = CalculationPipeline::new(parser, &self.exemptions).run(rows, request)?;

        tracing::info!(
            "✅ GPA {:.2} over {} credits",
            outcome.result.average(),
            outcome.result.total_credits()
        );
        Ok(outcome)
    }

    pub fn calculate_from<S: TranscriptSource>(
        &self,
        source: &S,
        request: &CalculationRequest,
    ) -> Result<CalculationOutcome> {
        let rows = source.read_rows()?;
        tracing::debug!("Read {} rows from transcript", rows.len());
        self.calculate(&rows, request)
    }
}
