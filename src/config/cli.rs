use crate::adapters::transcript_reader::SUPPORTED_EXTENSIONS;
use crate::config::toml_config::{OutputFormat, TomlConfig};
use crate::domain::model::{CalculationRequest, GradeScale, Mode};
use crate::utils::error::Result;
use crate::utils::validation::{
    strip_surrounding_quotes, validate_file_extension, validate_non_empty_string, validate_path,
    validate_required_field, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "gpa-calc")]
#[command(about = "Compute a credit-weighted GPA from an exported transcript")]
pub struct CliConfig {
    /// Transcript file (.csv, .xlsx, .xlsm, .xls, .ods)
    pub transcript: String,

    /// Calculation mode: overall (1) or semester (2)
    #[arg(short, long, default_value = "overall")]
    pub mode: Mode,

    /// Semester to calculate, e.g. "Fall 2022", "Fall2022" or "FA22"
    #[arg(short, long)]
    pub semester: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Grading scale: 10 or 4
    #[arg(long)]
    pub scale: Option<GradeScale>,

    /// Add an exemption prefix (first 3 letters of the subject code)
    #[arg(long = "exempt", value_name = "PREFIX")]
    pub exempt: Vec<String>,

    /// Remove an exemption prefix so the subject counts again
    #[arg(long = "include", value_name = "PREFIX")]
    pub include: Vec<String>,

    /// Worksheet name for spreadsheet transcripts
    #[arg(long)]
    pub sheet: Option<String>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn transcript_path(&self) -> &str {
        strip_surrounding_quotes(&self.transcript)
    }

    /// 指定了學期即視為單學期模式
    pub fn effective_mode(&self) -> Mode {
        if self.semester.is_some() {
            Mode::Semester
        } else {
            self.mode
        }
    }

    pub fn request(&self) -> Result<CalculationRequest> {
        match self.effective_mode() {
            Mode::Overall => Ok(CalculationRequest::Overall),
            Mode::Semester => {
                let label = validate_required_field("semester", &self.semester)?;
                validate_non_empty_string("semester", label)?;
                Ok(CalculationRequest::semester(label.clone()))
            }
        }
    }

    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(scale) = self.scale {
            config.grading.scale = scale;
            tracing::info!("🔧 Grade scale overridden to: {}", scale);
        }
        if let Some(sheet) = &self.sheet {
            config.transcript.sheet = Some(sheet.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let path = self.transcript_path();
        validate_path("transcript", path)?;
        validate_file_extension("transcript", path, SUPPORTED_EXTENSIONS)?;

        for prefix in self.exempt.iter().chain(&self.include) {
            validate_non_empty_string("exempt", prefix)?;
        }

        self.request().map(|_| ())
    }
}
