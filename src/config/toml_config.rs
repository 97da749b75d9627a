use crate::core::exemption::DEFAULT_EXEMPTIONS;
use crate::core::ConfigProvider;
use crate::domain::model::{ColumnLayout, GradeScale};
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{validate_distinct, validate_non_empty_string, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub transcript: TranscriptConfig,
    pub grading: GradingConfig,
    pub exemptions: ExemptionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// 試算表工作表名稱，未設定時讀第一個
    pub sheet: Option<String>,
    pub columns: ColumnLayout,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    pub scale: GradeScale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemptionConfig {
    pub subjects: Vec<String>,
}

impl Default for ExemptionConfig {
    fn default() -> Self {
        Self {
            subjects: DEFAULT_EXEMPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}', expected text or json", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GpaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，缺少的區段使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GpaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 展開 `${NAME}`；環境中沒有的變數保留原字樣，交給 TOML 解析或驗證處理
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &Captures| match std::env::var(&caps[1]) {
                Ok(value) => value,
                Err(_) => caps[0].to_string(),
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let columns = &self.transcript.columns;
        validate_distinct(
            "transcript.columns",
            &[columns.subject_code, columns.semester, columns.credits, columns.grade],
        )?;

        if let Some(sheet) = &self.transcript.sheet {
            validate_non_empty_string("transcript.sheet", sheet)?;
        }

        for subject in &self.exemptions.subjects {
            validate_non_empty_string("exemptions.subjects", subject)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn column_layout(&self) -> ColumnLayout {
        self.transcript.columns
    }

    fn grade_scale(&self) -> GradeScale {
        self.grading.scale
    }

    fn default_exemptions(&self) -> &[String] {
        &self.exemptions.subjects
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[transcript]
sheet = "Grades"

[transcript.columns]
subject_code = 1
semester = 0
credits = 2
grade = 3

[grading]
scale = "4"

[exemptions]
subjects = ["PED", "ENG"]

[output]
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.transcript.sheet.as_deref(), Some("Grades"));
        assert_eq!(config.column_layout().subject_code, 1);
        assert_eq!(config.grade_scale(), GradeScale::Four);
        assert_eq!(config.default_exemptions(), ["PED", "ENG"]);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.column_layout(), ColumnLayout::default());
        assert_eq!(config.grade_scale(), GradeScale::Ten);
        assert_eq!(config.default_exemptions().len(), DEFAULT_EXEMPTIONS.len());
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_columns_keep_remaining_defaults() {
        let config = TomlConfig::from_toml_str("[transcript.columns]\ngrade = 5\n").unwrap();

        assert_eq!(config.column_layout().grade, 5);
        assert_eq!(config.column_layout().credits, 2);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GPA_TEST_SHEET", "Transcript");

        let config = TomlConfig::from_toml_str("[transcript]\nsheet = \"${GPA_TEST_SHEET}\"\n").unwrap();
        assert_eq!(config.transcript.sheet.as_deref(), Some("Transcript"));

        std::env::remove_var("GPA_TEST_SHEET");
    }

    #[test]
    fn test_undefined_env_var_is_left_in_place() {
        std::env::remove_var("GPA_TEST_UNSET_SHEET");

        let config =
            TomlConfig::from_toml_str("[transcript]\nsheet = \"${GPA_TEST_UNSET_SHEET}\"\n").unwrap();
        assert_eq!(config.transcript.sheet.as_deref(), Some("${GPA_TEST_UNSET_SHEET}"));
        assert_eq!(
            TomlConfig::substitute_env_vars("a ${GPA_TEST_UNSET_SHEET} b"),
            "a ${GPA_TEST_UNSET_SHEET} b"
        );
    }

    #[test]
    fn test_config_validation() {
        let duplicate_columns = r#"
[transcript.columns]
subject_code = 0
semester = 0
"#;
        let config = TomlConfig::from_toml_str(duplicate_columns).unwrap();
        assert!(config.validate().is_err());

        let blank_exemption = "[exemptions]\nsubjects = [\"  \"]\n";
        let config = TomlConfig::from_toml_str(blank_exemption).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        assert!(TomlConfig::from_toml_str("[grading]\nscale = \"5\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[grading]\nscale = \"4\"\n").unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.grade_scale(), GradeScale::Four);
    }
}
