use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 單列解析失敗時指出的欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    Credits,
    Grade,
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowField::Credits => "credits",
            RowField::Grade => "grade",
        };
        f.write_str(name)
    }
}

/// 有科目代碼但學分或成績欄無法使用的列。
///
/// 這類錯誤只會被收集，不會中斷解析；`row` 是試算表中的列號（從 1 起算）。
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("row {row}: invalid {field} '{value}' ({reason})")]
pub struct MalformedRowError {
    pub row: usize,
    pub field: RowField,
    pub value: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum GpaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet processing error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported transcript format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No usable rows in transcript: {} malformed row(s)", .errors.len())]
    AllRowsMalformed { errors: Vec<MalformedRowError> },

    #[error("Unknown semester '{requested}'")]
    UnknownSemester {
        requested: String,
        available: Vec<String>,
        /// 解析時被略過的錯誤列，所選學期的科目可能就在其中
        row_errors: Vec<MalformedRowError>,
    },

    #[error("No gradable subjects in {scope}")]
    NoGradableSubjects {
        scope: String,
        row_errors: Vec<MalformedRowError>,
    },
}

pub type Result<T> = std::result::Result<T, GpaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Calculation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GpaError {
    /// 把解析階段收集的錯誤列附到範圍層級的錯誤上，其他錯誤原樣回傳
    pub fn with_row_errors(self, errors: Vec<MalformedRowError>) -> Self {
        match self {
            GpaError::UnknownSemester {
                requested,
                available,
                mut row_errors,
            } => {
                row_errors.extend(errors);
                GpaError::UnknownSemester {
                    requested,
                    available,
                    row_errors,
                }
            }
            GpaError::NoGradableSubjects {
                scope,
                mut row_errors,
            } => {
                row_errors.extend(errors);
                GpaError::NoGradableSubjects { scope, row_errors }
            }
            other => other,
        }
    }

    /// 與錯誤一起回報的錯誤列
    pub fn row_errors(&self) -> &[MalformedRowError] {
        match self {
            GpaError::AllRowsMalformed { errors } => errors,
            GpaError::UnknownSemester { row_errors, .. }
            | GpaError::NoGradableSubjects { row_errors, .. } => row_errors,
            _ => &[],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GpaError::IoError(_) | GpaError::SerializationError(_) => ErrorCategory::System,
            GpaError::CsvError(_)
            | GpaError::SpreadsheetError(_)
            | GpaError::UnsupportedFormat { .. }
            | GpaError::AllRowsMalformed { .. } => ErrorCategory::Input,
            GpaError::ConfigValidationError { .. }
            | GpaError::InvalidConfigValueError { .. }
            | GpaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GpaError::UnknownSemester { .. } | GpaError::NoGradableSubjects { .. } => {
                ErrorCategory::Calculation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者修正輸入後即可重算
            ErrorCategory::Calculation => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GpaError::IoError(_) => "Check that the transcript path exists and is readable".to_string(),
            GpaError::CsvError(_) | GpaError::SpreadsheetError(_) => {
                "Open the exported transcript in a spreadsheet program and save it again before loading it"
                    .to_string()
            }
            GpaError::SerializationError(_) => "Retry with --format text".to_string(),
            GpaError::UnsupportedFormat { .. } => {
                "Use a .csv, .xlsx, .xls, .xlsm or .ods transcript".to_string()
            }
            GpaError::ConfigValidationError { field, .. }
            | GpaError::InvalidConfigValueError { field, .. }
            | GpaError::MissingConfigError { field } => {
                format!("Fix the '{}' setting in the config file or on the command line", field)
            }
            GpaError::AllRowsMalformed { .. } => {
                "Make sure the columns are ordered: subject code, semester, credits, grade".to_string()
            }
            GpaError::UnknownSemester { available, .. } => {
                if available.is_empty() {
                    "The transcript contains no semester labels".to_string()
                } else {
                    format!("Pick one of: {}", available.join(", "))
                }
            }
            GpaError::NoGradableSubjects { .. } => {
                "Remove an exemption rule or choose a semester with graded subjects".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GpaError::AllRowsMalformed { errors } => {
                format!("Every subject row in the transcript is invalid:\n{}", list_rows(errors))
            }
            GpaError::UnknownSemester {
                requested,
                row_errors,
                ..
            } => with_skipped_rows(
                format!("No valid subjects found for semester '{}'", requested),
                row_errors,
            ),
            GpaError::NoGradableSubjects { scope, row_errors } => with_skipped_rows(
                format!("There are no graded, credit-bearing subjects in {}", scope),
                row_errors,
            ),
            other => other.to_string(),
        }
    }
}

fn list_rows(errors: &[MalformedRowError]) -> String {
    let details: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
    details.join("\n")
}

fn with_skipped_rows(message: String, errors: &[MalformedRowError]) -> String {
    if errors.is_empty() {
        return message;
    }
    format!("{}\n{} row(s) were skipped as invalid:\n{}", message, errors.len(), list_rows(errors))
}
