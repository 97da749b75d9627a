use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 試算表儲存格的值，型別只在 RecordParser 中解析一次
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// 空白字串視為空儲存格
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s.trim()),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

/// 成績單中的一列科目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRecord {
    /// 試算表列號（從 1 起算）
    pub row: usize,
    pub subject_code: String,
    pub semester_label: String,
    pub credits: u32,
    /// 修課中或無數值成績時為 None，不以 0 計算
    pub grade: Option<f64>,
}

impl SubjectRecord {
    pub fn is_gradable(&self) -> bool {
        self.credits > 0 && self.grade.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        f.write_str(name)
    }
}

/// 拆解後的學期：季節 + 年份末兩位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Term {
    pub season: Season,
    pub year: u8,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 20{:02}", self.season, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Overall,
    Semester,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "overall" => Ok(Mode::Overall),
            "2" | "semester" | "one semester" => Ok(Mode::Semester),
            other => Err(format!(
                "unknown mode '{}', expected 'overall' (1) or 'semester' (2)",
                other
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Overall => f.write_str("overall"),
            Mode::Semester => f.write_str("semester"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationRequest {
    Overall,
    /// `label` 是使用者輸入的原始文字，比對前才正規化
    Semester { label: String },
}

impl CalculationRequest {
    pub fn semester(label: impl Into<String>) -> Self {
        CalculationRequest::Semester {
            label: label.into(),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            CalculationRequest::Overall => Mode::Overall,
            CalculationRequest::Semester { .. } => Mode::Semester,
        }
    }

    pub fn semester_label(&self) -> Option<&str> {
        match self {
            CalculationRequest::Overall => None,
            CalculationRequest::Semester { label } => Some(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradeScale {
    #[default]
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "4")]
    Four,
}

impl GradeScale {
    pub fn max(&self) -> f64 {
        match self {
            GradeScale::Ten => 10.0,
            GradeScale::Four => 4.0,
        }
    }
}

impl FromStr for GradeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "10" => Ok(GradeScale::Ten),
            "4" => Ok(GradeScale::Four),
            other => Err(format!("unknown grade scale '{}', expected 10 or 4", other)),
        }
    }
}

impl fmt::Display for GradeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0-{}", self.max())
    }
}

/// 各欄位在列中的位置（從 0 起算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub subject_code: usize,
    pub semester: usize,
    pub credits: usize,
    pub grade: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            subject_code: 0,
            semester: 1,
            credits: 2,
            grade: 3,
        }
    }
}

/// 加權平均的計算結果，建立後不可變
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaResult {
    weighted_sum: f64,
    total_credits: u64,
    average: f64,
    subjects_counted: usize,
}

impl GpaResult {
    pub(crate) fn new(weighted_sum: f64, total_credits: u64, subjects_counted: usize) -> Self {
        Self {
            weighted_sum,
            total_credits,
            average: weighted_sum / total_credits as f64,
            subjects_counted,
        }
    }

    pub fn weighted_sum(&self) -> f64 {
        self.weighted_sum
    }

    pub fn total_credits(&self) -> u64 {
        self.total_credits
    }

    /// 未四捨五入的平均
    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn subjects_counted(&self) -> usize {
        self.subjects_counted
    }

    /// 顯示用，四捨五入至小數兩位
    pub fn rounded(&self) -> f64 {
        (self.average * 100.0).round() / 100.0
    }
}
