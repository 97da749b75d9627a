use crate::domain::model::Cell;
use crate::domain::ports::TranscriptSource;
use crate::utils::error::{GpaError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm", "xls", "ods"];

// ==========================================
// CSV
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvTranscriptReader {
    path: PathBuf,
}

impl CsvTranscriptReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TranscriptSource for CsvTranscriptReader {
    fn read_rows(&self) -> Result<Vec<Vec<Cell>>> {
        let file = File::open(&self.path)?;
        // 表頭由 RecordParser 判斷，這裡不處理
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            rows.push(record.iter().map(|bytes| Cell::text(decode_cell(bytes))).collect());
        }

        tracing::debug!("Read {} CSV rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

/// 入口網站匯出的 CSV 是 ISO-8859-1；不是合法 UTF-8 時逐位元組轉字元
fn decode_cell(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    };
    text.trim_start_matches('\u{feff}').to_string()
}

// ==========================================
// Excel / ODS
// ==========================================
#[derive(Debug, Clone)]
pub struct SpreadsheetTranscriptReader {
    path: PathBuf,
    sheet: Option<String>,
}

impl SpreadsheetTranscriptReader {
    /// `sheet` 為 None 時讀取第一個工作表
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        Self {
            path: path.into(),
            sheet,
        }
    }
}

impl TranscriptSource for SpreadsheetTranscriptReader {
    fn read_rows(&self) -> Result<Vec<Vec<Cell>>> {
        let mut workbook = open_workbook_auto(&self.path)?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook.sheet_names().first().cloned().ok_or_else(|| {
                GpaError::ConfigValidationError {
                    field: "transcript.sheet".to_string(),
                    message: format!("'{}' has no worksheets", self.path.display()),
                }
            })?,
        };
        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 從第一個非空儲存格開始，補回前面的空列與空欄，讓欄位位置與列號對齊 A1
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
        for data_row in range.rows() {
            let mut cells = vec![Cell::Empty; start_col];
            cells.extend(data_row.iter().map(cell_from_data));
            rows.push(cells);
        }

        tracing::debug!(
            "Read {} rows from sheet '{}' of {}",
            rows.len(),
            sheet_name,
            self.path.display()
        );
        Ok(rows)
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::text(s.clone()),
        Data::Empty | Data::Error(_) => Cell::Empty,
        other => Cell::text(other.to_string()),
    }
}

// ==========================================
// 依副檔名選擇讀取器
// ==========================================
#[derive(Debug, Clone)]
pub enum TranscriptFile {
    Csv(CsvTranscriptReader),
    Spreadsheet(SpreadsheetTranscriptReader),
}

impl TranscriptFile {
    pub fn open<P: AsRef<Path>>(path: P, sheet: Option<String>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(TranscriptFile::Csv(CsvTranscriptReader::new(path))),
            e if SPREADSHEET_EXTENSIONS.contains(&e) => Ok(TranscriptFile::Spreadsheet(
                SpreadsheetTranscriptReader::new(path, sheet),
            )),
            _ => Err(GpaError::UnsupportedFormat { extension: ext }),
        }
    }
}

impl TranscriptSource for TranscriptFile {
    fn read_rows(&self) -> Result<Vec<Vec<Cell>>> {
        match self {
            TranscriptFile::Csv(reader) => reader.read_rows(),
            TranscriptFile::Spreadsheet(reader) => reader.read_rows(),
        }
    }
}
