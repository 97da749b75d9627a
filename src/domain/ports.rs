use crate::domain::model::{Cell, ColumnLayout, GradeScale};
use crate::utils::error::Result;

/// 成績單來源：把檔案或其他表格讀成依序排列的列
pub trait TranscriptSource {
    fn read_rows(&self) -> Result<Vec<Vec<Cell>>>;
}

/// 已在記憶體中的列，測試與嵌入使用
impl TranscriptSource for Vec<Vec<Cell>> {
    fn read_rows(&self) -> Result<Vec<Vec<Cell>>> {
        Ok(self.clone())
    }
}

pub trait ConfigProvider {
    fn column_layout(&self) -> ColumnLayout;
    fn grade_scale(&self) -> GradeScale;
    fn default_exemptions(&self) -> &[String];
}
