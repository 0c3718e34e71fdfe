// ==========================================
// QC 检验分析引擎 - 工作簿数据源实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV 目录 / 内存
// 说明: 所有数据源都转换为 RawSheet（按绝对行列位置）
// ==========================================

use crate::domain::{CellValue, RawSheet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::WorkbookSource;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 支持的 Excel 扩展名
const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// Excel 工作簿（calamine）
// ==========================================
pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// 打开 Excel 工作簿
    ///
    /// # 返回
    /// - Err(FileNotFound / UnsupportedFormat / WorkbookOpen): 致命错误
    pub fn open<P: AsRef<Path>>(file_path: P) -> ImportResult<Self> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let workbook = open_workbook_auto(path)
            .map_err(|e| ImportError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<RawSheet> {
        if !self.workbook.sheet_names().iter().any(|s| s == name) {
            return Err(ImportError::SheetNotFound(name.to_string()));
        }

        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| ImportError::SheetReadError {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;

        debug!(sheet = name, rows = range.height(), cols = range.width(), "Excel 工作表读取完成");
        Ok(range_to_sheet(name, &range))
    }
}

/// Range → RawSheet
///
/// calamine 的 Range 从第一个有值单元格开始，这里补齐前导空行/空列，
/// 保证列号与表格中的绝对列位置一致。
pub fn range_to_sheet(name: &str, range: &Range<Data>) -> RawSheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for data_row in range.rows() {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(data_row.iter().map(convert_cell));
        rows.push(cells);
    }

    RawSheet::new(name, rows)
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // #N/A / #DIV/0! 等错误单元格视为缺失
        Data::Error(_) => CellValue::Empty,
    }
}

// ==========================================
// CSV 工作簿（目录中每个 .csv 文件为一个工作表）
// ==========================================
pub struct CsvWorkbook {
    sheets: Vec<(String, PathBuf)>,
}

impl CsvWorkbook {
    /// 打开 CSV 目录（或单个 CSV 文件）
    ///
    /// 工作表名称取文件名（不含扩展名），按名称排序
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut sheets = Vec::new();
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.is_file() && extension_of(&entry_path) == "csv" {
                    if let Some(stem) = entry_path.file_stem().and_then(|s| s.to_str()) {
                        sheets.push((stem.to_string(), entry_path.clone()));
                    }
                }
            }
        } else if extension_of(path) == "csv" {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| ImportError::WorkbookOpen(path.display().to_string()))?;
            sheets.push((stem.to_string(), path.to_path_buf()));
        } else {
            return Err(ImportError::UnsupportedFormat(extension_of(path)));
        }

        sheets.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { sheets })
    }
}

impl WorkbookSource for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<RawSheet> {
        let (_, path) = self
            .sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .ok_or_else(|| ImportError::SheetNotFound(name.to_string()))?;

        // 第 0 行为表头，与 Excel 一致，由导入器丢弃
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(path)
            .map_err(|e| ImportError::SheetReadError {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ImportError::SheetReadError {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;
            rows.push(
                record
                    .iter()
                    .map(|value| {
                        if value.trim().is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(value.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(RawSheet::new(name, rows))
    }
}

// ==========================================
// 内存工作簿
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<RawSheet>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<RawSheet>) -> Self {
        Self { sheets }
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<RawSheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound(name.to_string()))
    }
}

// ==========================================
// 通用入口（根据路径自动选择）
// ==========================================

/// 打开工作簿
///
/// - 目录或 .csv → CsvWorkbook
/// - Excel 扩展名 → ExcelWorkbook
pub fn open_workbook<P: AsRef<Path>>(path: P) -> ImportResult<Box<dyn WorkbookSource>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    if path.is_dir() || extension_of(path) == "csv" {
        return Ok(Box::new(CsvWorkbook::open(path)?));
    }

    Ok(Box::new(ExcelWorkbook::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_csv_workbook_reads_directory() {
        let dir = TempDir::new().unwrap();
        let mut jan = File::create(dir.path().join("JAN26.csv")).unwrap();
        writeln!(jan, "Order,Lot,Due").unwrap();
        writeln!(jan, "SO-1,L1,2026-01-10").unwrap();
        writeln!(jan, "SO-2,,").unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["JAN26".to_string()]);

        let sheet = workbook.read_sheet("JAN26").unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1][0], CellValue::Text("SO-1".to_string()));
        assert_eq!(sheet.rows[2][1], CellValue::Empty);
    }

    #[test]
    fn test_csv_workbook_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert!(matches!(
            workbook.read_sheet("FEB26"),
            Err(ImportError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_open_workbook_not_found() {
        let result = open_workbook("non_existent_tracker.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_open_workbook_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.txt");
        File::create(&path).unwrap();
        assert!(matches!(
            open_workbook(&path),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_range_to_sheet_keeps_absolute_columns() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("Order".to_string()));
        range.set_value((2, 2), Data::String("SO-1".to_string()));
        range.set_value((2, 3), Data::Float(12.0));

        let sheet = range_to_sheet("JAN26", &range);
        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows[0].is_empty());
        assert_eq!(sheet.rows[2][0], CellValue::Empty);
        assert_eq!(sheet.rows[2][2], CellValue::Text("SO-1".to_string()));
        assert_eq!(sheet.rows[2][3], CellValue::Number(12.0));
    }

    #[test]
    fn test_memory_workbook() {
        let mut workbook = MemoryWorkbook::new(vec![RawSheet::new("JAN26", vec![])]);
        assert_eq!(workbook.sheet_names(), vec!["JAN26".to_string()]);
        assert!(workbook.read_sheet("JAN26").is_ok());
        assert!(workbook.read_sheet("FEB26").is_err());
    }
}
