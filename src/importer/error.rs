// ==========================================
// QC 检验分析引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有工作簿本身无法打开才是致命错误，
//       单个工作表的错误由调用方隔离为 SheetOutcome::Failed
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 工作簿相关错误（致命）=====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.xlsb/.ods 或 CSV 目录）")]
    UnsupportedFormat(String),

    #[error("工作簿无法打开: {0}")]
    WorkbookOpen(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 工作表相关错误（可隔离）=====
    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("工作表读取失败 ({sheet}): {message}")]
    SheetReadError { sheet: String, message: String },

    #[error("工作表列数不足 ({sheet}): 期望至少 {expected} 列，实际 {found} 列")]
    SchemaMismatch {
        sheet: String,
        expected: usize,
        found: usize,
    },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_file_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ImportError = io.into();
        assert!(matches!(err, ImportError::FileReadError(ref msg) if msg.contains("denied")));
    }

    #[test]
    fn test_schema_mismatch_message() {
        let err = ImportError::SchemaMismatch {
            sheet: "FEB26".to_string(),
            expected: 18,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("FEB26"));
        assert!(msg.contains("18"));
    }
}
