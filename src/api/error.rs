// ==========================================
// QC 检验分析引擎 - API 层错误类型
// ==========================================
// 职责: 将导入 / 配置 / 日历错误转换为调用方可读的错误消息
// 说明: 单表失败与空选择不是错误（见 SheetOutcome / AnalysisOutcome）
// ==========================================

use crate::config::ConfigError;
use crate::engine::calendar::CalendarError;
use crate::importer::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 工作簿错误（致命）
    // ==========================================
    #[error("工作簿无法打开: {0}")]
    WorkbookUnavailable(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件不存在: {}", path)),
            ImportError::UnsupportedFormat(path) => {
                ApiError::InvalidInput(format!("文件格式不支持: {}", path))
            }
            ImportError::WorkbookOpen(msg) | ImportError::FileReadError(msg) => {
                ApiError::WorkbookUnavailable(msg)
            }
            ImportError::SheetNotFound(sheet) => {
                ApiError::NotFound(format!("工作表不存在: {}", sheet))
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

// ==========================================
// 从 CalendarError 转换
// ==========================================
impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
