// ==========================================
// QC 检验分析引擎 - 配置层错误类型
// ==========================================
// 说明: 只有配置文件本身无法读取 / 不是 JSON 对象时才报错，
//       单个键的值格式错误由 ConfigManager 回退到默认值
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    ReadError(String),

    #[error("配置文件格式错误: {0}")]
    ParseError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::ReadError(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
