//! 核心错误定义

use std::path::PathBuf;
use thiserror::Error;

/// 键入值解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Missing value: {0}")]
    MissingValue(String),
}

/// 设置加载/保存错误
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("读取设置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析设置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}
