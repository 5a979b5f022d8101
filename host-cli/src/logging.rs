//! # Logging 模块
//!
//! 初始化 `tracing` 日志，输出到 stderr，避免和对话文本混在一起。

use std::io::IsTerminal;

use thiserror::Error;
use tracing::Level;

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    /// 日志级别无法解析
    #[error("未知的日志级别: {0}")]
    InvalidLevel(String),
    /// 全局订阅者已经存在
    #[error("日志系统初始化失败: {0}")]
    InitFailed(String),
}

/// 解析日志级别（不区分大小写）
pub fn parse_level(level: &str) -> Result<Level, LoggingError> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// 安装全局 fmt 订阅者
pub fn init(level: &str) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::InitFailed(e.to_string()))
}
