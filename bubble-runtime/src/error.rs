//! # Error 模块
//!
//! 定义 bubble-runtime 中使用的错误类型。

use thiserror::Error;

/// 脚本加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// JSON 格式无效
    #[error("脚本 JSON 无效：{message}")]
    InvalidJson { message: String },

    /// 脚本文件读取失败
    #[error("无法读取脚本 '{path}'：{message}")]
    Io { path: String, message: String },
}

/// 运行时错误
///
/// 只影响当前这一步推进，序列器本身仍可继续推进。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// 条目引用了未定义的说话者
    #[error("第 {index} 句的说话者 '{tag}' 无效，只允许 A 或 B")]
    InvalidSpeaker { index: usize, tag: String },
}
