//! # 诊断模块
//!
//! 提供脚本静态检查和诊断 API，不依赖 IO 或渲染。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 运行时仍然能处理有问题的条目，诊断只负责提前暴露

use crate::script::{Script, SpeakerTag};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 脚本名称 / 文件路径
    pub script: String,
    /// 条目索引（从 0 开始，如果可定位）
    pub entry: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选，如原始文本）
    pub detail: Option<String>,
}

impl Diagnostic {
    fn with_level(
        level: DiagnosticLevel,
        script: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            script: script.into(),
            entry: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建错误诊断
    pub fn error(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, script, message)
    }

    /// 创建警告诊断
    pub fn warn(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warn, script, message)
    }

    /// 创建信息诊断
    pub fn info(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, script, message)
    }

    /// 设置条目索引
    pub fn with_entry(mut self, entry: usize) -> Self {
        self.entry = Some(entry);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.script)?;
        if let Some(entry) = self.entry {
            write!(f, "#{}", entry)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 分析脚本，返回诊断结果
///
/// 执行以下检查：
/// - 无效的说话者标记（Error）
/// - 空脚本、空白文本（Warn）
/// - 文本中自带 `<size>` 标签，会与逐字动画的标记混在一起（Warn）
/// - 连续空格，会在换行计算中产生空词（Info）
pub fn analyze_script(script: &Script) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let name = script.name.as_str();

    if script.is_empty() {
        result.push(Diagnostic::warn(name, "脚本没有任何条目，推进时气泡不会出现"));
    }

    for (index, entry) in script.entries.iter().enumerate() {
        if let SpeakerTag::Unknown(tag) = &entry.speaker {
            result.push(
                Diagnostic::error(name, format!("无效的说话者: **{}**", tag))
                    .with_entry(index)
                    .with_detail(entry.text.clone()),
            );
        }

        if entry.text.trim().is_empty() {
            result.push(Diagnostic::warn(name, "文本为空，气泡将显示为空").with_entry(index));
            continue;
        }

        if entry.text.contains("<size") || entry.text.contains("</size>") {
            result.push(
                Diagnostic::warn(name, "文本包含 <size> 标签，会干扰逐字放大动画")
                    .with_entry(index)
                    .with_detail(entry.text.clone()),
            );
        }

        if entry.text.contains("  ") {
            result.push(
                Diagnostic::info(name, "文本包含连续空格，换行计算会把它们当作空词")
                    .with_entry(index),
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{ScriptEntry, Speaker};

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("intro", "无效的说话者: **C**")
            .with_entry(2)
            .with_detail("hello");
        assert_eq!(
            diag.to_string(),
            "[ERROR] intro#2: 无效的说话者: **C**\n  | hello"
        );
    }

    #[test]
    fn test_analyze_clean_script() {
        let script = Script::new(
            "clean",
            vec![
                ScriptEntry::new(Speaker::A, "Hello there"),
                ScriptEntry::new(Speaker::B, "Hi!"),
            ],
        );
        assert!(analyze_script(&script).is_empty());
    }

    #[test]
    fn test_analyze_invalid_speaker() {
        let script = Script::new(
            "bad",
            vec![
                ScriptEntry::new(Speaker::A, "fine"),
                ScriptEntry::new(SpeakerTag::Unknown("narrator".into()), "who?"),
            ],
        );
        let result = analyze_script(&script);
        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.diagnostics[0].entry, Some(1));
    }

    #[test]
    fn test_analyze_text_warnings() {
        let script = Script::new(
            "warn",
            vec![
                ScriptEntry::new(Speaker::A, "   "),
                ScriptEntry::new(Speaker::B, "big <size=40>word</size>"),
                ScriptEntry::new(Speaker::A, "two  spaces"),
            ],
        );
        let result = analyze_script(&script);
        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 2);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Info).len(), 3);
    }

    #[test]
    fn test_analyze_empty_script() {
        let result = analyze_script(&Script::default());
        assert_eq!(result.warn_count(), 1);
    }
}
