//! # Script 模块
//!
//! 对话脚本的数据模型：说话者、脚本条目和有序脚本。
//!
//! ## 脚本格式
//!
//! ```json
//! {
//!   "name": "intro",
//!   "entries": [
//!     { "speaker": "A", "text": "Hello there" },
//!     { "speaker": "B", "text": "Hi!" }
//!   ]
//! }
//! ```
//!
//! 也接受只包含条目数组的简写形式。

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RuntimeError, ScriptError};

/// 说话者（两个气泡之一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// 第一个气泡
    A,
    /// 第二个气泡
    B,
}

impl Speaker {
    /// 对方说话者
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// 解析脚本中的说话者标记（不区分大小写）
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "a" | "1" | "bubble_1" | "left" => Some(Self::A),
            "b" | "2" | "bubble_2" | "right" => Some(Self::B),
            _ => None,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// 脚本中书写的说话者标记
///
/// 无法识别的标记原样保留，推进到该条目时才报告，而不是拒绝整个脚本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpeakerTag {
    /// 有效的说话者
    Known(Speaker),
    /// 无法识别的标记
    Unknown(String),
}

impl SpeakerTag {
    /// 解析为说话者，`index` 用于错误定位
    pub fn resolve(&self, index: usize) -> Result<Speaker, RuntimeError> {
        match self {
            Self::Known(speaker) => Ok(*speaker),
            Self::Unknown(tag) => Err(RuntimeError::InvalidSpeaker {
                index,
                tag: tag.clone(),
            }),
        }
    }

    /// 是否为有效说话者
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<String> for SpeakerTag {
    fn from(tag: String) -> Self {
        match Speaker::parse_tag(&tag) {
            Some(speaker) => Self::Known(speaker),
            None => Self::Unknown(tag),
        }
    }
}

impl From<&str> for SpeakerTag {
    fn from(tag: &str) -> Self {
        tag.to_string().into()
    }
}

impl From<SpeakerTag> for String {
    fn from(tag: SpeakerTag) -> Self {
        match tag {
            SpeakerTag::Known(speaker) => speaker.to_string(),
            SpeakerTag::Unknown(tag) => tag,
        }
    }
}

impl From<Speaker> for SpeakerTag {
    fn from(speaker: Speaker) -> Self {
        Self::Known(speaker)
    }
}

/// 脚本条目：谁说了什么
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// 说话者标记
    pub speaker: SpeakerTag,
    /// 原始文本
    pub text: String,
}

impl ScriptEntry {
    /// 创建条目
    pub fn new(speaker: impl Into<SpeakerTag>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// 脚本文件的两种书写形式
#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    Document {
        #[serde(default)]
        name: String,
        entries: Vec<ScriptEntry>,
    },
    Entries(Vec<ScriptEntry>),
}

/// 有序脚本，插入顺序即播放顺序
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称（用于诊断输出）
    #[serde(default)]
    pub name: String,
    /// 条目列表
    pub entries: Vec<ScriptEntry>,
}

impl Script {
    /// 创建脚本
    pub fn new(name: impl Into<String>, entries: Vec<ScriptEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// 从 JSON 文本解析脚本
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile =
            serde_json::from_str(json).map_err(|e| ScriptError::InvalidJson {
                message: e.to_string(),
            })?;

        Ok(match file {
            ScriptFile::Document { name, entries } => Self { name, entries },
            ScriptFile::Entries(entries) => Self {
                name: String::new(),
                entries,
            },
        })
    }

    /// 从文件加载脚本
    ///
    /// 未命名的脚本使用文件名（不含扩展名）作为名称。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut script = Self::from_json(&content)?;
        if script.name.is_empty() {
            script.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(script)
    }

    /// 获取条目
    pub fn get(&self, index: usize) -> Option<&ScriptEntry> {
        self.entries.get(index)
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_tags() {
        assert_eq!(Speaker::parse_tag("A"), Some(Speaker::A));
        assert_eq!(Speaker::parse_tag("Bubble_1"), Some(Speaker::A));
        assert_eq!(Speaker::parse_tag(" right "), Some(Speaker::B));
        assert_eq!(Speaker::parse_tag("2"), Some(Speaker::B));
        assert_eq!(Speaker::parse_tag("narrator"), None);
        assert_eq!(Speaker::A.other(), Speaker::B);
    }

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "name": "intro",
            "entries": [
                { "speaker": "A", "text": "Hello there" },
                { "speaker": "bubble_2", "text": "Hi!" }
            ]
        }"#;
        let script = Script::from_json(json).unwrap();
        assert_eq!(script.name, "intro");
        assert_eq!(script.len(), 2);
        assert_eq!(script.entries[1], ScriptEntry::new(Speaker::B, "Hi!"));
    }

    #[test]
    fn test_parse_bare_array_keeps_unknown_speaker() {
        let json = r#"[
            { "speaker": "A", "text": "one" },
            { "speaker": "C", "text": "two" }
        ]"#;
        let script = Script::from_json(json).unwrap();
        assert_eq!(script.name, "");
        assert_eq!(
            script.entries[1].speaker,
            SpeakerTag::Unknown("C".to_string())
        );
        assert_eq!(
            script.entries[1].speaker.resolve(1),
            Err(RuntimeError::InvalidSpeaker {
                index: 1,
                tag: "C".to_string()
            })
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = Script::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidJson { .. }));
    }

    #[test]
    fn test_serialize_roundtrip_uses_tags() {
        let script = Script::new("s", vec![ScriptEntry::new(Speaker::A, "x")]);
        let json = serde_json::to_string(&script).unwrap();
        assert!(json.contains(r#""speaker":"A""#));
        assert_eq!(Script::from_json(&json).unwrap(), script);
    }
}
