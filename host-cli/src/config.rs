//! # Config 模块
//!
//! 终端宿主的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use bubble_runtime::{BubbleSettings, LabelMetrics, SequencerSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 对话脚本路径
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// 帧率，决定每帧的 dt
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// 是否按真实时间播放（关闭后尽快跑完所有帧）
    #[serde(default = "default_realtime")]
    pub realtime: bool,

    /// 自动播放时，动画全部结束后等待多久再推进（秒）
    #[serde(default = "default_auto_advance_delay")]
    pub auto_advance_delay: f32,

    /// 标签排版配置
    #[serde(default)]
    pub label: LabelConfig,

    /// 气泡配置
    #[serde(default)]
    pub bubble: BubbleSettings,

    /// 序列器配置
    #[serde(default)]
    pub sequencer: SequencerSettings,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 标签排版配置（等宽终端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// 每行字符数
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// 行高
    #[serde(default = "default_line_height")]
    pub line_height: f32,

    /// 字号（逐字显示的目标字号）
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// 每次设置文本后排版需要的帧数
    #[serde(default)]
    pub settle_frames: usize,
}

/// 音频配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 是否播放逐字音效（需要 `audio` 特性）
    #[serde(default)]
    pub enabled: bool,

    /// 音效文件路径
    #[serde(default = "default_clip_path")]
    pub clip_path: PathBuf,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub level: String,
}

// 默认值函数
fn default_script_path() -> PathBuf {
    PathBuf::from("host-cli/assets/scripts/demo.json")
}

fn default_frame_rate() -> u32 {
    60
}

fn default_realtime() -> bool {
    true
}

fn default_auto_advance_delay() -> f32 {
    0.8
}

fn default_columns() -> usize {
    40
}

fn default_line_height() -> f32 {
    20.0
}

fn default_font_size() -> f32 {
    24.0
}

fn default_clip_path() -> PathBuf {
    PathBuf::from("host-cli/assets/audio/blip.wav")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            frame_rate: default_frame_rate(),
            realtime: default_realtime(),
            auto_advance_delay: default_auto_advance_delay(),
            label: LabelConfig::default(),
            bubble: BubbleSettings::default(),
            sequencer: SequencerSettings::default(),
            audio: AudioConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            line_height: default_line_height(),
            font_size: default_font_size(),
            settle_frames: 0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            clip_path: default_clip_path(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LabelConfig {
    /// 转换为无头标签的排版参数
    pub fn metrics(&self) -> LabelMetrics {
        LabelMetrics {
            columns: self.columns,
            line_height: self.line_height,
            font_size: self.font_size,
            settle_frames: self.settle_frames,
        }
    }
}

impl AppConfig {
    /// 读取配置文件
    ///
    /// 调用方决定失败时是否退回默认配置。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 每帧时长（秒）
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::ValidationFailed(
                "帧率必须大于 0".to_string(),
            ));
        }

        if self.label.columns == 0 {
            return Err(ConfigError::ValidationFailed(
                "标签每行字符数必须大于 0".to_string(),
            ));
        }

        // 每帧增长量向下取整，不足 1 时字符永远不会长大
        if self.bubble.reveal.growth_rate * self.frame_dt() < 1.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "逐字显示增长速度过低：{} 帧/秒下每帧至少需要增长 1（growth_rate ≥ {}）",
                self.frame_rate, self.frame_rate
            )));
        }

        if self.bubble.show_duration < 0.0 || self.bubble.hide_duration < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "缩放动画时长不能为负数".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.bubble.sound.volume) {
            return Err(ConfigError::ValidationFailed(
                "音效音量必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.bubble.sound.pitch_range) {
            return Err(ConfigError::ValidationFailed(
                "音调随机范围必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if self.auto_advance_delay < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "自动推进间隔不能为负数".to_string(),
            ));
        }

        if self.log.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "未知的日志级别: {}",
                self.log.level
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// 文件不存在
    #[error("配置文件不存在: {0}")]
    NotFound(String),
    /// 解析失败
    #[error("配置文件解析失败: {0}")]
    ParseFailed(String),
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
