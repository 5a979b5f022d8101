//! # Bubble 模块
//!
//! 一个对话气泡：换行计算 + 逐字显示 + 缩放动画。
//!
//! ## 任务模型
//!
//! 每个气泡最多同时持有一个文本任务和一个缩放任务：
//!
//! ```text
//! set(text) ──► Fitting ──(高度冻结)──► Revealing ──► 无任务
//!      ▲                                     │
//!      └──────── 新的 set / finish_instantly 丢弃当前任务
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::{ScaleKind, ScaleTask};
use crate::fitter::{FitStatus, FitTask};
use crate::reveal::{RevealSettings, RevealTask};
use crate::script::Speaker;
use crate::sound::{CharacterSound, SoundSettings};
use crate::surface::{BubbleTransform, CharacterVoice, TextLabel};
use crate::task::TaskStatus;

/// 气泡配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleSettings {
    /// 逐字显示参数
    #[serde(default)]
    pub reveal: RevealSettings,
    /// 音效参数
    #[serde(default)]
    pub sound: SoundSettings,
    /// 出现动画时长（秒）
    #[serde(default = "default_scale_duration")]
    pub show_duration: f32,
    /// 消失动画时长（秒）
    #[serde(default = "default_scale_duration")]
    pub hide_duration: f32,
}

fn default_scale_duration() -> f32 {
    0.3
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            reveal: RevealSettings::default(),
            sound: SoundSettings::default(),
            show_duration: default_scale_duration(),
            hide_duration: default_scale_duration(),
        }
    }
}

/// 气泡的可观察状态快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleState {
    /// 是否可见
    pub active: bool,
    /// 是否正在逐字显示
    pub is_revealing: bool,
    /// 最近一次 `set` 的原文
    pub raw_text: String,
    /// 换行后的文本
    pub processed_text: String,
    /// 冻结后的标签高度
    pub target_height: f32,
    /// 标签当前渲染的文本
    pub rendered_text: String,
    /// 当前缩放
    pub scale: f32,
}

enum TextTask {
    Fitting(FitTask),
    Revealing(RevealTask),
}

/// 对话气泡
pub struct SpeechBubble {
    speaker: Speaker,
    label: Box<dyn TextLabel>,
    transform: Box<dyn BubbleTransform>,
    sound: CharacterSound,
    settings: BubbleSettings,
    text_task: Option<TextTask>,
    scale_task: Option<ScaleTask>,
    raw_text: String,
    processed_text: String,
    target_height: f32,
}

impl std::fmt::Debug for SpeechBubble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechBubble")
            .field("speaker", &self.speaker)
            .field("state", &self.state())
            .field("scaling", &self.is_scaling())
            .finish()
    }
}

impl SpeechBubble {
    /// 创建气泡
    pub fn new(
        speaker: Speaker,
        label: Box<dyn TextLabel>,
        transform: Box<dyn BubbleTransform>,
        voice: Box<dyn CharacterVoice>,
        settings: BubbleSettings,
    ) -> Self {
        Self {
            speaker,
            label,
            transform,
            sound: CharacterSound::new(voice, settings.sound),
            settings,
            text_task: None,
            scale_task: None,
            raw_text: String::new(),
            processed_text: String::new(),
            target_height: 0.0,
        }
    }

    /// 固定音调随机种子
    pub fn with_sound_seed(mut self, seed: u64) -> Self {
        self.sound = self.sound.with_seed(seed);
        self
    }

    /// 所属说话者
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// 配置
    pub fn settings(&self) -> &BubbleSettings {
        &self.settings
    }

    // ========== 文本 ==========

    /// 设置文本：取消当前任务，重新换行并逐字显示
    pub fn set(&mut self, text: impl Into<String>) {
        self.cancel_text_task();
        self.raw_text = text.into();
        let fit = FitTask::start(self.raw_text.clone(), self.label.as_mut());
        self.text_task = Some(TextTask::Fitting(fit));
    }

    /// 立即显示完整文本
    pub fn finish_instantly(&mut self, text: impl Into<String>) {
        self.cancel_text_task();
        self.sound.stop();
        self.scale_task = None;
        self.transform.set_scale(1.0);
        self.raw_text = text.into();
        self.label.set_text(&self.raw_text);
    }

    fn cancel_text_task(&mut self) {
        if let Some(TextTask::Fitting(fit)) = self.text_task.take() {
            fit.abort(self.label.as_mut());
        }
    }

    // ========== 缩放 ==========

    /// 开始出现动画
    pub fn show(&mut self) {
        self.scale_task = Some(ScaleTask::show(
            self.transform.as_mut(),
            self.settings.show_duration,
        ));
    }

    /// 开始消失动画
    pub fn hide(&mut self) {
        self.scale_task = Some(ScaleTask::hide(
            &*self.transform,
            self.settings.hide_duration,
        ));
    }

    /// 立即隐藏，不播放动画
    pub fn hide_instantly(&mut self) {
        self.scale_task = None;
        self.transform.set_scale(0.0);
        self.transform.set_active(false);
    }

    /// 是否有缩放动画在进行
    pub fn is_scaling(&self) -> bool {
        self.scale_task.is_some()
    }

    /// 是否正在消失
    pub fn is_hiding(&self) -> bool {
        self.scale_task
            .as_ref()
            .is_some_and(|task| task.kind() == ScaleKind::Hide)
    }

    // ========== 帧驱动 ==========

    /// 推进一帧：先缩放，后文本
    ///
    /// 换行完成的那一帧只冻结高度，逐字显示从下一帧开始。
    pub fn tick(&mut self, dt: f32) {
        if let Some(task) = self.scale_task.as_mut()
            && task.tick(dt, self.transform.as_mut()) == TaskStatus::Finished
        {
            self.scale_task = None;
        }

        self.text_task = match self.text_task.take() {
            Some(TextTask::Fitting(mut fit)) => match fit.tick(self.label.as_mut()) {
                FitStatus::Pending => Some(TextTask::Fitting(fit)),
                FitStatus::Complete(result) => {
                    self.target_height = result.height;
                    self.processed_text = result.processed;
                    Some(TextTask::Revealing(RevealTask::new(
                        self.processed_text.clone(),
                        self.settings.reveal,
                        self.label.font_size(),
                    )))
                }
            },
            Some(TextTask::Revealing(mut reveal)) => {
                let sound = &mut self.sound;
                match reveal.tick(dt, self.label.as_mut(), &mut |_| sound.play()) {
                    TaskStatus::Running => Some(TextTask::Revealing(reveal)),
                    TaskStatus::Finished => None,
                }
            }
            None => None,
        };
    }

    // ========== 状态查询 ==========

    /// 是否可见
    pub fn is_active(&self) -> bool {
        self.transform.is_active()
    }

    /// 是否正在逐字显示
    pub fn is_revealing(&self) -> bool {
        matches!(&self.text_task, Some(TextTask::Revealing(reveal)) if reveal.is_revealing())
    }

    /// 是否正在换行计算
    pub fn is_fitting(&self) -> bool {
        matches!(self.text_task, Some(TextTask::Fitting(_)))
    }

    /// 是否有任何任务在进行
    pub fn is_busy(&self) -> bool {
        self.text_task.is_some() || self.scale_task.is_some()
    }

    /// 标签当前渲染的文本
    pub fn rendered_text(&self) -> String {
        self.label.text()
    }

    /// 最近一次设置的原文
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// 换行后的文本
    pub fn processed_text(&self) -> &str {
        &self.processed_text
    }

    /// 冻结后的标签高度
    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    /// 当前缩放
    pub fn scale(&self) -> f32 {
        self.transform.scale()
    }

    /// 状态快照
    pub fn state(&self) -> BubbleState {
        BubbleState {
            active: self.is_active(),
            is_revealing: self.is_revealing(),
            raw_text: self.raw_text.clone(),
            processed_text: self.processed_text.clone(),
            target_height: self.target_height,
            rendered_text: self.rendered_text(),
            scale: self.scale(),
        }
    }
}
