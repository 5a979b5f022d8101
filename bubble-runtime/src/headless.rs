//! # Headless 模块
//!
//! 不依赖渲染/音频设备的外部能力实现，用于测试和终端宿主。
//!
//! 所有类型都是共享句柄（`Rc<RefCell<_>>`）：克隆一份交给气泡，
//! 自己保留一份用于观察。

use std::cell::RefCell;
use std::rc::Rc;

use crate::bubble::{BubbleSettings, SpeechBubble};
use crate::reveal::strip_markup;
use crate::script::Speaker;
use crate::surface::{BubbleTransform, CharacterVoice, HeightMode, TextLabel};

/// 等宽排版参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    /// 每行可容纳的字符数
    pub columns: usize,
    /// 行高
    pub line_height: f32,
    /// 字号
    pub font_size: f32,
    /// `set_text` 后需要多少次读取才能得到稳定高度
    pub settle_frames: usize,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            columns: 32,
            line_height: 20.0,
            font_size: 24.0,
            settle_frames: 0,
        }
    }
}

/// 按等宽字符自动换行后的行数
///
/// 显式 `\n` 总是换行；超过一行宽度的单词会被硬拆。空文本占一行。
pub fn wrapped_line_count(text: &str, columns: usize) -> usize {
    let columns = columns.max(1);

    text.split('\n')
        .map(|paragraph| {
            let mut lines = 1;
            let mut width = 0;
            for word in paragraph.trim_end_matches(' ').split(' ') {
                let len = word.chars().count();
                let needed = if width == 0 { len } else { width + 1 + len };
                if needed <= columns {
                    width = needed;
                    continue;
                }
                if width > 0 {
                    lines += 1;
                }
                width = len;
                while width > columns {
                    lines += 1;
                    width -= columns;
                }
            }
            lines
        })
        .sum()
}

#[derive(Debug)]
struct LabelData {
    text: String,
    height_mode: HeightMode,
    alpha: f32,
    pending_reads: usize,
}

/// 等宽排版的文本标签
#[derive(Debug, Clone)]
pub struct HeadlessLabel {
    metrics: LabelMetrics,
    data: Rc<RefCell<LabelData>>,
}

impl HeadlessLabel {
    /// 创建标签
    pub fn new(metrics: LabelMetrics) -> Self {
        Self {
            metrics,
            data: Rc::new(RefCell::new(LabelData {
                text: String::new(),
                height_mode: HeightMode::Auto,
                alpha: 1.0,
                pending_reads: 0,
            })),
        }
    }

    /// 排版参数
    pub fn metrics(&self) -> LabelMetrics {
        self.metrics
    }

    /// 按当前参数测量文本高度（忽略 `<size>` 标记）
    pub fn measure(&self, text: &str) -> f32 {
        let lines = wrapped_line_count(&strip_markup(text), self.metrics.columns);
        lines as f32 * self.metrics.line_height
    }

    /// 去掉标记后的渲染文本
    pub fn plain_text(&self) -> String {
        strip_markup(&self.data.borrow().text)
    }

    /// 当前高度模式
    pub fn height_mode(&self) -> HeightMode {
        self.data.borrow().height_mode
    }

    /// 当前显示高度
    pub fn height(&self) -> f32 {
        let data = self.data.borrow();
        match data.height_mode {
            HeightMode::Fixed(height) => height,
            HeightMode::Auto => self.measure(&data.text),
        }
    }
}

impl TextLabel for HeadlessLabel {
    fn set_text(&mut self, text: &str) {
        let mut data = self.data.borrow_mut();
        data.text.clear();
        data.text.push_str(text);
        data.pending_reads = self.metrics.settle_frames;
    }

    fn text(&self) -> String {
        self.data.borrow().text.clone()
    }

    fn settled_height(&self) -> Option<f32> {
        {
            let mut data = self.data.borrow_mut();
            if data.pending_reads > 0 {
                data.pending_reads -= 1;
                return None;
            }
        }
        Some(self.height())
    }

    fn set_height_mode(&mut self, mode: HeightMode) {
        self.data.borrow_mut().height_mode = mode;
    }

    fn font_size(&self) -> f32 {
        self.metrics.font_size
    }

    fn alpha(&self) -> f32 {
        self.data.borrow().alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.data.borrow_mut().alpha = alpha;
    }
}

#[derive(Debug)]
struct TransformData {
    active: bool,
    scale: f32,
}

/// 内存中的可见性/缩放状态
#[derive(Debug, Clone)]
pub struct HeadlessTransform {
    data: Rc<RefCell<TransformData>>,
}

impl HeadlessTransform {
    fn with_state(active: bool, scale: f32) -> Self {
        Self {
            data: Rc::new(RefCell::new(TransformData { active, scale })),
        }
    }

    /// 隐藏且缩放为 0
    pub fn hidden() -> Self {
        Self::with_state(false, 0.0)
    }

    /// 可见且缩放为 1
    pub fn visible() -> Self {
        Self::with_state(true, 1.0)
    }
}

impl BubbleTransform for HeadlessTransform {
    fn set_active(&mut self, active: bool) {
        self.data.borrow_mut().active = active;
    }

    fn is_active(&self) -> bool {
        self.data.borrow().active
    }

    fn scale(&self) -> f32 {
        self.data.borrow().scale
    }

    fn set_scale(&mut self, scale: f32) {
        self.data.borrow_mut().scale = scale;
    }
}

/// 音效事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceEvent {
    /// 播放
    Play { pitch: f32, volume: f32 },
    /// 停止
    Stop,
}

#[derive(Debug, Default)]
struct VoiceLog {
    events: Vec<VoiceEvent>,
    playing: bool,
}

/// 记录所有播放/停止事件的音效播放器
///
/// 播放后一直处于 "正在播放" 状态，直到被停止或调用 [`RecordingVoice::finish_clip`]。
#[derive(Debug, Clone, Default)]
pub struct RecordingVoice {
    log: Rc<RefCell<VoiceLog>>,
}

impl RecordingVoice {
    /// 创建播放器
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有事件
    pub fn events(&self) -> Vec<VoiceEvent> {
        self.log.borrow().events.clone()
    }

    /// 播放次数
    pub fn play_count(&self) -> usize {
        self.log
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, VoiceEvent::Play { .. }))
            .count()
    }

    /// 停止次数
    pub fn stop_count(&self) -> usize {
        self.log
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, VoiceEvent::Stop))
            .count()
    }

    /// 模拟音效自然播放结束
    pub fn finish_clip(&self) {
        self.log.borrow_mut().playing = false;
    }
}

impl CharacterVoice for RecordingVoice {
    fn play_one_shot(&mut self, pitch: f32, volume: f32) {
        let mut log = self.log.borrow_mut();
        log.events.push(VoiceEvent::Play { pitch, volume });
        log.playing = true;
    }

    fn is_playing(&self) -> bool {
        self.log.borrow().playing
    }

    fn stop(&mut self) {
        let mut log = self.log.borrow_mut();
        log.events.push(VoiceEvent::Stop);
        log.playing = false;
    }
}

/// 静音播放器
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVoice;

impl CharacterVoice for NullVoice {
    fn play_one_shot(&mut self, _pitch: f32, _volume: f32) {}

    fn is_playing(&self) -> bool {
        false
    }

    fn stop(&mut self) {}
}

/// 一组无头外部能力，外加用于观察的句柄
#[derive(Debug, Clone)]
pub struct HeadlessBubble {
    pub label: HeadlessLabel,
    pub transform: HeadlessTransform,
    pub voice: RecordingVoice,
}

impl HeadlessBubble {
    /// 创建一组隐藏状态的外部能力
    pub fn new(metrics: LabelMetrics) -> Self {
        Self {
            label: HeadlessLabel::new(metrics),
            transform: HeadlessTransform::hidden(),
            voice: RecordingVoice::new(),
        }
    }

    /// 用共享句柄构建气泡（音调种子固定）
    pub fn build(&self, speaker: Speaker, settings: BubbleSettings) -> SpeechBubble {
        SpeechBubble::new(
            speaker,
            Box::new(self.label.clone()),
            Box::new(self.transform.clone()),
            Box::new(self.voice.clone()),
            settings,
        )
        .with_sound_seed(0)
    }
}
