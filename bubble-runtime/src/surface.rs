//! # Surface 模块
//!
//! 气泡依赖的外部能力接口：文本排版、可见性/缩放、音效播放。
//!
//! Runtime 只通过这些 trait 访问宿主，不假设任何渲染或音频后端。
//! 无头实现见 [`crate::headless`]。

/// 标签高度模式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightMode {
    /// 高度随内容自动变化
    Auto,
    /// 固定高度
    Fixed(f32),
}

/// 文本标签（排版引擎）
///
/// 排版是异步的：`set_text` 之后需要经过一次排版，`settled_height`
/// 才会返回有效值。在那之前返回 `None`，调用方应当让出一帧后重试。
pub trait TextLabel {
    /// 设置文本（可能包含 `<size=N>` 标记）
    fn set_text(&mut self, text: &str);

    /// 当前渲染的文本
    fn text(&self) -> String;

    /// 排版稳定后的高度
    fn settled_height(&self) -> Option<f32>;

    /// 设置高度模式
    fn set_height_mode(&mut self, mode: HeightMode);

    /// 字号（逐字动画的目标大小）
    fn font_size(&self) -> f32;

    /// 当前透明度
    fn alpha(&self) -> f32;

    /// 设置透明度
    fn set_alpha(&mut self, alpha: f32);
}

/// 气泡的可见性与缩放
pub trait BubbleTransform {
    /// 激活/隐藏对象
    fn set_active(&mut self, active: bool);

    /// 是否处于激活状态
    fn is_active(&self) -> bool;

    /// 当前统一缩放
    fn scale(&self) -> f32;

    /// 设置统一缩放
    fn set_scale(&mut self, scale: f32);
}

/// 单声道音效播放器
///
/// 每个气泡只有一个声道，新的音效会打断正在播放的音效。
pub trait CharacterVoice {
    /// 以指定音调和音量播放一次音效
    fn play_one_shot(&mut self, pitch: f32, volume: f32);

    /// 是否正在播放
    fn is_playing(&self) -> bool;

    /// 停止播放
    fn stop(&mut self);
}
