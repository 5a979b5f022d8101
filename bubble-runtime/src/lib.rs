//! # Bubble Runtime
//!
//! 两气泡对话系统的核心运行时库。
//!
//! ## 架构概述
//!
//! `bubble-runtime` 不依赖任何渲染或音频引擎，外部能力通过 [`surface`] 中的
//! trait 注入。所有动画都是逐帧驱动的显式状态机：
//!
//! ```text
//! Host                                   Runtime
//!   │                                       │
//!   │──── advance() ───────────────────────►│ 跳过 / 提交 / 回到开头
//!   │◄─── AdvanceOutcome ───────────────────│
//!   │                                       │
//!   │──── tick(dt) ────────────────────────►│ 换行测量 → 逐字显示 → 缩放
//!   │◄─── TextLabel / BubbleTransform / CharacterVoice 回调
//! ```
//!
//! ## 核心类型
//!
//! - [`DialogueSequencer`]：持有两个气泡和脚本，响应 `advance`
//! - [`SpeechBubble`]：单个气泡的换行、逐字显示和缩放
//! - [`Script`]：有序的 `(说话者, 文本)` 条目
//! - [`AdvanceOutcome`]：每次推进的结果
//!
//! ## 使用示例
//!
//! ```ignore
//! use bubble_runtime::{DialogueSequencer, HeadlessBubble, LabelMetrics, Script, Speaker};
//!
//! let a = HeadlessBubble::new(LabelMetrics::default());
//! let b = HeadlessBubble::new(LabelMetrics::default());
//! let mut sequencer = DialogueSequencer::new(
//!     Script::load("intro.json")?,
//!     a.build(Speaker::A, Default::default()),
//!     b.build(Speaker::B, Default::default()),
//! );
//!
//! loop {
//!     if clicked() {
//!         sequencer.advance();
//!     }
//!     sequencer.tick(1.0 / 60.0);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`script`]：脚本数据模型和 JSON 加载
//! - [`diagnostic`]：脚本静态检查
//! - [`fitter`]：预先换行和高度冻结
//! - [`reveal`]：逐字显示
//! - [`sound`]：逐字音效
//! - [`animation`]：缓动和缩放动画
//! - [`bubble`]：对话气泡
//! - [`sequencer`]：对话序列器
//! - [`headless`]：无头外部能力实现

pub mod animation;
pub mod bubble;
pub mod diagnostic;
pub mod error;
pub mod fitter;
pub mod headless;
pub mod reveal;
pub mod script;
pub mod sequencer;
pub mod sound;
pub mod state;
pub mod surface;
pub mod task;

// 重导出核心类型
pub use animation::{ScaleKind, ScaleTask, Tween};
pub use bubble::{BubbleSettings, BubbleState, SpeechBubble};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_script};
pub use error::{RuntimeError, ScriptError};
pub use fitter::{FitResult, FitStatus, FitTask, LineBreaker, fit_text};
pub use headless::{
    HeadlessBubble, HeadlessLabel, HeadlessTransform, LabelMetrics, NullVoice, RecordingVoice,
    VoiceEvent, wrapped_line_count,
};
pub use reveal::{RevealFrame, RevealSettings, RevealStep, RevealTask, strip_markup};
pub use script::{Script, ScriptEntry, Speaker, SpeakerTag};
pub use sequencer::{AdvanceOutcome, DialogueSequencer, SequencerSettings};
pub use sound::{CharacterSound, SoundSettings};
pub use state::{DialogueCursor, DialoguePhase};
pub use surface::{BubbleTransform, CharacterVoice, HeightMode, TextLabel};
pub use task::TaskStatus;
