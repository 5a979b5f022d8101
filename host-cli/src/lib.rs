//! # Host CLI
//!
//! 两气泡对话系统的终端宿主。
//!
//! 用无头标签（等宽排版）和内存中的缩放状态驱动 `bubble-runtime`，
//! 把逐字显示的结果增量输出到终端。
//!
//! ## 模块结构
//!
//! - [`config`]：配置文件
//! - [`logging`]：日志初始化
//! - [`audio`]：逐字音效后端
//! - [`view`]：终端输出
//! - [`player`]：帧循环

pub mod audio;
pub mod config;
pub mod logging;
pub mod player;
pub mod view;

use std::io::Write;

use bubble_runtime::{
    DialogueSequencer, HeadlessLabel, HeadlessTransform, Script, Speaker, SpeechBubble,
    analyze_script,
};
use tracing::{info, warn};

pub use config::{AppConfig, ConfigError};
pub use player::{PlaybackSummary, Player, PlayerInput};
pub use view::TerminalView;

/// 按配置构建序列器
pub fn build_sequencer(config: &AppConfig, script: Script) -> DialogueSequencer {
    let metrics = config.label.metrics();
    let (voice_a, voice_b) = audio::make_voices(&config.audio);

    let bubble = |speaker: Speaker, voice| {
        SpeechBubble::new(
            speaker,
            Box::new(HeadlessLabel::new(metrics)),
            Box::new(HeadlessTransform::hidden()),
            voice,
            config.bubble,
        )
    };

    DialogueSequencer::new(
        script,
        bubble(Speaker::A, voice_a),
        bubble(Speaker::B, voice_b),
    )
    .with_settings(config.sequencer)
}

/// 按配置构建帧循环
pub fn build_player<W: Write>(config: &AppConfig, script: Script, out: W) -> Player<W> {
    Player::new(
        build_sequencer(config, script),
        TerminalView::new(out),
        config.frame_dt(),
    )
    .with_realtime(config.realtime)
}

/// 输出脚本诊断，返回是否存在错误
pub fn report_diagnostics(script: &Script) -> bool {
    let result = analyze_script(script);
    for diagnostic in &result.diagnostics {
        warn!("{}", diagnostic);
    }
    info!(
        script = %script.name,
        errors = result.error_count(),
        warnings = result.warn_count(),
        "脚本检查完成"
    );
    result.has_errors()
}
