//! # Player 模块
//!
//! 帧循环：按固定 dt 推进序列器，把推进请求转交给序列器，并记录播放统计。
//!
//! 两种驱动方式：
//! - 自动播放：所有动画结束后等待一段时间自动推进，回到开头后结束
//! - 交互播放：从通道接收推进请求（通常来自读取 stdin 的线程）

use std::io::{self, Write};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use bubble_runtime::{AdvanceOutcome, DialogueSequencer};
use tracing::{debug, error, info};

use crate::view::TerminalView;

/// 交互输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// 推进一步
    Advance,
    /// 退出
    Quit,
}

/// 播放统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackSummary {
    /// 运行的帧数
    pub frames: u64,
    /// 提交的句数
    pub lines_shown: usize,
    /// 跳过逐字显示的次数
    pub skips: usize,
    /// 无效条目数
    pub invalid_entries: usize,
    /// 被忽略的推进次数
    pub ignored: usize,
}

/// 帧循环驱动器
pub struct Player<W: Write> {
    sequencer: DialogueSequencer,
    view: TerminalView<W>,
    dt: f32,
    realtime: bool,
    summary: PlaybackSummary,
}

impl<W: Write> Player<W> {
    /// 创建驱动器
    pub fn new(sequencer: DialogueSequencer, view: TerminalView<W>, dt: f32) -> Self {
        Self {
            sequencer,
            view,
            dt,
            realtime: false,
            summary: PlaybackSummary::default(),
        }
    }

    /// 每帧按真实时间休眠
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// 序列器
    pub fn sequencer(&self) -> &DialogueSequencer {
        &self.sequencer
    }

    /// 当前统计
    pub fn summary(&self) -> PlaybackSummary {
        self.summary
    }

    /// 取回视图
    pub fn into_view(self) -> TerminalView<W> {
        self.view
    }

    /// 推进一步并记录结果
    pub fn advance(&mut self) -> AdvanceOutcome {
        let outcome = self.sequencer.advance();
        debug!(outcome = ?outcome, cursor = self.sequencer.cursor(), "推进");

        match &outcome {
            AdvanceOutcome::Committed { .. } => self.summary.lines_shown += 1,
            AdvanceOutcome::Skipped { .. } => self.summary.skips += 1,
            AdvanceOutcome::InvalidEntry(err) => {
                error!(error = %err, "脚本条目无效，已跳过");
                self.summary.invalid_entries += 1;
            }
            AdvanceOutcome::Busy => self.summary.ignored += 1,
            AdvanceOutcome::Wrapped => {}
        }
        outcome
    }

    /// 运行一帧
    pub fn frame(&mut self) -> io::Result<()> {
        self.sequencer.tick(self.dt);
        self.view.render(&self.sequencer)?;
        self.summary.frames += 1;

        if self.realtime {
            std::thread::sleep(Duration::from_secs_f32(self.dt));
        }
        Ok(())
    }

    /// 自动播放整个脚本，回到开头后结束
    pub fn run_auto(&mut self, delay: f32) -> io::Result<PlaybackSummary> {
        info!(
            script = %self.sequencer.script().name,
            entries = self.sequencer.script().len(),
            "开始自动播放"
        );

        let mut idle = 0.0;
        let mut wrapped = false;
        loop {
            if !self.sequencer.is_animating() {
                if wrapped {
                    break;
                }
                if idle >= delay {
                    wrapped = self.advance() == AdvanceOutcome::Wrapped;
                    idle = 0.0;
                } else {
                    idle += self.dt;
                }
            }
            self.frame()?;
        }

        self.view.finish()?;
        info!(frames = self.summary.frames, lines = self.summary.lines_shown, "播放结束");
        Ok(self.summary)
    }

    /// 交互播放，直到收到退出请求或输入端关闭
    pub fn run_interactive(
        &mut self,
        input: &Receiver<PlayerInput>,
    ) -> io::Result<PlaybackSummary> {
        info!(
            script = %self.sequencer.script().name,
            entries = self.sequencer.script().len(),
            "开始交互播放（回车推进，q 退出）"
        );

        loop {
            match input.try_recv() {
                Ok(PlayerInput::Advance) => {
                    self.advance();
                }
                Ok(PlayerInput::Quit) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }
            self.frame()?;
        }

        self.view.finish()?;
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_runtime::{
        BubbleSettings, HeadlessBubble, LabelMetrics, Script, ScriptEntry, Speaker,
    };
    use std::sync::mpsc;

    fn player(entries: Vec<ScriptEntry>) -> Player<Vec<u8>> {
        let sequencer = DialogueSequencer::new(
            Script::new("player", entries),
            HeadlessBubble::new(LabelMetrics::default())
                .build(Speaker::A, BubbleSettings::default()),
            HeadlessBubble::new(LabelMetrics::default())
                .build(Speaker::B, BubbleSettings::default()),
        );
        Player::new(sequencer, TerminalView::new(Vec::new()), 1.0 / 60.0)
    }

    #[test]
    fn test_auto_plays_whole_script() {
        let mut player = player(vec![
            ScriptEntry::new(Speaker::A, "one"),
            ScriptEntry::new("?", "bad"),
            ScriptEntry::new(Speaker::B, "two"),
        ]);

        let summary = player.run_auto(0.1).unwrap();
        assert_eq!(summary.lines_shown, 2);
        assert_eq!(summary.invalid_entries, 1);
        assert_eq!(summary.skips, 0);
        assert_eq!(player.sequencer().cursor(), 0);

        let out = String::from_utf8(player.into_view().into_inner()).unwrap();
        assert_eq!(out, "A: one\nB: two\n");
    }

    #[test]
    fn test_interactive_busy_and_quit() {
        let mut player = player(vec![ScriptEntry::new(Speaker::A, "a longer line of text")]);
        let (tx, rx) = mpsc::channel();

        // 出现动画期间的推进被忽略
        tx.send(PlayerInput::Advance).unwrap();
        tx.send(PlayerInput::Advance).unwrap();
        tx.send(PlayerInput::Quit).unwrap();

        let summary = player.run_interactive(&rx).unwrap();
        assert_eq!(summary.lines_shown, 1);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.frames, 2);
    }

    #[test]
    fn test_interactive_stops_when_input_closes() {
        let mut player = player(vec![ScriptEntry::new(Speaker::A, "x")]);
        let (tx, rx) = mpsc::channel::<PlayerInput>();
        drop(tx);

        let summary = player.run_interactive(&rx).unwrap();
        assert_eq!(summary.frames, 0);
    }
}
