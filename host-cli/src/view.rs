//! # View 模块
//!
//! 把两个气泡的渲染文本增量输出到终端。
//!
//! 每句对话占一行（自动换行的部分缩进对齐），以说话者开头：
//!
//! ```text
//! A: Hello there
//! B: Hi!
//! ```
//!
//! 逐字显示时只追加新出现的字符；换行测量期间标签不可见，不输出。

use std::io::{self, Write};

use bubble_runtime::{DialogueSequencer, Speaker, strip_markup};

#[derive(Debug, Default)]
struct BubbleLine {
    /// 当前行已经输出的文本
    shown: String,
    /// 是否已输出行首
    open: bool,
}

/// 终端视图
#[derive(Debug)]
pub struct TerminalView<W: Write> {
    out: W,
    lines: [BubbleLine; 2],
}

impl<W: Write> TerminalView<W> {
    /// 创建视图
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: Default::default(),
        }
    }

    /// 取回输出目标
    pub fn into_inner(self) -> W {
        self.out
    }

    /// 输出本帧的变化
    pub fn render(&mut self, sequencer: &DialogueSequencer) -> io::Result<()> {
        for speaker in [Speaker::A, Speaker::B] {
            let bubble = sequencer.bubble(speaker);
            if bubble.is_fitting() {
                continue;
            }
            let text = with_line_breaks(
                strip_markup(&bubble.rendered_text()),
                bubble.processed_text(),
            );
            self.render_bubble(speaker, bubble.is_active(), text)?;
        }
        self.out.flush()
    }

    /// 结束当前未换行的输出
    pub fn finish(&mut self) -> io::Result<()> {
        for line in &mut self.lines {
            if line.open {
                writeln!(self.out)?;
                line.open = false;
            }
        }
        self.out.flush()
    }

    fn render_bubble(&mut self, speaker: Speaker, active: bool, text: String) -> io::Result<()> {
        let line = &mut self.lines[slot(speaker)];

        if !active {
            if line.open {
                writeln!(self.out)?;
                line.open = false;
            }
            line.shown = text;
            return Ok(());
        }

        if text == line.shown {
            return Ok(());
        }

        if line.open && text.starts_with(&line.shown) {
            let suffix = &text[line.shown.len()..];
            write!(self.out, "{}", indent(suffix))?;
            line.shown = text;
            return Ok(());
        }

        if line.open {
            writeln!(self.out)?;
            line.open = false;
        }
        if !text.is_empty() {
            write!(self.out, "{}: {}", speaker, indent(&text))?;
            line.open = true;
        }
        line.shown = text;
        Ok(())
    }
}

fn slot(speaker: Speaker) -> usize {
    match speaker {
        Speaker::A => 0,
        Speaker::B => 1,
    }
}

/// 跳过逐字显示时标签拿到的是原文，按换行结果恢复折行
fn with_line_breaks(text: String, processed: &str) -> String {
    if !text.contains('\n') && processed.contains('\n') && processed.replace('\n', " ") == text {
        processed.to_string()
    } else {
        text
    }
}

/// 自动换行的后续行与行首对齐
fn indent(text: &str) -> String {
    text.replace('\n', "\n   ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_runtime::{
        AdvanceOutcome, BubbleSettings, HeadlessBubble, LabelMetrics, Script, ScriptEntry,
    };

    fn sequencer(entries: Vec<ScriptEntry>, columns: usize) -> DialogueSequencer {
        let metrics = LabelMetrics {
            columns,
            ..LabelMetrics::default()
        };
        DialogueSequencer::new(
            Script::new("view", entries),
            HeadlessBubble::new(metrics).build(Speaker::A, BubbleSettings::default()),
            HeadlessBubble::new(metrics).build(Speaker::B, BubbleSettings::default()),
        )
    }

    fn play(sequencer: &mut DialogueSequencer, view: &mut TerminalView<Vec<u8>>) {
        loop {
            sequencer.tick(1.0 / 60.0);
            view.render(sequencer).unwrap();
            if !sequencer.is_animating() {
                break;
            }
        }
    }

    #[test]
    fn test_lines_are_written_incrementally() {
        let mut s = sequencer(
            vec![
                ScriptEntry::new(Speaker::A, "Hello there"),
                ScriptEntry::new(Speaker::B, "Hi!"),
            ],
            40,
        );
        let mut view = TerminalView::new(Vec::new());

        for _ in 0..3 {
            s.advance();
            play(&mut s, &mut view);
        }
        view.finish().unwrap();

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "A: Hello there\nB: Hi!\n");
    }

    #[test]
    fn test_wrapped_text_is_indented() {
        let mut s = sequencer(vec![ScriptEntry::new(Speaker::A, "aaa bbb ccc")], 8);
        let mut view = TerminalView::new(Vec::new());

        s.advance();
        play(&mut s, &mut view);
        view.finish().unwrap();

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "A: aaa bbb\n   ccc\n");
    }

    #[test]
    fn test_skip_prints_remaining_text() {
        let mut s = sequencer(vec![ScriptEntry::new(Speaker::B, "abcdefgh")], 40);
        let mut view = TerminalView::new(Vec::new());

        s.advance();
        while !s.bubble(Speaker::B).is_revealing() {
            s.tick(1.0 / 60.0);
            view.render(&s).unwrap();
        }
        s.advance();
        view.render(&s).unwrap();
        view.finish().unwrap();

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "B: abcdefgh\n");
    }

    #[test]
    fn test_skip_wrapped_line_continues_in_place() {
        let mut s = sequencer(vec![ScriptEntry::new(Speaker::A, "aaa bbb ccc")], 8);
        let mut view = TerminalView::new(Vec::new());

        s.advance();
        // 逐字显示到第二行
        loop {
            s.tick(1.0 / 60.0);
            view.render(&s).unwrap();
            let bubble = s.bubble(Speaker::A);
            if bubble.is_revealing() && bubble.rendered_text().contains('\n') {
                break;
            }
        }
        assert!(matches!(s.advance(), AdvanceOutcome::Skipped { index: 0 }));
        view.render(&s).unwrap();
        view.finish().unwrap();

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "A: aaa bbb\n   ccc\n");
    }
}
