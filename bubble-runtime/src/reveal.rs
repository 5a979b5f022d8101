//! # Reveal 模块
//!
//! 逐字显示：每个字符从 `start_size` 放大到目标字号，放大完成后才进入下一个字符。
//!
//! 渲染文本形如 `已显示前缀 + <size=N>当前字符</size>`，尚未显示的部分不输出。
//! 结束时标签被设置为完整的处理后文本，不残留任何 `<size>` 标记。

use serde::{Deserialize, Serialize};

use crate::surface::TextLabel;
use crate::task::TaskStatus;

/// 逐字显示参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealSettings {
    /// 字符起始字号
    #[serde(default = "default_start_size")]
    pub start_size: f32,
    /// 字号增长速度（字号/秒）
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f32,
}

fn default_start_size() -> f32 {
    1.0
}

fn default_growth_rate() -> f32 {
    1000.0
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            start_size: default_start_size(),
            growth_rate: default_growth_rate(),
        }
    }
}

/// 去掉 `<size=N>` / `</size>` 标记
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let tag_len = if tail.starts_with("</size>") {
            Some("</size>".len())
        } else if tail.starts_with("<size=") {
            tail.find('>').map(|end| end + 1)
        } else {
            None
        };

        match tag_len {
            Some(len) => rest = &tail[len..],
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// 某一帧的显示状态
#[derive(Debug, Clone, PartialEq)]
pub struct RevealFrame {
    /// 已完整显示的前缀
    pub prefix: String,
    /// 正在放大的字符及其字号
    pub current: Option<(char, f32)>,
}

impl RevealFrame {
    /// 渲染为带 `<size>` 标记的文本
    pub fn markup(&self) -> String {
        match self.current {
            Some((c, size)) => format!("{}<size={}>{}</size>", self.prefix, size, c),
            None => self.prefix.clone(),
        }
    }
}

/// 单步推进结果
#[derive(Debug, Clone, PartialEq)]
pub enum RevealStep {
    /// 新的一帧
    Frame(String),
    /// 刚刚结束，附带最终文本
    Finished(String),
    /// 已经结束
    Idle,
}

/// 逐帧驱动的逐字显示任务
#[derive(Debug, Clone)]
pub struct RevealTask {
    processed: String,
    chars: Vec<char>,
    settings: RevealSettings,
    target_size: f32,
    index: usize,
    current: Option<(char, f32)>,
    prefix: String,
    revealing: bool,
    finished: bool,
}

impl RevealTask {
    /// 创建任务，`target_size` 通常是标签字号
    pub fn new(processed: impl Into<String>, settings: RevealSettings, target_size: f32) -> Self {
        let processed = processed.into();
        Self {
            chars: processed.chars().collect(),
            processed,
            settings,
            target_size,
            index: 0,
            current: None,
            prefix: String::new(),
            revealing: false,
            finished: false,
        }
    }

    /// 是否正在显示
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 完整的处理后文本
    pub fn processed(&self) -> &str {
        &self.processed
    }

    /// 当前显示状态
    pub fn frame(&self) -> RevealFrame {
        RevealFrame {
            prefix: self.prefix.clone(),
            current: self.current,
        }
    }

    /// 推进一帧，不涉及标签
    ///
    /// 每个非空白字符开始放大时调用一次 `on_audible`。
    pub fn advance(&mut self, dt: f32, on_audible: &mut dyn FnMut(char)) -> RevealStep {
        if self.finished {
            return RevealStep::Idle;
        }

        loop {
            let Some((c, size)) = self.current else {
                match self.chars.get(self.index) {
                    Some(&c) => {
                        self.revealing = true;
                        if !c.is_whitespace() {
                            on_audible(c);
                        }
                        self.current = Some((c, self.settings.start_size));
                        continue;
                    }
                    None => {
                        self.revealing = false;
                        self.finished = true;
                        return RevealStep::Finished(self.processed.clone());
                    }
                }
            };

            if size < self.target_size {
                let grown = (size + (dt * self.settings.growth_rate).floor()).min(self.target_size);
                self.current = Some((c, grown));
                return RevealStep::Frame(self.frame().markup());
            }

            self.prefix.push(c);
            self.index += 1;
            self.current = None;
        }
    }

    /// 推进一帧并渲染到标签
    pub fn tick(
        &mut self,
        dt: f32,
        label: &mut dyn TextLabel,
        on_audible: &mut dyn FnMut(char),
    ) -> TaskStatus {
        match self.advance(dt, on_audible) {
            RevealStep::Frame(markup) => {
                label.set_text(&markup);
                TaskStatus::Running
            }
            RevealStep::Finished(text) => {
                label.set_text(&text);
                TaskStatus::Finished
            }
            RevealStep::Idle => TaskStatus::Finished,
        }
    }

    /// 以固定帧间隔惰性产出每一帧的渲染文本
    ///
    /// 最后一项是完整的处理后文本。`dt * growth_rate < 1` 时字号不会增长，迭代不会结束。
    pub fn frames(self, dt: f32) -> RevealFrames {
        RevealFrames { task: self, dt }
    }
}

/// 逐帧渲染文本的迭代器
#[derive(Debug, Clone)]
pub struct RevealFrames {
    task: RevealTask,
    dt: f32,
}

impl Iterator for RevealFrames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.task.advance(self.dt, &mut |_| {}) {
            RevealStep::Frame(markup) | RevealStep::Finished(markup) => Some(markup),
            RevealStep::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessLabel, LabelMetrics};

    fn slow() -> RevealSettings {
        RevealSettings {
            start_size: 1.0,
            growth_rate: 1.0,
        }
    }

    #[test]
    fn test_frames_grow_each_character() {
        let frames: Vec<String> = RevealTask::new("Hi", slow(), 3.0).frames(1.0).collect();
        insta::assert_debug_snapshot!(frames, @r#"
        [
            "<size=2>H</size>",
            "<size=3>H</size>",
            "H<size=2>i</size>",
            "H<size=3>i</size>",
            "Hi",
        ]
        "#);
    }

    #[test]
    fn test_growth_is_floored_and_clamped() {
        let settings = RevealSettings {
            start_size: 1.0,
            growth_rate: 21.0,
        };
        // 0.5 * 21 = 10.5，每帧只增长 10，第三帧截断到 24
        let frames: Vec<String> = RevealTask::new("x", settings, 24.0).frames(0.5).collect();
        assert_eq!(
            frames,
            vec!["<size=11>x</size>", "<size=21>x</size>", "<size=24>x</size>", "x"]
        );
    }

    #[test]
    fn test_sound_only_for_visible_characters() {
        let mut task = RevealTask::new("a b\nc", slow(), 2.0);
        let mut heard = Vec::new();
        while task.advance(1.0, &mut |c| heard.push(c)) != RevealStep::Idle {}
        assert_eq!(heard, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_unicode_scalar_iteration() {
        let frames: Vec<String> = RevealTask::new("你好", slow(), 2.0).frames(1.0).collect();
        assert_eq!(
            frames,
            vec!["<size=2>你</size>", "你<size=2>好</size>", "你好"]
        );
    }

    #[test]
    fn test_start_size_at_target_skips_growth() {
        let settings = RevealSettings {
            start_size: 24.0,
            growth_rate: 1.0,
        };
        let frames: Vec<String> = RevealTask::new("abc", settings, 24.0).frames(1.0).collect();
        assert_eq!(frames, vec!["abc"]);
    }

    #[test]
    fn test_tick_renders_and_flags() {
        let mut label = HeadlessLabel::new(LabelMetrics::default());
        let mut task = RevealTask::new("ok", slow(), 2.0);
        assert!(!task.is_revealing());

        assert_eq!(task.tick(1.0, &mut label, &mut |_| {}), TaskStatus::Running);
        assert!(task.is_revealing());
        assert_eq!(label.text(), "<size=2>o</size>");

        while task.tick(1.0, &mut label, &mut |_| {}) == TaskStatus::Running {}
        assert!(!task.is_revealing());
        assert!(task.is_finished());
        assert_eq!(label.text(), "ok");
    }

    #[test]
    fn test_empty_text_finishes_immediately() {
        let mut label = HeadlessLabel::new(LabelMetrics::default());
        label.set_text("stale");
        let mut task = RevealTask::new("", slow(), 2.0);
        assert_eq!(task.tick(1.0, &mut label, &mut |_| {}), TaskStatus::Finished);
        assert_eq!(label.text(), "");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("ab<size=12.5>c</size>"), "abc");
        assert_eq!(strip_markup("a < b"), "a < b");
        assert_eq!(strip_markup("<b>x</b>"), "<b>x</b>");
    }
}
