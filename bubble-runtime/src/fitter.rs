//! # Fitter 模块
//!
//! 预先计算换行位置和固定高度，让逐字显示时文本不会跳行。
//!
//! ## 算法
//!
//! 按单个空格切词，逐词把 `word + " "` 追加到缓冲区并测量其高度。
//! 高度第一次变化的地方就是排版引擎自动换行的位置，在那里插入 `\n`。
//! 最终高度取自换行前对完整原文的一次测量。
//!
//! 测量依赖排版，[`FitTask`] 每次设置文本后都让出一帧，
//! 直到标签报告稳定高度；[`fit_text`] 是同一算法的同步版本。

use crate::surface::{HeightMode, TextLabel};

/// 换行计算结果
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// 插入换行后的文本
    pub processed: String,
    /// 标签最终固定高度
    pub height: f32,
}

/// 逐词累积换行位置
#[derive(Debug, Clone, Default)]
pub struct LineBreaker {
    processed: String,
    line: String,
    current_height: Option<f32>,
}

impl LineBreaker {
    /// 创建空的累积器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个词及缓冲区（含该词）的测量高度
    pub fn push(&mut self, word: &str, measured: f32) {
        match self.current_height {
            None => self.current_height = Some(measured),
            Some(height) if height != measured => {
                self.current_height = Some(measured);
                self.processed.push_str(self.line.trim_end_matches(' '));
                self.processed.push('\n');
                self.line.clear();
            }
            Some(_) => {}
        }
        self.line.push_str(word);
        self.line.push(' ');
    }

    /// 输出剩余内容，得到最终文本
    pub fn finish(mut self) -> String {
        self.processed.push_str(self.line.trim_end_matches(' '));
        self.processed
    }
}

/// 同步换行计算
///
/// `measure` 返回给定文本在自动高度下的排版高度。
pub fn fit_text(raw: &str, mut measure: impl FnMut(&str) -> f32) -> FitResult {
    let height = measure(raw);
    if raw.is_empty() {
        return FitResult {
            processed: String::new(),
            height,
        };
    }

    let mut breaker = LineBreaker::new();
    let mut buffer = String::with_capacity(raw.len() + 1);
    for word in raw.split(' ') {
        buffer.push_str(word);
        buffer.push(' ');
        breaker.push(word, measure(&buffer));
    }

    FitResult {
        processed: breaker.finish(),
        height,
    }
}

/// 换行任务的推进结果
#[derive(Debug, Clone, PartialEq)]
pub enum FitStatus {
    /// 等待排版
    Pending,
    /// 计算完成
    Complete(FitResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitPhase {
    /// 等待完整原文的高度
    MeasuringTotal,
    /// 等待第 `n` 个词的高度
    MeasuringWord(usize),
    /// 已完成
    Done,
}

/// 逐帧驱动的换行任务
///
/// 测量期间标签透明，结束时清空文本、冻结高度并恢复透明度。
#[derive(Debug, Clone)]
pub struct FitTask {
    raw: String,
    words: Vec<String>,
    buffer: String,
    breaker: LineBreaker,
    total_height: f32,
    saved_alpha: f32,
    phase: FitPhase,
}

impl FitTask {
    /// 开始换行计算：隐藏标签，恢复自动高度，写入完整原文
    pub fn start(raw: impl Into<String>, label: &mut dyn TextLabel) -> Self {
        let raw = raw.into();
        let saved_alpha = label.alpha();
        label.set_alpha(0.0);
        label.set_height_mode(HeightMode::Auto);
        label.set_text(&raw);

        let words = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split(' ').map(str::to_owned).collect()
        };

        Self {
            raw,
            words,
            buffer: String::new(),
            breaker: LineBreaker::new(),
            total_height: 0.0,
            saved_alpha,
            phase: FitPhase::MeasuringTotal,
        }
    }

    /// 原文
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 推进一帧
    pub fn tick(&mut self, label: &mut dyn TextLabel) -> FitStatus {
        let index = match self.phase {
            FitPhase::Done => return FitStatus::Pending,
            FitPhase::MeasuringTotal => {
                let Some(height) = label.settled_height() else {
                    return FitStatus::Pending;
                };
                self.total_height = height;
                None
            }
            FitPhase::MeasuringWord(index) => {
                let Some(height) = label.settled_height() else {
                    return FitStatus::Pending;
                };
                self.breaker.push(&self.words[index], height);
                Some(index)
            }
        };

        let next = index.map_or(0, |i| i + 1);
        match self.words.get(next) {
            Some(word) => {
                self.buffer.push_str(word);
                self.buffer.push(' ');
                label.set_text(&self.buffer);
                self.phase = FitPhase::MeasuringWord(next);
                FitStatus::Pending
            }
            None => FitStatus::Complete(self.complete(label)),
        }
    }

    /// 中途取消：恢复透明度，标签保持自动高度
    pub fn abort(self, label: &mut dyn TextLabel) {
        if self.phase != FitPhase::Done {
            label.set_alpha(self.saved_alpha);
        }
    }

    fn complete(&mut self, label: &mut dyn TextLabel) -> FitResult {
        self.phase = FitPhase::Done;
        label.set_text("");
        label.set_height_mode(HeightMode::Fixed(self.total_height));
        label.set_alpha(self.saved_alpha);

        FitResult {
            processed: std::mem::take(&mut self.breaker).finish(),
            height: self.total_height,
        }
    }
}
