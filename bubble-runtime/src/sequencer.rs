//! # Sequencer 模块
//!
//! 对话序列器：持有两个气泡、脚本和游标，每次 `advance` 推进一步。
//!
//! ## 推进规则
//!
//! 1. 上一次推进的过渡仍在进行：返回 [`AdvanceOutcome::Busy`]，不做任何改变
//! 2. 上一句的气泡仍在逐字显示：立即显示完整文本，游标不动
//! 3. 游标越过末尾：清空并隐藏可见气泡，游标回到 0
//! 4. 否则提交当前句：隐藏对方气泡，显示本方气泡，设置文本，游标前进
//!
//! 过渡被拆成一串步骤。`advance` 同步执行到第一个动画等待点，
//! 之后每次 `tick` 在两个气泡都推进一帧后继续执行。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::bubble::SpeechBubble;
use crate::error::RuntimeError;
use crate::script::{Script, Speaker};
use crate::state::{DialogueCursor, DialoguePhase};

/// 序列器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequencerSettings {
    /// 回到开头时两个气泡同时消失，而不是依次消失
    #[serde(default)]
    pub simultaneous_wrap_hide: bool,
}

/// 一次推进的结果
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// 提交了第 `index` 句
    Committed { index: usize, speaker: Speaker },
    /// 跳过了第 `index` 句的逐字显示
    Skipped { index: usize },
    /// 越过末尾，回到空闲
    Wrapped,
    /// 条目无效，已越过
    InvalidEntry(RuntimeError),
    /// 上一次过渡尚未结束，本次推进被忽略
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    /// 清空文本
    Clear(Speaker),
    /// 开始消失并等待
    Hide(Speaker),
    /// 所有可见气泡同时消失并等待
    HideAll,
    /// 开始出现并等待
    Show(Speaker),
    /// 设置文本
    Set(Speaker, String),
    /// 游标前进
    Commit,
    /// 游标回到开头
    Rewind,
}

#[derive(Debug, Default)]
struct Transition {
    steps: VecDeque<Step>,
    waiting: Vec<Speaker>,
}

impl Transition {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            waiting: Vec::new(),
        }
    }
}

/// 两气泡对话序列器
#[derive(Debug)]
pub struct DialogueSequencer {
    script: Script,
    bubble_a: SpeechBubble,
    bubble_b: SpeechBubble,
    cursor: DialogueCursor,
    transition: Option<Transition>,
    settings: SequencerSettings,
}

impl DialogueSequencer {
    /// 创建序列器，两个气泡都从隐藏状态开始
    pub fn new(script: Script, mut bubble_a: SpeechBubble, mut bubble_b: SpeechBubble) -> Self {
        bubble_a.hide_instantly();
        bubble_b.hide_instantly();
        Self {
            script,
            bubble_a,
            bubble_b,
            cursor: DialogueCursor::new(),
            transition: None,
            settings: SequencerSettings::default(),
        }
    }

    /// 指定配置
    pub fn with_settings(mut self, settings: SequencerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 脚本
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// 游标
    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// 某个说话者的气泡
    pub fn bubble(&self, speaker: Speaker) -> &SpeechBubble {
        match speaker {
            Speaker::A => &self.bubble_a,
            Speaker::B => &self.bubble_b,
        }
    }

    fn bubble_mut(&mut self, speaker: Speaker) -> &mut SpeechBubble {
        match speaker {
            Speaker::A => &mut self.bubble_a,
            Speaker::B => &mut self.bubble_b,
        }
    }

    /// 是否有过渡在进行
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// 是否有任何动画在进行（过渡、换行、逐字显示、缩放）
    pub fn is_animating(&self) -> bool {
        self.is_transitioning() || self.bubble_a.is_busy() || self.bubble_b.is_busy()
    }

    /// 当前阶段
    pub fn phase(&self) -> DialoguePhase {
        let current = self
            .cursor
            .previous()
            .and_then(|index| {
                let entry = self.script.get(index)?;
                entry.speaker.resolve(index).ok()
            })
            .filter(|speaker| self.bubble(*speaker).is_active());

        match current {
            Some(speaker) => DialoguePhase::Speaking(speaker),
            None => [Speaker::A, Speaker::B]
                .into_iter()
                .find(|speaker| self.bubble(*speaker).is_active())
                .map_or(DialoguePhase::Idle, DialoguePhase::Speaking),
        }
    }

    /// 推进一步
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.transition.is_some() {
            return AdvanceOutcome::Busy;
        }

        if let Some(outcome) = self.try_skip() {
            return outcome;
        }

        let index = self.cursor.index();
        let Some(entry) = self.script.get(index) else {
            self.transition = Some(self.wrap_transition());
            self.drive_transition();
            return AdvanceOutcome::Wrapped;
        };
        let text = entry.text.clone();
        let speaker = match entry.speaker.resolve(index) {
            Ok(speaker) => speaker,
            Err(err) => {
                self.cursor.advance();
                return AdvanceOutcome::InvalidEntry(err);
            }
        };

        let mut steps = Vec::with_capacity(4);
        if self.bubble(speaker.other()).is_active() {
            steps.push(Step::Hide(speaker.other()));
        }
        if !self.bubble(speaker).is_active() {
            steps.push(Step::Show(speaker));
        }
        steps.push(Step::Set(speaker, text));
        steps.push(Step::Commit);

        self.transition = Some(Transition::new(steps));
        self.drive_transition();
        AdvanceOutcome::Committed { index, speaker }
    }

    /// 推进一帧：先推进两个气泡，再继续过渡
    pub fn tick(&mut self, dt: f32) {
        self.bubble_a.tick(dt);
        self.bubble_b.tick(dt);
        self.drive_transition();
    }

    fn try_skip(&mut self) -> Option<AdvanceOutcome> {
        let index = self.cursor.previous()?;
        let entry = self.script.get(index)?;
        let speaker = entry.speaker.resolve(index).ok()?;
        if !self.bubble(speaker).is_revealing() {
            return None;
        }

        let text = entry.text.clone();
        self.bubble_mut(speaker).finish_instantly(text);
        Some(AdvanceOutcome::Skipped { index })
    }

    fn wrap_transition(&self) -> Transition {
        let active: Vec<Speaker> = [Speaker::A, Speaker::B]
            .into_iter()
            .filter(|speaker| self.bubble(*speaker).is_active())
            .collect();

        let mut steps = Vec::with_capacity(active.len() * 2 + 2);
        if self.settings.simultaneous_wrap_hide {
            steps.extend(active.iter().map(|speaker| Step::Clear(*speaker)));
            if !active.is_empty() {
                steps.push(Step::HideAll);
            }
        } else {
            for speaker in active {
                steps.push(Step::Clear(speaker));
                steps.push(Step::Hide(speaker));
            }
        }
        steps.push(Step::Rewind);
        Transition::new(steps)
    }

    /// 执行过渡步骤，直到遇到未完成的动画或步骤耗尽
    fn drive_transition(&mut self) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };

        loop {
            transition
                .waiting
                .retain(|speaker| self.bubble(*speaker).is_scaling());
            if !transition.waiting.is_empty() {
                self.transition = Some(transition);
                return;
            }

            let Some(step) = transition.steps.pop_front() else {
                return;
            };

            match step {
                Step::Clear(speaker) => self.bubble_mut(speaker).set(""),
                Step::Hide(speaker) => {
                    self.bubble_mut(speaker).hide();
                    transition.waiting.push(speaker);
                }
                Step::HideAll => {
                    for speaker in [Speaker::A, Speaker::B] {
                        if self.bubble(speaker).is_active() {
                            self.bubble_mut(speaker).hide();
                            transition.waiting.push(speaker);
                        }
                    }
                }
                Step::Show(speaker) => {
                    self.bubble_mut(speaker).show();
                    transition.waiting.push(speaker);
                }
                Step::Set(speaker, text) => self.bubble_mut(speaker).set(text),
                Step::Commit => self.cursor.advance(),
                Step::Rewind => self.cursor.reset(),
            }
        }
    }
}
