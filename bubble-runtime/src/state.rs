//! # State 模块
//!
//! 序列器的显式状态：对话游标和当前阶段。
//!
//! ## 状态转换
//!
//! ```text
//! Idle ──advance──► Speaking(A) ──advance──► Speaking(B) ── ... ──advance──► Idle
//!   ▲                                                                        │
//!   └──────────────────────── 游标回到 0，两个气泡都隐藏 ◄────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::script::Speaker;

/// 对话游标：下一句要提交的条目下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueCursor {
    index: usize,
}

impl DialogueCursor {
    /// 从第 0 句开始
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前下标
    pub fn index(&self) -> usize {
        self.index
    }

    /// 前进一句
    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// 回到开头
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// 上一句的下标
    pub fn previous(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }
}

/// 序列器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialoguePhase {
    /// 没有气泡可见
    Idle,
    /// 某个说话者的气泡可见（可能仍在逐字显示）
    Speaking(Speaker),
}

impl DialoguePhase {
    /// 是否空闲
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
