//! # Task 模块
//!
//! 逐帧驱动的任务状态。
//!
//! 所有动画、换行测量和逐字显示都建模为显式状态机：宿主每帧调用一次
//! `tick(dt)`，任务推进一步后返回自己的状态。取消任务就是丢弃它。

/// 任务推进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// 仍在进行，下一帧继续
    Running,
    /// 已完成
    Finished,
}

impl TaskStatus {
    /// 是否已完成
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}
