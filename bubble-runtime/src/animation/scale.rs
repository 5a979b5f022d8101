//! # Scale 模块
//!
//! 气泡出现/消失的缩放动画。

use super::tween::Tween;
use crate::surface::BubbleTransform;
use crate::task::TaskStatus;

/// 缩放动画的用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    /// 出现：开始前激活并归零
    Show,
    /// 消失：缩放到 0 后才取消激活
    Hide,
    /// 普通缩放，不改变激活状态
    Plain,
}

/// 逐帧驱动的缩放任务
#[derive(Debug, Clone)]
pub struct ScaleTask {
    kind: ScaleKind,
    tween: Tween,
}

impl ScaleTask {
    /// 普通缩放 `from -> to`
    pub fn animate(from: f32, to: f32, duration: f32) -> Self {
        Self {
            kind: ScaleKind::Plain,
            tween: Tween::new(from, to, duration),
        }
    }

    /// 出现动画：激活对象，从 0 放大到 1
    pub fn show(transform: &mut dyn BubbleTransform, duration: f32) -> Self {
        transform.set_active(true);
        transform.set_scale(0.0);
        Self {
            kind: ScaleKind::Show,
            tween: Tween::new(0.0, 1.0, duration),
        }
    }

    /// 消失动画：从当前缩放缩小到 0
    pub fn hide(transform: &dyn BubbleTransform, duration: f32) -> Self {
        Self {
            kind: ScaleKind::Hide,
            tween: Tween::new(transform.scale(), 0.0, duration),
        }
    }

    /// 动画用途
    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// 推进一帧
    pub fn tick(&mut self, dt: f32, transform: &mut dyn BubbleTransform) -> TaskStatus {
        let scale = self.tween.step(dt);
        transform.set_scale(scale);

        if !self.tween.is_finished() {
            return TaskStatus::Running;
        }

        if self.kind == ScaleKind::Hide {
            transform.set_active(false);
        }
        TaskStatus::Finished
    }
}
