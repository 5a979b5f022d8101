//! # Animation 模块
//!
//! 时间轴动画：缓动函数、单值补间和气泡缩放任务。
//!
//! 动画系统只负责时间轴管理，不假设对象类型：缩放任务通过
//! [`BubbleTransform`](crate::surface::BubbleTransform) 写回结果。
//!
//! ```rust,ignore
//! let mut task = ScaleTask::show(&mut transform, 0.3);
//! while task.tick(dt, &mut transform) == TaskStatus::Running {
//!     // 等待下一帧
//! }
//! ```

mod easing;
mod scale;
mod tween;

pub use easing::{lerp, smoothstep};
pub use scale::{ScaleKind, ScaleTask};
pub use tween::Tween;
