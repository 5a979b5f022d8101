//! # Tween 模块
//!
//! 单个 f32 值的补间。
//!
//! 每帧的顺序固定为：先按已经过的时间采样，再累加本帧时间；
//! 时间用尽后的那一帧直接输出终值，避免停在一个近似值上。

use super::easing::{lerp, smoothstep};

/// 补间实例
///
/// 管理单个 f32 值从 `from` 到 `to` 在 `duration` 秒内的变化，使用平滑阶梯缓动。
#[derive(Debug, Clone)]
pub struct Tween {
    /// 起始值
    pub from: f32,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    elapsed: f32,
    finished: bool,
}

impl Tween {
    /// 创建补间
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            finished: false,
        }
    }

    /// 推进一帧，返回本帧应设置的值
    pub fn step(&mut self, dt: f32) -> f32 {
        if self.finished {
            return self.to;
        }

        if self.elapsed < self.duration {
            let t = self.elapsed / self.duration;
            let value = lerp(self.from, self.to, smoothstep(t));
            self.elapsed += dt;
            value
        } else {
            self.finished = true;
            self.to
        }
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_samples_before_accumulating() {
        let mut tween = Tween::new(0.0, 1.0, 1.0);

        // 第一帧采样 t = 0
        assert_eq!(tween.step(0.5), 0.0);
        assert!(!tween.is_finished());

        // 第二帧采样 t = 0.5
        assert_eq!(tween.step(0.5), 0.5);
        assert!(!tween.is_finished());

        // 时间用尽，输出终值
        assert_eq!(tween.step(0.5), 1.0);
        assert!(tween.is_finished());
        assert_eq!(tween.step(0.5), 1.0);
    }

    #[test]
    fn test_final_value_is_exact() {
        let mut tween = Tween::new(1.0, 0.0, 0.3);
        let mut last = f32::NAN;
        while !tween.is_finished() {
            last = tween.step(1.0 / 60.0);
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let mut tween = Tween::new(0.0, 1.0, 0.0);
        assert_eq!(tween.step(0.016), 1.0);
        assert!(tween.is_finished());
    }
}
