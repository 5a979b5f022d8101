//! # Easing 模块
//!
//! 缩放动画使用的插值函数。

/// 平滑阶梯插值 `t²(3−2t)`
///
/// `t` 超出 0.0 - 1.0 会被截断。
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// 线性插值
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
