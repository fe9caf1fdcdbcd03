//! # Easing 模块
//!
//! 缓动函数库，把线性进度 `t ∈ [0, 1]` 映射为缓动后的进度。
//!
//! 所有函数都是纯函数：输入先被限制到 `[0, 1]`，`f(0) = 0`，`f(1) = 1`，单调不减。

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 缓入（二次，先慢后快）
    EaseIn,
    /// 缓出（二次，先快后慢）
    #[default]
    EaseOut,
    /// 缓入缓出（分段二次）
    EaseInOut,
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    ///
    /// # 返回
    /// - 缓动后的进度值 (0.0 - 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            EasingFunction::Linear => t.clamp(0.0, 1.0),
            EasingFunction::EaseIn => ease_in(t),
            EasingFunction::EaseOut => ease_out(t),
            EasingFunction::EaseInOut => ease_in_out(t),
        }
    }
}

/// 缓入：`t²`
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// 缓出：`t(2 - t)`
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// 缓入缓出
///
/// 前半段 `2t²` 加速，后半段 `-1 + (4 - 2t)t` 减速，两段在 `t = 0.5` 处相接于 0.5。
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}
