//! # Shape 模块
//!
//! 边框圆角形状及其关键帧插值，用于形变（morph）效果。

use serde::{Deserialize, Serialize};

use super::easing::ease_in_out;

/// 边框圆角形状
///
/// 四个角的水平半径与垂直半径（百分比），
/// 对应 CSS `border-radius: h1 h2 h3 h4 / v1 v2 v3 v4`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderShape {
    pub horizontal: [f64; 4],
    pub vertical: [f64; 4],
}

impl BorderShape {
    /// 四角统一半径
    pub const fn uniform(percent: f64) -> Self {
        Self {
            horizontal: [percent; 4],
            vertical: [percent; 4],
        }
    }

    pub const fn new(horizontal: [f64; 4], vertical: [f64; 4]) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// 逐角线性插值
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut out = *self;
        for i in 0..4 {
            out.horizontal[i] += (other.horizontal[i] - self.horizontal[i]) * t;
            out.vertical[i] += (other.vertical[i] - self.vertical[i]) * t;
        }
        out
    }

    /// 组合为 CSS 风格的 border-radius 字符串
    pub fn to_css(&self) -> String {
        let h = self.horizontal;
        if h == self.vertical && h.iter().all(|v| *v == h[0]) {
            return format!("{}%", h[0]);
        }
        let join = |radii: &[f64; 4]| {
            radii
                .iter()
                .map(|v| format!("{}%", v))
                .collect::<Vec<_>>()
                .join(" ")
        };
        if h == self.vertical {
            return join(&h);
        }
        format!("{} / {}", join(&h), join(&self.vertical))
    }
}

/// 形变循环的四个关键帧（等间距，首尾相同以便无缝循环）
pub const MORPH_KEYFRAMES: [BorderShape; 4] = [
    BorderShape::uniform(50.0),
    BorderShape::new([30.0, 70.0, 70.0, 30.0], [30.0, 30.0, 70.0, 70.0]),
    BorderShape::new([70.0, 30.0, 30.0, 70.0], [70.0, 70.0, 30.0, 30.0]),
    BorderShape::uniform(50.0),
];

/// 采样形变循环
///
/// `cycle_progress` 为一个周期内的线性进度，整个周期先经过缓入缓出，
/// 再在关键帧之间线性插值。
pub fn sample_morph(cycle_progress: f64) -> BorderShape {
    let eased = ease_in_out(cycle_progress);
    let segments = (MORPH_KEYFRAMES.len() - 1) as f64;
    let scaled = eased * segments;
    let index = (scaled.floor() as usize).min(MORPH_KEYFRAMES.len() - 2);
    let local = scaled - index as f64;
    MORPH_KEYFRAMES[index].lerp(&MORPH_KEYFRAMES[index + 1], local)
}
