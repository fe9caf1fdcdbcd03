//! # Transform 模块
//!
//! 结构化的变换值，替代字符串拼接的 CSS transform。
//! 只有在交给宿主时才通过 [`Transform::to_css`] 组合为字符串。

use serde::{Deserialize, Serialize};

/// 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// 变换
///
/// 平移（px）、均匀缩放、旋转（度）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// 平移
    pub translate: Vec2,
    /// 缩放因子
    pub scale: f64,
    /// 旋转角度（度）
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Vec2::zero(),
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// 单位变换
    pub fn identity() -> Self {
        Self::default()
    }

    /// 只有平移的变换
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: Vec2::new(x, y),
            ..Self::default()
        }
    }

    /// 只有垂直平移的变换
    pub fn translate_y(y: f64) -> Self {
        Self::translate(0.0, y)
    }

    /// 只有缩放的变换
    pub fn scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// 在当前变换上追加缩放
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// 只有旋转的变换（角度）
    pub fn rotate(degrees: f64) -> Self {
        Self {
            rotation: degrees,
            ..Self::default()
        }
    }

    /// 是否为单位变换
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// 线性插值到另一个变换
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            translate: self.translate.lerp(other.translate, t),
            scale: self.scale + (other.scale - self.scale) * t,
            rotation: self.rotation + (other.rotation - self.rotation) * t,
        }
    }

    /// 组合为 CSS 风格的 transform 字符串
    ///
    /// 单位变换输出 `none`，其余只输出非默认分量。
    pub fn to_css(&self) -> String {
        if self.is_identity() {
            return "none".to_string();
        }

        let mut parts = Vec::new();
        if self.translate != Vec2::zero() {
            parts.push(format!(
                "translate({}px, {}px)",
                normalize(self.translate.x),
                normalize(self.translate.y)
            ));
        }
        if self.scale != 1.0 {
            parts.push(format!("scale({})", normalize(self.scale)));
        }
        if self.rotation != 0.0 {
            parts.push(format!("rotate({}deg)", normalize(self.rotation)));
        }
        parts.join(" ")
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}

// -0.0 + 0.0 == +0.0，避免输出 "-0px"
fn normalize(value: f64) -> f64 {
    value + 0.0
}

/// 可见状态：透明度 + 变换
///
/// 一次入场过渡从起始状态插值到最终状态。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// 透明度 (0.0 - 1.0)
    pub opacity: f64,
    /// 变换
    pub transform: Transform,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::visible()
    }
}

impl VisualState {
    /// 完全可见、无变换（所有入场效果的最终状态）
    pub fn visible() -> Self {
        Self {
            opacity: 1.0,
            transform: Transform::identity(),
        }
    }

    /// 透明且带有起始变换
    pub fn hidden(transform: Transform) -> Self {
        Self {
            opacity: 0.0,
            transform,
        }
    }

    /// 线性插值到另一个状态
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            opacity: self.opacity + (other.opacity - self.opacity) * t,
            transform: self.transform.lerp(&other.transform, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let t = Transform::default();
        assert_eq!(t.translate, Vec2::zero());
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.rotation, 0.0);
        assert!(t.is_identity());
    }

    #[test]
    fn test_transform_lerp() {
        let from = Transform::translate_y(30.0);
        let to = Transform::identity();
        let mid = from.lerp(&to, 0.5);
        assert_eq!(mid.translate.y, 15.0);
        assert_eq!(mid.lerp(&to, 1.0), to);
    }

    #[test]
    fn test_css_rendering() {
        insta::assert_snapshot!(Transform::identity().to_css(), @"none");
        insta::assert_snapshot!(Transform::translate_y(30.0).to_css(), @"translate(0px, 30px)");
        insta::assert_snapshot!(Transform::scale(0.8).to_css(), @"scale(0.8)");
        insta::assert_snapshot!(
            Transform::translate_y(-8.0).with_scale(1.02).to_css(),
            @"translate(0px, -8px) scale(1.02)"
        );
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let t = Transform::translate(-0.0, 5.0);
        assert_eq!(t.to_css(), "translate(0px, 5px)");
    }

    #[test]
    fn test_visual_state_lerp() {
        let start = VisualState::hidden(Transform::scale(0.8));
        let end = VisualState::visible();
        let mid = start.lerp(&end, 0.5);
        assert!((mid.opacity - 0.5).abs() < 1e-12);
        assert!((mid.transform.scale - 0.9).abs() < 1e-12);
    }
}
