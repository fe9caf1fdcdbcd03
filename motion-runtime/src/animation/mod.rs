//! # Animation 模块
//!
//! 与宿主无关的动画基础设施。
//!
//! ## 核心概念
//!
//! - `EasingFunction`: 缓动函数
//! - `Tween`: 单次过渡的时间轴状态机
//! - `Transform` / `VisualState`: 结构化的变换与可见状态
//! - `BorderShape`: 形变效果使用的圆角形状

mod easing;
mod shape;
mod transform;
mod tween;

pub use easing::{EasingFunction, ease_in, ease_in_out, ease_out};
pub use shape::{BorderShape, MORPH_KEYFRAMES, sample_morph};
pub use transform::{Transform, Vec2, VisualState};
pub use tween::{Tween, TweenState};
