//! 滚动视差：纵向偏移 = −(滚动位置 × 速度)。
//!
//! 每次都从绝对滚动位置重新计算，不做累加，重复滚动不会产生漂移。

use crate::animation::Transform;

/// 单个视差元素
#[derive(Debug, Clone)]
pub struct ParallaxRun {
    speed: f64,
    offset: f64,
}

impl ParallaxRun {
    pub fn new(speed: f64) -> Self {
        Self { speed, offset: 0.0 }
    }

    /// 第 `index` 个视差元素的默认速度
    pub fn default_speed(index: usize, speed_step: f64) -> f64 {
        (index + 1) as f64 * speed_step
    }

    /// 滚动到 `position`，返回新的变换
    pub fn scroll_to(&mut self, position: f64) -> Transform {
        let position = if position.is_finite() { position } else { 0.0 };
        self.offset = -(position * self.speed);
        // 消除 -0
        if self.offset == 0.0 {
            self.offset = 0.0;
        }
        Transform::translate_y(self.offset)
    }

    /// 当前偏移（px）
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}
