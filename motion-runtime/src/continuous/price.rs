//! 价格切换：月付 / 年付切换时在两个价格之间线性过渡，每帧取整显示。

use crate::animation::{EasingFunction, Tween};

/// 价格过渡的推进结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceStep {
    /// 显示文本变化时的新文本
    pub text: Option<String>,
    /// 到达目标时的值
    pub settled: Option<i64>,
}

/// 单个价格元素
#[derive(Debug, Clone)]
pub struct PriceRun {
    monthly: i64,
    yearly: i64,
    /// 当前显示的值
    displayed: i64,
    from: i64,
    to: i64,
    tween: Option<Tween>,
}

impl PriceRun {
    /// 页面初始显示月付价格
    pub fn new(monthly: i64, yearly: i64) -> Self {
        Self {
            monthly,
            yearly,
            displayed: monthly,
            from: monthly,
            to: monthly,
            tween: None,
        }
    }

    /// 切换周期，从当前显示值开始新的过渡
    pub fn toggle(&mut self, yearly: bool, duration_ms: f64) {
        self.from = self.displayed;
        self.to = if yearly { self.yearly } else { self.monthly };
        self.tween = Some(Tween::new(duration_ms).with_easing(EasingFunction::Linear));
    }

    /// 推进 `dt` 毫秒
    pub fn update(&mut self, dt: f64) -> PriceStep {
        let Some(tween) = self.tween.as_mut() else {
            return PriceStep::default();
        };
        let active = tween.update(dt);
        let value = if active {
            // 在 f64 中插值，极端的声明值不会溢出
            let (from, to) = (self.from as f64, self.to as f64);
            (from + (to - from) * tween.progress).round() as i64
        } else {
            self.to
        };

        let mut step = PriceStep::default();
        if value != self.displayed {
            self.displayed = value;
            step.text = Some(value.to_string());
        }
        if !active {
            self.tween = None;
            step.settled = Some(self.to);
        }
        step
    }

    /// 直接跳到目标值
    pub fn finish(&mut self) -> PriceStep {
        if self.tween.take().is_none() {
            return PriceStep::default();
        }
        let changed = self.displayed != self.to;
        self.displayed = self.to;
        PriceStep {
            text: changed.then(|| self.to.to_string()),
            settled: Some(self.to),
        }
    }

    pub fn is_running(&self) -> bool {
        self.tween.is_some()
    }

    /// 当前显示的值
    pub fn displayed(&self) -> i64 {
        self.displayed
    }
}
