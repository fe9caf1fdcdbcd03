//! 形变循环：无限循环的圆角形状动画，离开视口时暂停。

use crate::animation::{BorderShape, sample_morph};

/// 单个形变循环
///
/// 暂停只冻结已经过的时间，恢复后从同一进度继续。
#[derive(Debug, Clone)]
pub struct MorphRun {
    cycle_ms: f64,
    /// 当前周期内已经过的时间
    elapsed_ms: f64,
    playing: bool,
}

impl MorphRun {
    /// 创建形变循环，`playing` 为初始是否播放
    pub fn new(cycle_ms: f64, playing: bool) -> Self {
        Self {
            cycle_ms: if cycle_ms.is_finite() && cycle_ms > 0.0 {
                cycle_ms
            } else {
                1.0
            },
            elapsed_ms: 0.0,
            playing,
        }
    }

    /// 推进 `dt` 毫秒
    ///
    /// # 返回
    /// 播放中时返回当前形状
    pub fn update(&mut self, dt: f64) -> Option<BorderShape> {
        if !self.playing {
            return None;
        }
        self.elapsed_ms = (self.elapsed_ms + dt.max(0.0)) % self.cycle_ms;
        Some(self.shape())
    }

    /// 暂停
    ///
    /// # 返回
    /// 状态是否发生变化
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.playing, false)
    }

    /// 恢复
    ///
    /// # 返回
    /// 状态是否发生变化
    pub fn resume(&mut self) -> bool {
        !std::mem::replace(&mut self.playing, true)
    }

    /// 当前周期内的线性进度 (0.0 - 1.0)
    pub fn progress(&self) -> f64 {
        self.elapsed_ms / self.cycle_ms
    }

    /// 当前形状
    pub fn shape(&self) -> BorderShape {
        sample_morph(self.progress())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn cycle_ms(&self) -> f64 {
        self.cycle_ms
    }
}
