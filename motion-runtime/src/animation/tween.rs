//! # Tween 模块
//!
//! 单次过渡的时间轴状态机。
//!
//! 核心设计：Tween 只关注 0 → 1 进度在时间轴上的变化，不关心被插值的是什么值。
//! 时间单位为毫秒，由调度器在每个 tick 传入经过的时间 `dt`。

use super::EasingFunction;

/// 过渡状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 等待开始（有延迟）
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已暂停
    Paused,
    /// 已完成
    Completed,
}

impl TweenState {
    /// 是否为活跃状态（需要更新）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Playing)
    }
}

/// 时间轴过渡
///
/// 在 `delay` 毫秒之后，用 `duration` 毫秒把进度从 0 推进到 1。
#[derive(Debug, Clone)]
pub struct Tween {
    /// 时长（毫秒）
    pub duration: f64,
    /// 延迟启动（毫秒）
    pub delay: f64,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 当前状态
    pub state: TweenState,
    /// 当前进度（0.0 - 1.0，已应用缓动）
    pub progress: f64,
    /// 已经过的时间（进入 Playing 后从 0 重新计）
    elapsed: f64,
}

impl Tween {
    /// 创建新的过渡
    ///
    /// 非有限或负数的时长与延迟按 0 处理。
    pub fn new(duration: f64) -> Self {
        Self {
            duration: sanitize(duration),
            delay: 0.0,
            easing: EasingFunction::default(),
            state: TweenState::Pending,
            progress: 0.0,
            elapsed: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = sanitize(delay);
        self
    }

    /// 更新过渡
    ///
    /// # 返回
    /// - `true`: 过渡仍在进行中
    /// - `false`: 过渡已结束
    pub fn update(&mut self, dt: f64) -> bool {
        let dt = sanitize(dt);
        match self.state {
            TweenState::Pending => {
                self.elapsed += dt;
                if self.elapsed >= self.delay {
                    self.state = TweenState::Playing;
                    self.elapsed -= self.delay;
                    self.update_playing()
                } else {
                    true
                }
            }
            TweenState::Playing => {
                self.elapsed += dt;
                self.update_playing()
            }
            TweenState::Paused => true,
            TweenState::Completed => false,
        }
    }

    fn update_playing(&mut self) -> bool {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.progress = 1.0;
            self.state = TweenState::Completed;
            return false;
        }
        self.progress = self.easing.apply(self.elapsed / self.duration);
        true
    }

    /// 强制完成
    pub fn force_complete(&mut self) {
        self.progress = 1.0;
        self.state = TweenState::Completed;
    }

    /// 暂停
    pub fn pause(&mut self) {
        if self.state == TweenState::Playing {
            self.state = TweenState::Paused;
        }
    }

    /// 恢复
    pub fn resume(&mut self) {
        if self.state == TweenState::Paused {
            self.state = TweenState::Playing;
        }
    }

    /// 是否正在播放
    pub fn is_playing(&self) -> bool {
        self.state == TweenState::Playing
    }

    /// 是否已完成
    pub fn is_finished(&self) -> bool {
        self.state == TweenState::Completed
    }
}

fn sanitize(ms: f64) -> f64 {
    if ms.is_finite() { ms.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tween() -> Tween {
        Tween::new(1000.0).with_easing(EasingFunction::Linear)
    }

    #[test]
    fn test_tween_creation() {
        let tween = create_test_tween();
        assert_eq!(tween.state, TweenState::Pending);
        assert_eq!(tween.progress, 0.0);
    }

    #[test]
    fn test_tween_update() {
        let mut tween = create_test_tween();

        // 无延迟时第一次更新即进入 Playing
        assert!(tween.update(100.0));
        assert_eq!(tween.state, TweenState::Playing);
        assert!((tween.progress - 0.1).abs() < 1e-12);

        assert!(tween.update(400.0));
        assert!((tween.progress - 0.5).abs() < 1e-12);

        // 完成
        assert!(!tween.update(600.0));
        assert_eq!(tween.state, TweenState::Completed);
        assert_eq!(tween.progress, 1.0);
    }

    #[test]
    fn test_tween_with_delay() {
        let mut tween = create_test_tween().with_delay(500.0);

        // 延迟期间
        assert!(tween.update(300.0));
        assert_eq!(tween.state, TweenState::Pending);

        // 延迟结束，超出部分计入播放时间
        assert!(tween.update(300.0));
        assert_eq!(tween.state, TweenState::Playing);
        assert!((tween.progress - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_pause_freezes_progress() {
        let mut tween = create_test_tween();
        tween.update(250.0);
        tween.pause();
        assert!(tween.update(5000.0));
        assert!((tween.progress - 0.25).abs() < 1e-12);
        tween.resume();
        tween.update(250.0);
        assert!((tween.progress - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_and_invalid_duration() {
        let mut tween = Tween::new(-10.0);
        assert_eq!(tween.duration, 0.0);
        assert!(!tween.update(0.0));
        assert!(tween.is_finished());

        let tween = Tween::new(f64::NAN).with_delay(f64::INFINITY);
        assert_eq!(tween.duration, 0.0);
        assert_eq!(tween.delay, 0.0);
    }
}
