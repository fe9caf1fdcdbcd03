//! # Sequencer 模块
//!
//! 一次性入场过渡与分组错峰的调度。
//!
//! 每个元素最多一个活跃过渡（[`EffectRun`]）。过渡创建时同步写出起始状态，
//! 延迟结束后按缓动插值到最终状态（不透明、无变换），完成时写出精确的最终值。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::adapter::Surface;
use crate::animation::{EasingFunction, Transform, Tween, TweenState, VisualState};
use crate::config::{EntranceConfig, StaggerConfig};
use crate::declaration::{Direction, EntranceKind};
use crate::document::ElementId;
use crate::event::EngineEvent;

/// 入场过渡参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceParams {
    /// 起始状态
    pub from: VisualState,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub easing: EasingFunction,
}

impl EntranceParams {
    /// 按效果类型生成参数，`duration_ms` / `delay_ms` 为声明中的覆盖值
    pub fn for_kind(
        kind: EntranceKind,
        duration_ms: Option<f64>,
        delay_ms: Option<f64>,
        config: &EntranceConfig,
    ) -> Self {
        let timing = match kind {
            EntranceKind::Fade => config.fade,
            EntranceKind::Slide(_) => config.slide,
            EntranceKind::Scale => config.scale,
        };
        Self {
            from: start_state(kind, config),
            duration_ms: duration_ms.unwrap_or(timing.duration_ms),
            delay_ms: delay_ms.unwrap_or(timing.delay_ms),
            easing: config.easing,
        }
    }

    /// 分组子元素的参数
    pub fn for_stagger_child(index: usize, child_delay_ms: f64, config: &StaggerConfig) -> Self {
        Self {
            from: stagger_start_state(config),
            duration_ms: config.duration_ms,
            delay_ms: index as f64 * child_delay_ms,
            easing: EasingFunction::EaseOut,
        }
    }
}

/// 入场效果的起始状态
pub fn start_state(kind: EntranceKind, config: &EntranceConfig) -> VisualState {
    let offset = config.slide_offset_px;
    let transform = match kind {
        EntranceKind::Fade => Transform::translate_y(config.fade_offset_px),
        EntranceKind::Slide(Direction::Left) => Transform::translate(-offset, 0.0),
        EntranceKind::Slide(Direction::Right) => Transform::translate(offset, 0.0),
        EntranceKind::Slide(Direction::Up) => Transform::translate(0.0, offset),
        EntranceKind::Slide(Direction::Down) => Transform::translate(0.0, -offset),
        EntranceKind::Scale => Transform::scale(config.scale_from),
    };
    VisualState::hidden(transform)
}

/// 分组子元素的起始状态
pub fn stagger_start_state(config: &StaggerConfig) -> VisualState {
    VisualState::hidden(Transform::translate_y(config.offset_px))
}

/// 单个元素的入场过渡
#[derive(Debug, Clone)]
pub struct EffectRun {
    from: VisualState,
    to: VisualState,
    tween: Tween,
}

impl EffectRun {
    fn new(params: &EntranceParams) -> Self {
        Self {
            from: params.from,
            to: VisualState::visible(),
            tween: Tween::new(params.duration_ms)
                .with_delay(params.delay_ms)
                .with_easing(params.easing),
        }
    }

    /// 当前应显示的状态
    pub fn current(&self) -> VisualState {
        self.from.lerp(&self.to, self.tween.progress)
    }

    /// 时间轴状态
    pub fn state(&self) -> TweenState {
        self.tween.state
    }
}

/// 入场过渡调度器
#[derive(Debug, Default)]
pub struct EffectSequencer {
    /// 元素 -> 活跃过渡
    runs: BTreeMap<ElementId, EffectRun>,
    /// 元素 -> 起始状态（持续性入场重置时使用）
    start_states: HashMap<ElementId, VisualState>,
    /// 停留在起始状态、尚未播放的元素
    hidden: BTreeSet<ElementId>,
}

impl EffectSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先写出起始状态，元素在触发前保持隐藏
    pub fn prepare(&mut self, element: ElementId, from: VisualState, surface: &mut Surface) {
        self.start_states.insert(element, from);
        if surface.visual(element, &from) {
            self.hidden.insert(element);
        }
    }

    /// 为分组的所有子元素写出起始状态
    pub fn prepare_stagger_group(
        &mut self,
        children: &[ElementId],
        config: &StaggerConfig,
        surface: &mut Surface,
    ) {
        let from = stagger_start_state(config);
        for &child in children {
            self.prepare(child, from, surface);
        }
    }

    /// 启动一次入场过渡
    ///
    /// 起始状态同步写出；同一元素已有的过渡被替换。元素不存在时什么都不做。
    ///
    /// # 返回
    /// 是否创建了过渡
    pub fn run_one_shot(
        &mut self,
        element: ElementId,
        params: &EntranceParams,
        surface: &mut Surface,
    ) -> bool {
        if !surface.visual(element, &params.from) {
            return false;
        }
        self.start_states.insert(element, params.from);
        self.hidden.remove(&element);
        self.runs.insert(element, EffectRun::new(params));
        debug!(
            element = %element,
            duration_ms = params.duration_ms,
            delay_ms = params.delay_ms,
            "入场过渡已创建"
        );
        true
    }

    /// 启动分组错峰：第 i 个子元素在 `i × child_delay_ms` 后开始
    ///
    /// # 返回
    /// 实际创建的过渡数量
    pub fn run_stagger_group(
        &mut self,
        children: &[ElementId],
        child_delay_ms: f64,
        config: &StaggerConfig,
        surface: &mut Surface,
    ) -> usize {
        children
            .iter()
            .enumerate()
            .filter(|&(index, &child)| {
                let params = EntranceParams::for_stagger_child(index, child_delay_ms, config);
                self.run_one_shot(child, &params, surface)
            })
            .count()
    }

    /// 取消过渡并回到起始状态，下次进入视口时重新播放
    ///
    /// # 返回
    /// 是否写出了起始状态
    pub fn reset(&mut self, element: ElementId, surface: &mut Surface) -> bool {
        self.runs.remove(&element);
        let written = match self.start_states.get(&element) {
            Some(from) => surface.visual(element, from),
            None => false,
        };
        if written {
            self.hidden.insert(element);
        }
        written
    }

    /// 更新所有过渡
    ///
    /// # 返回
    /// 本帧开始与完成的过渡事件
    pub fn update(&mut self, dt: f64, now_ms: f64, surface: &mut Surface) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let mut completed = Vec::new();

        for (&element, run) in &mut self.runs {
            let was_pending = run.tween.state == TweenState::Pending;
            let active = run.tween.update(dt);

            if was_pending && run.tween.state != TweenState::Pending {
                events.push(EngineEvent::TransitionStarted {
                    element,
                    at_ms: now_ms,
                });
            }

            if active {
                if run.tween.is_playing() {
                    surface.visual(element, &run.current());
                }
            } else {
                // 完成时写出精确的最终值
                surface.visual(element, &run.to);
                completed.push(element);
            }
        }

        for element in completed {
            self.runs.remove(&element);
            events.push(EngineEvent::TransitionCompleted {
                element,
                at_ms: now_ms,
            });
        }
        events
    }

    /// 所有过渡直接跳到最终状态
    ///
    /// 尚未播放的元素也直接显示为最终状态，不产生事件。
    pub fn finish_all(&mut self, now_ms: f64, surface: &mut Surface) -> Vec<EngineEvent> {
        let visible = VisualState::visible();
        for element in std::mem::take(&mut self.hidden) {
            surface.visual(element, &visible);
        }

        let mut events = Vec::with_capacity(self.runs.len());
        for (element, mut run) in std::mem::take(&mut self.runs) {
            run.tween.force_complete();
            surface.visual(element, &run.to);
            events.push(EngineEvent::TransitionCompleted {
                element,
                at_ms: now_ms,
            });
        }
        events
    }

    /// 元素是否有正在进行的过渡（包括等待延迟）
    pub fn is_running(&self, element: ElementId) -> bool {
        self.runs.contains_key(&element)
    }

    /// 元素是否停留在起始状态、尚未播放
    pub fn is_hidden(&self, element: ElementId) -> bool {
        self.hidden.contains(&element)
    }

    /// 元素的过渡
    pub fn run(&self, element: ElementId) -> Option<&EffectRun> {
        self.runs.get(&element)
    }

    /// 活跃过渡数量
    pub fn active_count(&self) -> usize {
        self.runs.len()
    }

    pub fn is_idle(&self) -> bool {
        self.runs.is_empty()
    }

    /// 清空所有过渡与记录
    pub fn clear(&mut self) {
        self.runs.clear();
        self.start_states.clear();
        self.hidden.clear();
    }

    /// 停留在起始状态的元素数量
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}
