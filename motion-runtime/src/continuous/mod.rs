//! # Continuous 模块
//!
//! 逐帧推进的持续效果。
//!
//! | 效果 | 触发 | 通道 |
//! |------|------|------|
//! | 计数器 | 一次性可见 | 文本 |
//! | 打字机 | 一次性可见 | 文本 + 光标 |
//! | 形变 | 持续性可见（暂停 / 恢复） | 边框 |
//! | 视差 | 滚动 | 变换 |
//! | 价格 | 价格切换 | 文本 |
//!
//! 所有运行按元素存放在有序表中，同一帧内的写入与事件按元素顺序产生。

mod counter;
mod morph;
mod parallax;
mod price;
mod typewriter;

pub use counter::{CounterPhase, CounterRun, group_thousands};
pub use morph::MorphRun;
pub use parallax::ParallaxRun;
pub use price::{PriceRun, PriceStep};
pub use typewriter::{TypewriterPhase, TypewriterRun, TypewriterStep};

use std::collections::BTreeMap;

use tracing::debug;

use crate::adapter::{BorderStyle, Surface};
use crate::config::EngineConfig;
use crate::document::ElementId;
use crate::event::EngineEvent;

/// 持续效果调度器
#[derive(Debug, Default)]
pub struct ContinuousRunner {
    counters: BTreeMap<ElementId, CounterRun>,
    typewriters: BTreeMap<ElementId, TypewriterRun>,
    morphs: BTreeMap<ElementId, MorphRun>,
    parallax: BTreeMap<ElementId, ParallaxRun>,
    prices: BTreeMap<ElementId, PriceRun>,
}

impl ContinuousRunner {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 注册 ==========

    /// 添加计数器（保持静态文本，直到开始计数）
    pub fn add_counter(&mut self, element: ElementId, target: u64, config: &EngineConfig) {
        self.counters.insert(
            element,
            CounterRun::new(target, config.counter.duration_ms, config.frame_interval_ms),
        );
    }

    /// 添加打字机：捕获文本后清空，并显示闪烁光标
    pub fn add_typewriter(
        &mut self,
        element: ElementId,
        text: &str,
        speed_ms: Option<f64>,
        config: &EngineConfig,
        surface: &mut Surface,
    ) {
        let run = TypewriterRun::new(
            text,
            config.typewriter.initial_wait_ms,
            speed_ms.unwrap_or(config.typewriter.speed_ms),
        );
        if surface.text(element, "") {
            surface.border(element, &BorderStyle::Caret { blinking: true });
        }
        self.typewriters.insert(element, run);
    }

    /// 添加形变循环，`index` 为该元素在所有形变元素中的序号
    pub fn add_morph(
        &mut self,
        element: ElementId,
        index: usize,
        playing: bool,
        config: &EngineConfig,
    ) {
        let cycle_ms = config.morph.base_cycle_ms + config.morph.cycle_step_ms * index as f64;
        self.morphs.insert(element, MorphRun::new(cycle_ms, playing));
    }

    /// 添加视差元素
    pub fn add_parallax(&mut self, element: ElementId, speed: f64) {
        self.parallax.insert(element, ParallaxRun::new(speed));
    }

    /// 添加价格元素
    pub fn add_price(&mut self, element: ElementId, monthly: i64, yearly: i64) {
        self.prices.insert(element, PriceRun::new(monthly, yearly));
    }

    // ========== 外部驱动 ==========

    /// 开始计数
    pub fn start_counter(&mut self, element: ElementId) {
        if let Some(counter) = self.counters.get_mut(&element) {
            debug!(element = %element, target = counter.target(), "计数器开始");
            counter.start();
        }
    }

    /// 开始打字
    pub fn start_typewriter(&mut self, element: ElementId) {
        if let Some(run) = self.typewriters.get_mut(&element) {
            debug!(element = %element, "打字机开始等待");
            run.start();
        }
    }

    /// 形变元素可见性变化：可见时恢复，不可见时暂停
    pub fn set_morph_visible(&mut self, element: ElementId, visible: bool) -> Option<EngineEvent> {
        let morph = self.morphs.get_mut(&element)?;
        let progress = morph.progress();
        if visible {
            morph
                .resume()
                .then_some(EngineEvent::MorphResumed { element, progress })
        } else {
            morph
                .pause()
                .then_some(EngineEvent::MorphPaused { element, progress })
        }
    }

    /// 页面滚动：所有视差元素按绝对位置重新计算
    pub fn scroll(&mut self, position: f64, surface: &mut Surface) {
        for (&element, run) in &mut self.parallax {
            let transform = run.scroll_to(position);
            surface.transform(element, &transform);
        }
    }

    /// 价格周期切换
    pub fn toggle_price(&mut self, yearly: bool, config: &EngineConfig) {
        for run in self.prices.values_mut() {
            run.toggle(yearly, config.price.duration_ms);
        }
    }

    /// 推进一帧
    pub fn update(&mut self, dt: f64, surface: &mut Surface) -> Vec<EngineEvent> {
        let mut events = Vec::new();

        for (&element, counter) in &mut self.counters {
            if let Some(text) = counter.step() {
                surface.text(element, &text);
                if counter.phase() == CounterPhase::Done {
                    events.push(EngineEvent::CounterFinished {
                        element,
                        value: counter.target(),
                    });
                }
            }
        }

        for (&element, run) in &mut self.typewriters {
            let step = run.update(dt);
            apply_typewriter_step(element, &step, surface, &mut events);
        }

        for (&element, morph) in &mut self.morphs {
            if let Some(shape) = morph.update(dt) {
                surface.border(element, &BorderStyle::Radius { shape });
            }
        }

        for (&element, run) in &mut self.prices {
            let step = run.update(dt);
            apply_price_step(element, &step, surface, &mut events);
        }

        events
    }

    /// 一次性效果直接跳到最终状态，形变、视差与价格运行被停止
    pub fn finish_all(&mut self, surface: &mut Surface) -> Vec<EngineEvent> {
        let mut events = Vec::new();

        for (element, mut counter) in std::mem::take(&mut self.counters) {
            if counter.phase() == CounterPhase::Done {
                continue;
            }
            if let Some(text) = counter.finish() {
                surface.text(element, &text);
            }
            events.push(EngineEvent::CounterFinished {
                element,
                value: counter.target(),
            });
        }

        for (element, mut run) in std::mem::take(&mut self.typewriters) {
            let step = run.finish();
            apply_typewriter_step(element, &step, surface, &mut events);
        }

        for (element, mut run) in std::mem::take(&mut self.prices) {
            let step = run.finish();
            apply_price_step(element, &step, surface, &mut events);
        }

        self.morphs.clear();
        self.parallax.clear();
        events
    }

    // ========== 查询 ==========

    /// 是否没有任何需要逐帧推进的工作
    ///
    /// 暂停的形变与静止的视差不算作工作。
    pub fn is_idle(&self) -> bool {
        self.counters
            .values()
            .all(|c| c.phase() != CounterPhase::Running)
            && self.typewriters.values().all(|t| {
                !matches!(
                    t.phase(),
                    TypewriterPhase::Waiting | TypewriterPhase::Typing
                )
            })
            && self.morphs.values().all(|m| !m.is_playing())
            && self.prices.values().all(|p| !p.is_running())
    }

    pub fn counter_phase(&self, element: ElementId) -> Option<CounterPhase> {
        self.counters.get(&element).map(CounterRun::phase)
    }

    pub fn typewriter_phase(&self, element: ElementId) -> Option<TypewriterPhase> {
        self.typewriters.get(&element).map(TypewriterRun::phase)
    }

    /// 形变循环的当前进度
    pub fn morph_progress(&self, element: ElementId) -> Option<f64> {
        self.morphs.get(&element).map(MorphRun::progress)
    }

    pub fn morph_playing(&self, element: ElementId) -> Option<bool> {
        self.morphs.get(&element).map(MorphRun::is_playing)
    }

    /// 视差元素的当前偏移
    pub fn parallax_offset(&self, element: ElementId) -> Option<f64> {
        self.parallax.get(&element).map(ParallaxRun::offset)
    }

    /// 价格元素当前显示的值
    pub fn price_value(&self, element: ElementId) -> Option<i64> {
        self.prices.get(&element).map(PriceRun::displayed)
    }

    /// 清空所有运行（不写入任何样式）
    pub fn clear(&mut self) {
        self.counters.clear();
        self.typewriters.clear();
        self.morphs.clear();
        self.parallax.clear();
        self.prices.clear();
    }
}

fn apply_typewriter_step(
    element: ElementId,
    step: &TypewriterStep,
    surface: &mut Surface,
    events: &mut Vec<EngineEvent>,
) {
    if let Some(text) = &step.text {
        surface.text(element, text);
    }
    if step.caret_removed {
        surface.border(element, &BorderStyle::None);
        events.push(EngineEvent::TypewriterFinished { element });
    }
}

fn apply_price_step(
    element: ElementId,
    step: &PriceStep,
    surface: &mut Surface,
    events: &mut Vec<EngineEvent>,
) {
    if let Some(text) = &step.text {
        surface.text(element, text);
    }
    if let Some(value) = step.settled {
        events.push(EngineEvent::PriceSettled { element, value });
    }
}
