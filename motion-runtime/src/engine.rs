//! # Engine 模块
//!
//! 动效引擎：持有所有注册表与运行状态的唯一实例。
//!
//! ## 执行模型
//!
//! ```text
//! scan(document)        -> ScanReport
//! handle(EngineInput)   -> Vec<EngineEvent>
//! shutdown()            -> Vec<EngineEvent>
//! ```
//!
//! 1. `scan` 解析声明，为每个效果注册触发器并写出起始状态
//! 2. 宿主把可见性、帧、滚动、价格与指针变化作为输入送入 `handle`
//! 3. 可见性触发创建过渡或启动持续效果，`Tick` 推进所有运行
//! 4. 所有可见变化通过 `StyleAdapter` 同步写出，`handle` 返回本次产生的事件

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::adapter::{StyleAdapter, Surface};
use crate::config::EngineConfig;
use crate::continuous::{ContinuousRunner, CounterPhase, ParallaxRun, TypewriterPhase};
use crate::declaration::{ChannelClaims, Effect, EffectKind, TriggerDeclaration};
use crate::document::{Document, ElementId};
use crate::error::{DeclarationError, MotionResult};
use crate::event::EngineEvent;
use crate::input::{EngineInput, FrameClock};
use crate::interaction::{InteractionTracker, PointerAction};
use crate::sequencer::{EffectSequencer, EntranceParams};
use crate::trigger::{
    RegisterOutcome, TriggerFire, TriggerMode, TriggerPurpose, TriggerRegistry, VisibilityObserver,
};

/// 扫描结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// 入场效果数量
    pub entrances: usize,
    /// 分组数量
    pub stagger_groups: usize,
    pub counters: usize,
    pub typewriters: usize,
    pub morphs: usize,
    pub parallax: usize,
    pub prices: usize,
    pub hovers: usize,
    /// 交给宿主观察的注册数量
    pub registrations: usize,
    /// 降级模式下立即触发的数量
    pub fired_immediately: usize,
    /// 文档中存在、但宿主中已不存在的元素数量
    pub missing: usize,
    /// 声明警告
    pub warnings: Vec<DeclarationError>,
}

impl ScanReport {
    /// 生效的效果总数
    pub fn effect_count(&self) -> usize {
        self.entrances
            + self.stagger_groups
            + self.counters
            + self.typewriters
            + self.morphs
            + self.parallax
            + self.prices
            + self.hovers
    }

    /// 把警告视为错误（严格检查时使用）
    pub fn into_result(self) -> MotionResult<Self> {
        match self.warnings.first() {
            Some(warning) => Err(warning.clone().into()),
            None => Ok(self),
        }
    }
}

/// 分组错峰声明
#[derive(Debug, Clone)]
struct StaggerGroup {
    children: Vec<ElementId>,
    delay_ms: f64,
}

/// 入场声明
#[derive(Debug, Clone, Copy)]
struct EntranceEntry {
    params: EntranceParams,
    mode: TriggerMode,
}

/// 动效引擎
///
/// # 使用示例
///
/// ```ignore
/// let mut engine = Engine::new(config, Box::new(adapter), Some(Box::new(observer)));
/// let report = engine.scan(&document);
///
/// loop {
///     for input in host.poll_inputs() {
///         let events = engine.handle(input);
///         // 宿主处理事件...
///     }
/// }
/// ```
pub struct Engine {
    config: EngineConfig,
    surface: Surface,
    registry: TriggerRegistry,
    sequencer: EffectSequencer,
    runner: ContinuousRunner,
    interactions: InteractionTracker,
    clock: FrameClock,
    /// 元素 -> 入场声明（持续性入场在每次进入时复用）
    entrances: HashMap<ElementId, EntranceEntry>,
    /// 分组元素 -> 子元素
    stagger_groups: HashMap<ElementId, StaggerGroup>,
    shut_down: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("enabled", &self.config.enabled)
            .field("registry", &self.registry)
            .field("transitions", &self.sequencer.active_count())
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// 创建引擎
    ///
    /// `observer` 为 `None` 时进入降级模式：一次性效果在扫描时立即运行。
    pub fn new(
        config: EngineConfig,
        adapter: Box<dyn StyleAdapter>,
        observer: Option<Box<dyn VisibilityObserver>>,
    ) -> Self {
        Self {
            config,
            surface: Surface::new(adapter),
            registry: TriggerRegistry::new(observer),
            sequencer: EffectSequencer::new(),
            runner: ContinuousRunner::new(),
            interactions: InteractionTracker::new(),
            clock: FrameClock::new(),
            entrances: HashMap::new(),
            stagger_groups: HashMap::new(),
            shut_down: false,
        }
    }

    // ========== 扫描 ==========

    /// 扫描文档，为所有声明注册效果
    pub fn scan(&mut self, document: &Document) -> ScanReport {
        let mut report = ScanReport::default();

        if self.shut_down {
            warn!("引擎已关闭，忽略扫描");
            return report;
        }
        if !self.config.enabled {
            info!("动效已禁用，页面保持静态内容");
            return report;
        }

        let mut declarations = Vec::with_capacity(document.elements.len());
        for node in &document.elements {
            let (declaration, warnings) =
                TriggerDeclaration::parse(node, self.config.stagger.delay_ms);
            report.warnings.extend(warnings);
            if !declaration.is_empty() {
                declarations.push(declaration);
            }
        }

        // 分组先占用子元素，子元素自己的入场声明随后被视为冲突
        let mut claims = ChannelClaims::new();
        for declaration in &declarations {
            for effect in &declaration.effects {
                if let Effect::StaggerGroup { children, .. } = effect {
                    for &child in children {
                        if let Err(e) = claims.claim(child, EffectKind::StaggerMember) {
                            report.warnings.push(e);
                        }
                    }
                }
            }
        }

        let mut morph_index = 0;
        let mut parallax_index = 0;

        for declaration in declarations {
            let element = declaration.element;
            if !self.surface.contains(element) {
                debug!(element = %element, "元素不存在，跳过声明");
                report.missing += 1;
                continue;
            }

            for effect in declaration.effects {
                if let Err(e) = claims.claim(element, effect.kind()) {
                    report.warnings.push(e);
                    continue;
                }
                self.register_effect(
                    element,
                    effect,
                    &mut report,
                    &mut morph_index,
                    &mut parallax_index,
                );
            }
        }

        for warning in &report.warnings {
            warn!(error = %warning, "声明无效");
        }
        report.registrations = self.registry.len();

        info!(
            effects = report.effect_count(),
            registrations = report.registrations,
            warnings = report.warnings.len(),
            degraded = self.registry.is_degraded(),
            "文档扫描完成"
        );
        report
    }

    fn register_effect(
        &mut self,
        element: ElementId,
        effect: Effect,
        report: &mut ScanReport,
        morph_index: &mut usize,
        parallax_index: &mut usize,
    ) {
        let thresholds = self.config.thresholds.clone();

        match effect {
            Effect::Entrance {
                kind,
                duration_ms,
                delay_ms,
                mode,
            } => {
                let params =
                    EntranceParams::for_kind(kind, duration_ms, delay_ms, &self.config.entrance);
                self.sequencer.prepare(element, params.from, &mut self.surface);
                self.entrances.insert(element, EntranceEntry { params, mode });
                report.entrances += 1;

                let outcome = match mode {
                    TriggerMode::OneShot => self.registry.register_one_shot(
                        element,
                        TriggerPurpose::Entrance,
                        &thresholds.entrance,
                    ),
                    TriggerMode::Persistent => self.registry.register_persistent(
                        element,
                        TriggerPurpose::Entrance,
                        &thresholds.entrance,
                    ),
                };
                // 降级模式下持续性入场只播放一次，元素不会一直停在起始状态
                if matches!(
                    outcome,
                    RegisterOutcome::FiredImmediately | RegisterOutcome::Ignored
                ) {
                    report.fired_immediately += 1;
                    self.sequencer.run_one_shot(element, &params, &mut self.surface);
                }
            }
            Effect::StaggerGroup { children, delay_ms } => {
                self.sequencer.prepare_stagger_group(
                    &children,
                    &self.config.stagger,
                    &mut self.surface,
                );
                report.stagger_groups += 1;

                let outcome = self.registry.register_one_shot(
                    element,
                    TriggerPurpose::Stagger,
                    &thresholds.stagger,
                );
                if outcome == RegisterOutcome::FiredImmediately {
                    report.fired_immediately += 1;
                    self.sequencer.run_stagger_group(
                        &children,
                        delay_ms,
                        &self.config.stagger,
                        &mut self.surface,
                    );
                } else {
                    self.stagger_groups
                        .insert(element, StaggerGroup { children, delay_ms });
                }
            }
            Effect::Counter { target } => {
                self.runner.add_counter(element, target, &self.config);
                report.counters += 1;

                let outcome = self.registry.register_one_shot(
                    element,
                    TriggerPurpose::Counter,
                    &thresholds.counter,
                );
                if outcome == RegisterOutcome::FiredImmediately {
                    report.fired_immediately += 1;
                    self.runner.start_counter(element);
                }
            }
            Effect::Typewriter { text, speed_ms } => {
                self.runner.add_typewriter(
                    element,
                    &text,
                    speed_ms,
                    &self.config,
                    &mut self.surface,
                );
                report.typewriters += 1;

                let outcome = self.registry.register_one_shot(
                    element,
                    TriggerPurpose::Typewriter,
                    &thresholds.typewriter,
                );
                if outcome == RegisterOutcome::FiredImmediately {
                    report.fired_immediately += 1;
                    self.runner.start_typewriter(element);
                }
            }
            Effect::Morph => {
                // 有观察原语时等待第一次可见报告
                let playing = self.registry.is_degraded();
                self.runner
                    .add_morph(element, *morph_index, playing, &self.config);
                *morph_index += 1;
                report.morphs += 1;
                self.registry.register_persistent(
                    element,
                    TriggerPurpose::Morph,
                    &thresholds.morph,
                );
            }
            Effect::Parallax { speed } => {
                let speed = speed.unwrap_or_else(|| {
                    ParallaxRun::default_speed(*parallax_index, self.config.parallax.speed_step)
                });
                self.runner.add_parallax(element, speed);
                *parallax_index += 1;
                report.parallax += 1;
            }
            Effect::Price { monthly, yearly } => {
                self.runner.add_price(element, monthly, yearly);
                report.prices += 1;
            }
            Effect::Hover(style) => {
                self.interactions.add(element, style);
                report.hovers += 1;
            }
        }
    }

    // ========== 输入处理 ==========

    /// 处理一条输入
    ///
    /// # 返回
    /// 本次输入产生的事件
    pub fn handle(&mut self, input: EngineInput) -> Vec<EngineEvent> {
        if self.shut_down {
            debug!(input = ?input, "引擎已关闭，忽略输入");
            return Vec::new();
        }

        match input {
            EngineInput::VisibilityChanged {
                element,
                purpose,
                visible,
            } => {
                let fires = self.registry.handle_visibility(element, purpose, visible);
                let mut events = Vec::with_capacity(fires.len());
                for fire in fires {
                    events.push(EngineEvent::TriggerFired {
                        element: fire.element,
                        purpose: fire.purpose,
                        visible: fire.visible,
                    });
                    events.extend(self.dispatch_fire(fire));
                }
                events
            }
            EngineInput::Tick { now_ms } => {
                let dt = self.clock.advance(now_ms);
                let now = self.clock.now().unwrap_or(0.0);
                let mut events = self.sequencer.update(dt, now, &mut self.surface);
                events.extend(self.runner.update(dt, &mut self.surface));
                events
            }
            EngineInput::ScrollChanged { position } => {
                self.runner.scroll(position, &mut self.surface);
                Vec::new()
            }
            EngineInput::PriceToggled { yearly } => {
                debug!(yearly, "价格周期切换");
                self.runner.toggle_price(yearly, &self.config);
                Vec::new()
            }
            EngineInput::PointerEntered { element } => self.pointer(element, PointerAction::Enter),
            EngineInput::PointerLeft { element } => self.pointer(element, PointerAction::Leave),
            EngineInput::PointerPressed { element } => self.pointer(element, PointerAction::Press),
            EngineInput::PointerReleased { element } => {
                self.pointer(element, PointerAction::Release)
            }
            EngineInput::FocusGained { element } => self.pointer(element, PointerAction::Focus),
            EngineInput::FocusLost { element } => self.pointer(element, PointerAction::Blur),
        }
    }

    /// 依次处理多条输入
    pub fn handle_all(&mut self, inputs: impl IntoIterator<Item = EngineInput>) -> Vec<EngineEvent> {
        inputs
            .into_iter()
            .flat_map(|input| self.handle(input))
            .collect()
    }

    fn dispatch_fire(&mut self, fire: TriggerFire) -> Vec<EngineEvent> {
        let element = fire.element;
        debug!(element = %element, purpose = ?fire.purpose, visible = fire.visible, "触发器触发");

        match fire.purpose {
            TriggerPurpose::Entrance => {
                let Some(entry) = self.entrances.get(&element).copied() else {
                    return Vec::new();
                };
                if fire.visible {
                    self.sequencer
                        .run_one_shot(element, &entry.params, &mut self.surface);
                    if entry.mode == TriggerMode::OneShot {
                        self.entrances.remove(&element);
                    }
                } else if entry.mode == TriggerMode::Persistent
                    && self.sequencer.reset(element, &mut self.surface)
                {
                    return vec![EngineEvent::TransitionReset { element }];
                }
            }
            TriggerPurpose::Stagger => {
                if let Some(group) = self.stagger_groups.remove(&element) {
                    let started = self.sequencer.run_stagger_group(
                        &group.children,
                        group.delay_ms,
                        &self.config.stagger,
                        &mut self.surface,
                    );
                    debug!(element = %element, children = started, "分组错峰开始");
                }
            }
            TriggerPurpose::Counter => self.runner.start_counter(element),
            TriggerPurpose::Typewriter => self.runner.start_typewriter(element),
            TriggerPurpose::Morph => {
                return self
                    .runner
                    .set_morph_visible(element, fire.visible)
                    .into_iter()
                    .collect();
            }
        }
        Vec::new()
    }

    fn pointer(&mut self, element: ElementId, action: PointerAction) -> Vec<EngineEvent> {
        // 入场未播放（或已重置）时元素停在起始状态，交互写入会覆盖起始变换
        let blocked = self.sequencer.is_running(element) || self.sequencer.is_hidden(element);
        self.interactions
            .handle(element, action, blocked, &mut self.surface);
        Vec::new()
    }

    // ========== 生命周期 ==========

    /// 关闭引擎
    ///
    /// 注销所有触发器，一次性效果直接跳到最终状态，形变、视差与价格运行被停止。
    /// 之后的所有输入都被忽略。重复调用是安全的。
    pub fn shutdown(&mut self) -> Vec<EngineEvent> {
        if self.shut_down {
            return Vec::new();
        }
        self.shut_down = true;

        self.registry.clear();
        let now = self.clock.now().unwrap_or(0.0);
        let mut events = self.sequencer.finish_all(now, &mut self.surface);
        events.extend(self.runner.finish_all(&mut self.surface));
        self.sequencer.clear();
        self.runner.clear();
        self.interactions.clear();
        self.entrances.clear();
        self.stagger_groups.clear();

        info!(finished = events.len(), "引擎已关闭");
        events
    }

    // ========== 查询 ==========

    /// 是否没有任何需要逐帧推进的工作
    pub fn is_idle(&self) -> bool {
        self.sequencer.is_idle() && self.runner.is_idle()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// 是否处于降级模式（宿主没有观察原语）
    pub fn is_degraded(&self) -> bool {
        self.registry.is_degraded()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 当前触发器注册数量
    pub fn registration_count(&self) -> usize {
        self.registry.len()
    }

    /// 元素是否有正在进行的入场过渡
    pub fn is_transitioning(&self, element: ElementId) -> bool {
        self.sequencer.is_running(element)
    }

    pub fn morph_progress(&self, element: ElementId) -> Option<f64> {
        self.runner.morph_progress(element)
    }

    pub fn morph_playing(&self, element: ElementId) -> Option<bool> {
        self.runner.morph_playing(element)
    }

    pub fn counter_phase(&self, element: ElementId) -> Option<CounterPhase> {
        self.runner.counter_phase(element)
    }

    pub fn typewriter_phase(&self, element: ElementId) -> Option<TypewriterPhase> {
        self.runner.typewriter_phase(element)
    }

    pub fn parallax_offset(&self, element: ElementId) -> Option<f64> {
        self.runner.parallax_offset(element)
    }

    pub fn price_value(&self, element: ElementId) -> Option<i64> {
        self.runner.price_value(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::RecordingAdapter;
    use crate::document::ElementNode;
    use crate::error::MotionError;
    use crate::trigger::RecordingObserver;

    fn engine(document: &Document) -> (Engine, RecordingAdapter, RecordingObserver) {
        let adapter = RecordingAdapter::from_document(document);
        let observer = RecordingObserver::new();
        let engine = Engine::new(
            EngineConfig::default(),
            Box::new(adapter.clone()),
            Some(Box::new(observer.clone())),
        );
        (engine, adapter, observer)
    }

    #[test]
    fn test_scan_counts_effects() {
        let document = Document::new(vec![
            ElementNode::new(1).attr("data-animate", "fade"),
            ElementNode::new(2).attr("data-count", "5000"),
            ElementNode::new(3)
                .attr("data-morph", "")
                .attr("data-parallax", ""),
            ElementNode::new(4).attr("data-hover", "card"),
        ])
        .unwrap();
        let (mut engine, adapter, observer) = engine(&document);
        let report = engine.scan(&document);

        assert_eq!(report.entrances, 1);
        assert_eq!(report.counters, 1);
        assert_eq!(report.morphs, 1);
        assert_eq!(report.parallax, 1);
        assert_eq!(report.hovers, 1);
        assert_eq!(report.effect_count(), 5);
        assert_eq!(report.registrations, 3);
        assert_eq!(observer.observed_count(), 3);
        // fade 元素在触发前保持隐藏
        assert_eq!(adapter.last_opacity(ElementId(1)), Some(0.0));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_entrance_runs_on_visibility() {
        let document = Document::new(vec![ElementNode::new(1).attr("data-animate", "scale")]).unwrap();
        let (mut engine, adapter, _) = engine(&document);
        engine.scan(&document);
        engine.handle(EngineInput::tick(0.0));

        let events = engine.handle(EngineInput::visibility(ElementId(1), true));
        assert_eq!(
            events,
            vec![EngineEvent::TriggerFired {
                element: ElementId(1),
                purpose: TriggerPurpose::Entrance,
                visible: true,
            }]
        );
        assert!(engine.is_transitioning(ElementId(1)));

        let mut now = 0.0;
        while !engine.is_idle() {
            now += 16.0;
            engine.handle(EngineInput::tick(now));
        }
        // 默认 scale：延迟 200ms + 时长 500ms
        assert!((700.0..=716.0).contains(&now));
        assert_eq!(adapter.last_opacity(ElementId(1)), Some(1.0));
    }

    #[test]
    fn test_persistent_entrance_resets() {
        let document = Document::new(vec![
            ElementNode::new(1)
                .attr("data-animate", "fade")
                .attr("data-once", "false")
                .attr("data-delay", "0"),
        ])
        .unwrap();
        let (mut engine, adapter, observer) = engine(&document);
        engine.scan(&document);

        engine.handle(EngineInput::visibility(ElementId(1), true));
        engine.handle(EngineInput::tick(0.0));
        engine.handle(EngineInput::tick(1000.0));
        assert_eq!(adapter.last_opacity(ElementId(1)), Some(1.0));

        let events = engine.handle(EngineInput::visibility(ElementId(1), false));
        assert!(events.contains(&EngineEvent::TransitionReset {
            element: ElementId(1)
        }));
        assert_eq!(adapter.last_opacity(ElementId(1)), Some(0.0));
        assert!(observer.is_observing(ElementId(1)));
    }

    #[test]
    fn test_stagger_claims_children_first() {
        let document = Document::new(vec![
            ElementNode::new(1).attr("data-stagger", "").children([2, 3]),
            ElementNode::new(2).attr("data-animate", "fade"),
            ElementNode::new(3),
        ])
        .unwrap();
        let (mut engine, _, _) = engine(&document);
        let report = engine.scan(&document);

        assert_eq!(report.stagger_groups, 1);
        assert_eq!(report.entrances, 0);
        assert!(matches!(
            report.warnings.as_slice(),
            [DeclarationError::ConflictingEffects { element, .. }] if *element == ElementId(2)
        ));
        assert!(matches!(
            report.into_result(),
            Err(MotionError::Declaration(_))
        ));
    }

    #[test]
    fn test_pointer_blocked_during_entrance() {
        let document = Document::new(vec![
            ElementNode::new(1)
                .attr("data-animate", "fade")
                .attr("data-hover", "lift"),
        ])
        .unwrap();
        let (mut engine, adapter, _) = engine(&document);
        let report = engine.scan(&document);
        assert!(report.warnings.is_empty());

        engine.handle(EngineInput::visibility(ElementId(1), true));
        let before = adapter.mutations().len();
        engine.handle(EngineInput::PointerEntered {
            element: ElementId(1),
        });
        assert_eq!(adapter.mutations().len(), before);

        engine.handle(EngineInput::tick(0.0));
        engine.handle(EngineInput::tick(2000.0));
        engine.handle(EngineInput::PointerEntered {
            element: ElementId(1),
        });
        assert_eq!(
            adapter.last_transform(ElementId(1)).map(|t| t.to_css()),
            Some("translate(0px, -2px)".to_string())
        );
    }

    #[test]
    fn test_pointer_blocked_at_start_state() {
        let document = Document::new(vec![
            ElementNode::new(1)
                .attr("data-animate", "fade")
                .attr("data-once", "false")
                .attr("data-hover", "card"),
        ])
        .unwrap();
        let (mut engine, adapter, _) = engine(&document);
        engine.scan(&document);
        let start = adapter.last_transform(ElementId(1));

        // 尚未可见：停在起始状态
        engine.handle(EngineInput::PointerEntered {
            element: ElementId(1),
        });
        assert_eq!(adapter.last_transform(ElementId(1)), start);

        engine.handle(EngineInput::visibility(ElementId(1), true));
        engine.handle(EngineInput::tick(0.0));
        engine.handle(EngineInput::tick(2000.0));
        engine.handle(EngineInput::visibility(ElementId(1), false));
        let reset = adapter.mutations().len();

        // 重置回起始状态后同样忽略
        engine.handle(EngineInput::PointerEntered {
            element: ElementId(1),
        });
        assert_eq!(adapter.mutations().len(), reset);
        assert_eq!(adapter.last_opacity(ElementId(1)), Some(0.0));
    }

    #[test]
    fn test_focus_lifts_field() {
        let document = Document::new(vec![ElementNode::new(1).attr("data-hover", "field")]).unwrap();
        let (mut engine, adapter, _) = engine(&document);
        engine.scan(&document);

        engine.handle(EngineInput::FocusGained {
            element: ElementId(1),
        });
        assert_eq!(
            adapter.last_transform(ElementId(1)).map(|t| t.to_css()),
            Some("translate(0px, -2px)".to_string())
        );
        engine.handle(EngineInput::FocusLost {
            element: ElementId(1),
        });
        assert_eq!(
            adapter.last_transform(ElementId(1)).map(|t| t.to_css()),
            Some("none".to_string())
        );
    }

    #[test]
    fn test_each_purpose_observed_at_own_threshold() {
        let document = Document::new(vec![
            ElementNode::new(1)
                .attr("data-animate", "fade")
                .attr("data-count", "5000"),
        ])
        .unwrap();
        let (mut engine, _, observer) = engine(&document);
        engine.scan(&document);
        let thresholds = engine.config().thresholds.clone();

        assert_eq!(
            observer.threshold(ElementId(1), TriggerPurpose::Entrance),
            Some(thresholds.entrance)
        );
        assert_eq!(
            observer.threshold(ElementId(1), TriggerPurpose::Counter),
            Some(thresholds.counter)
        );

        // 只跨过入场阈值时计数器不启动
        engine.handle(EngineInput::visibility_for(
            ElementId(1),
            TriggerPurpose::Entrance,
            true,
        ));
        assert_eq!(
            engine.counter_phase(ElementId(1)),
            Some(CounterPhase::Idle)
        );
        assert!(engine.is_transitioning(ElementId(1)));

        engine.handle(EngineInput::visibility_for(
            ElementId(1),
            TriggerPurpose::Counter,
            true,
        ));
        assert_eq!(
            engine.counter_phase(ElementId(1)),
            Some(CounterPhase::Running)
        );
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn test_shutdown_ignores_later_input() {
        let document = Document::new(vec![ElementNode::new(1).attr("data-animate", "fade")]).unwrap();
        let (mut engine, adapter, observer) = engine(&document);
        engine.scan(&document);

        engine.shutdown();
        assert!(engine.is_shut_down());
        assert_eq!(observer.observed_count(), 0);
        assert_eq!(engine.registration_count(), 0);
        // 未触发的入场直接显示为最终状态
        assert_eq!(adapter.last_opacity(ElementId(1)), Some(1.0));

        let before = adapter.mutations().len();
        assert!(engine.handle(EngineInput::visibility(ElementId(1), true)).is_empty());
        assert!(engine.handle(EngineInput::tick(100.0)).is_empty());
        assert_eq!(adapter.mutations().len(), before);
        assert!(engine.shutdown().is_empty());
    }

    #[test]
    fn test_disabled_config_writes_nothing() {
        let document = Document::new(vec![
            ElementNode::new(1).attr("data-animate", "fade"),
            ElementNode::new(2).attr("data-typewriter", "").text("Hi"),
        ])
        .unwrap();
        let adapter = RecordingAdapter::from_document(&document);
        let observer = RecordingObserver::new();
        let config = EngineConfig {
            enabled: false,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(
            config,
            Box::new(adapter.clone()),
            Some(Box::new(observer.clone())),
        );

        let report = engine.scan(&document);
        assert_eq!(report.effect_count(), 0);
        engine.handle(EngineInput::visibility(ElementId(1), true));
        engine.handle(EngineInput::tick(0.0));
        engine.handle(EngineInput::tick(500.0));

        assert!(adapter.mutations().is_empty());
        assert_eq!(observer.observed_count(), 0);
    }
}
