//! Engine 端到端行为测试
//!
//! 通过 `RecordingAdapter` / `RecordingObserver` 驱动完整的引擎，检查可观察的样式写入与事件。

use motion_runtime::{
    BorderStyle, CounterPhase, DeclarationError, Document, ElementId, ElementNode, Engine,
    EngineConfig, EngineEvent, EngineInput, RecordingAdapter, RecordingObserver, StyleMutation,
    TriggerPurpose, TypewriterPhase,
};

struct Harness {
    engine: Engine,
    adapter: RecordingAdapter,
    observer: RecordingObserver,
    now: f64,
}

impl Harness {
    fn new(elements: Vec<ElementNode>) -> Self {
        Self::with_config(elements, EngineConfig::default())
    }

    fn with_config(elements: Vec<ElementNode>, config: EngineConfig) -> Self {
        let document = Document::new(elements).unwrap();
        let adapter = RecordingAdapter::from_document(&document);
        let observer = RecordingObserver::new();
        let mut engine = Engine::new(
            config,
            Box::new(adapter.clone()),
            Some(Box::new(observer.clone())),
        );
        engine.scan(&document);
        let mut harness = Self {
            engine,
            adapter,
            observer,
            now: 0.0,
        };
        harness.engine.handle(EngineInput::tick(0.0));
        harness
    }

    fn show(&mut self, id: u64) -> Vec<EngineEvent> {
        self.engine.handle(EngineInput::visibility(ElementId(id), true))
    }

    fn hide(&mut self, id: u64) -> Vec<EngineEvent> {
        self.engine.handle(EngineInput::visibility(ElementId(id), false))
    }

    fn tick(&mut self, dt: f64) -> Vec<EngineEvent> {
        self.now += dt;
        self.engine.handle(EngineInput::tick(self.now))
    }

    /// 以固定间隔推进到 `until`，收集所有事件及其时间
    fn run_until(&mut self, until: f64, frame: f64) -> Vec<(f64, EngineEvent)> {
        let mut events = Vec::new();
        while self.now + frame <= until {
            let now = self.now + frame;
            events.extend(self.tick(frame).into_iter().map(|e| (now, e)));
        }
        events
    }
}

fn trigger_count(events: &[EngineEvent], purpose: TriggerPurpose) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, EngineEvent::TriggerFired { purpose: p, .. } if *p == purpose))
        .count()
}

/// 元素过渡开始（`started = true`）或完成的时间
fn transition_time(events: &[(f64, EngineEvent)], id: u64, started: bool) -> f64 {
    events
        .iter()
        .find(|(_, e)| match e {
            EngineEvent::TransitionStarted { element, .. } => started && *element == ElementId(id),
            EngineEvent::TransitionCompleted { element, .. } => {
                !started && *element == ElementId(id)
            }
            _ => false,
        })
        .map(|(t, _)| *t)
        .unwrap()
}

#[test]
fn one_shot_entrance_fires_exactly_once() {
    let mut h = Harness::new(vec![ElementNode::new(1).attr("data-animate", "fade")]);

    let mut events = Vec::new();
    for _ in 0..2 {
        events.extend(h.show(1));
        events.extend(h.hide(1));
    }
    events.extend(h.show(1));

    assert_eq!(trigger_count(&events, TriggerPurpose::Entrance), 1);
    assert!(!h.observer.is_observing(ElementId(1)));
    assert_eq!(h.engine.registration_count(), 0);
}

#[test]
fn counter_counts_up_to_target() {
    let mut h = Harness::new(vec![ElementNode::new(1).attr("data-count", "5000").text("5000")]);
    h.show(1);
    assert_eq!(
        h.engine.counter_phase(ElementId(1)),
        Some(CounterPhase::Running)
    );

    let mut ticks = 0;
    loop {
        ticks += 1;
        let events = h.tick(16.0);
        if events
            .iter()
            .any(|e| matches!(e, EngineEvent::CounterFinished { value: 5000, .. }))
        {
            break;
        }
        assert!(ticks < 500, "计数器没有结束");
    }
    assert!((124..=126).contains(&ticks), "ticks = {}", ticks);

    let values: Vec<u64> = h
        .adapter
        .texts(ElementId(1))
        .iter()
        .map(|t| t.replace(',', "").parse().unwrap())
        .collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(h.adapter.last_text(ElementId(1)).as_deref(), Some("5,000"));
    assert_eq!(h.engine.counter_phase(ElementId(1)), Some(CounterPhase::Done));

    // 结束后不再写入
    let count = h.adapter.mutations().len();
    h.run_until(h.now + 500.0, 16.0);
    assert_eq!(h.adapter.mutations().len(), count);
}

#[test]
fn stagger_children_start_in_order() {
    let mut h = Harness::new(vec![
        ElementNode::new(10)
            .attr("data-stagger", "100")
            .children([11, 12, 13, 14]),
        ElementNode::new(11),
        ElementNode::new(12),
        ElementNode::new(13),
        ElementNode::new(14),
    ]);

    // 子元素在触发前隐藏
    for id in 11..=14 {
        assert_eq!(h.adapter.last_opacity(ElementId(id)), Some(0.0));
    }

    h.show(10);
    let events = h.run_until(2000.0, 16.0);

    let started: Vec<f64> = (11..=14)
        .map(|id| transition_time(&events, id, true))
        .collect();
    let completed: Vec<f64> = (11..=14)
        .map(|id| transition_time(&events, id, false))
        .collect();

    for (i, start) in started.iter().enumerate() {
        let expected = started[0] + i as f64 * 100.0;
        assert!((start - expected).abs() <= 16.0, "child {} started at {}", i, start);
    }
    let durations: Vec<f64> = started
        .iter()
        .zip(&completed)
        .map(|(s, c)| c - s)
        .collect();
    for d in &durations {
        assert!((d - durations[0]).abs() <= 16.0);
        assert!((d - 600.0).abs() <= 16.0);
    }
    for id in 11..=14 {
        assert_eq!(h.adapter.last_opacity(ElementId(id)), Some(1.0));
    }
}

#[test]
fn morph_pause_and_resume_keep_progress() {
    let mut h = Harness::new(vec![ElementNode::new(1).attr("data-morph", "")]);
    let el = ElementId(1);

    // 等待第一次可见报告
    assert_eq!(h.engine.morph_playing(el), Some(false));
    h.show(1);
    h.run_until(1000.0, 16.0);

    let events = h.hide(1);
    let paused_at = h.engine.morph_progress(el).unwrap();
    assert!(paused_at > 0.0);
    assert!(events.contains(&EngineEvent::MorphPaused {
        element: el,
        progress: paused_at
    }));

    let writes = h.adapter.mutations_for(el).len();
    h.run_until(5000.0, 16.0);
    assert_eq!(h.engine.morph_progress(el), Some(paused_at));
    assert_eq!(h.adapter.mutations_for(el).len(), writes);

    let events = h.show(1);
    assert!(events.contains(&EngineEvent::MorphResumed {
        element: el,
        progress: paused_at
    }));
    h.tick(16.0);
    let resumed = h.engine.morph_progress(el).unwrap();
    assert!((resumed - (paused_at + 16.0 / 8000.0)).abs() < 1e-9);
    assert!(matches!(
        h.adapter.last_border(el),
        Some(BorderStyle::Radius { .. })
    ));
}

#[test]
fn typewriter_reveals_hello_then_stops() {
    let mut h = Harness::new(vec![
        ElementNode::new(1).attr("data-typewriter", "").text("Hello"),
    ]);
    let el = ElementId(1);

    assert_eq!(h.adapter.last_text(el).as_deref(), Some(""));
    assert_eq!(h.adapter.last_border(el), Some(BorderStyle::Caret { blinking: true }));

    h.show(1);
    let events = h.run_until(1000.0, 100.0);

    assert_eq!(h.adapter.last_text(el).as_deref(), Some("Hello"));
    assert_eq!(
        h.adapter.texts(el),
        vec!["", "H", "He", "Hel", "Hell", "Hello"]
    );
    assert_eq!(h.adapter.last_border(el), Some(BorderStyle::None));
    assert!(events
        .iter()
        .any(|(_, e)| *e == EngineEvent::TypewriterFinished { element: el }));
    assert_eq!(
        h.engine.typewriter_phase(el),
        Some(TypewriterPhase::Finished)
    );

    let writes = h.adapter.mutations_for(el).len();
    h.run_until(5000.0, 100.0);
    assert_eq!(h.adapter.mutations_for(el).len(), writes);
}

#[test]
fn parallax_offsets_do_not_drift() {
    let mut h = Harness::new(vec![
        ElementNode::new(1).attr("data-parallax", ""),
        ElementNode::new(2).attr("data-parallax", ""),
        ElementNode::new(3).attr("data-parallax", "0.2"),
    ]);

    for position in [10.0, 250.0, 999.0, 3.0, 250.0, 0.0, 480.0] {
        h.engine.handle(EngineInput::scroll(position));
    }
    h.engine.handle(EngineInput::scroll(200.0));

    assert_eq!(h.engine.parallax_offset(ElementId(1)), Some(-(200.0 * 0.5)));
    assert_eq!(h.engine.parallax_offset(ElementId(2)), Some(-(200.0 * 1.0)));
    assert_eq!(h.engine.parallax_offset(ElementId(3)), Some(-(200.0 * 0.2)));
    assert_eq!(
        h.adapter.last_transform(ElementId(2)).map(|t| t.to_css()),
        Some("translate(0px, -200px)".to_string())
    );
}

#[test]
fn degraded_mode_runs_one_shot_effects_immediately() {
    let document = Document::new(vec![
        ElementNode::new(1).attr("data-animate", "slide"),
        ElementNode::new(2).attr("data-count", "10"),
        ElementNode::new(3).attr("data-morph", ""),
    ])
    .unwrap();
    let adapter = RecordingAdapter::from_document(&document);
    let mut engine = Engine::new(EngineConfig::default(), Box::new(adapter.clone()), None);

    let report = engine.scan(&document);
    assert!(engine.is_degraded());
    assert_eq!(report.registrations, 0);
    assert_eq!(report.fired_immediately, 2);
    assert!(engine.is_transitioning(ElementId(1)));
    assert_eq!(engine.counter_phase(ElementId(2)), Some(CounterPhase::Running));
    assert_eq!(engine.morph_playing(ElementId(3)), Some(true));

    engine.handle(EngineInput::tick(0.0));
    engine.handle(EngineInput::tick(5000.0));
    assert_eq!(adapter.last_opacity(ElementId(1)), Some(1.0));
}

#[test]
fn missing_targets_are_silent_noops() {
    let document = Document::new(vec![
        ElementNode::new(1).attr("data-animate", "fade"),
        ElementNode::new(2).attr("data-count", "100"),
        ElementNode::new(3).attr("data-typewriter", "").text("gone"),
    ])
    .unwrap();
    // 元素 3 在扫描前已被宿主移除
    let adapter = RecordingAdapter::new([ElementId(1), ElementId(2)]);
    let observer = RecordingObserver::new();
    let mut engine = Engine::new(
        EngineConfig::default(),
        Box::new(adapter.clone()),
        Some(Box::new(observer.clone())),
    );
    let report = engine.scan(&document);
    assert_eq!(report.missing, 1);
    assert!(adapter.mutations_for(ElementId(3)).is_empty());

    // 元素 1、2 在触发前被移除
    adapter.remove(ElementId(1));
    adapter.remove(ElementId(2));
    let before = adapter.mutations().len();
    engine.handle(EngineInput::visibility(ElementId(1), true));
    engine.handle(EngineInput::visibility(ElementId(2), true));
    engine.handle(EngineInput::tick(0.0));
    engine.handle(EngineInput::tick(3000.0));
    assert_eq!(adapter.mutations().len(), before);
}

#[test]
fn malformed_attributes_fall_back() {
    let document = Document::new(vec![
        ElementNode::new(1).attr("data-stagger", "abc").children([2, 3]),
        ElementNode::new(2),
        ElementNode::new(3),
        ElementNode::new(4).attr("data-count", "many").text("many"),
        ElementNode::new(5)
            .attr("data-typewriter", "")
            .attr("data-speed", "fast")
            .text("Hi"),
        ElementNode::new(6).attr("data-animate", "spin"),
    ])
    .unwrap();
    let adapter = RecordingAdapter::from_document(&document);
    let mut engine = Engine::new(
        EngineConfig::default(),
        Box::new(adapter.clone()),
        Some(Box::new(RecordingObserver::new())),
    );
    let report = engine.scan(&document);

    assert_eq!(report.stagger_groups, 1);
    assert_eq!(report.counters, 0);
    assert_eq!(report.typewriters, 1);
    assert_eq!(report.entrances, 0);
    assert_eq!(report.warnings.len(), 4);
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        DeclarationError::UnusableValue { element, .. } if *element == ElementId(4)
    )));
    // 计数器保持静态内容
    assert!(adapter.mutations_for(ElementId(4)).is_empty());

    // 分组使用默认的 100ms 间隔
    engine.handle(EngineInput::tick(0.0));
    engine.handle(EngineInput::visibility(ElementId(1), true));
    let mut started = Vec::new();
    let mut now = 0.0;
    while now < 400.0 {
        now += 10.0;
        for event in engine.handle(EngineInput::tick(now)) {
            if let EngineEvent::TransitionStarted { element, at_ms } = event {
                started.push((element, at_ms));
            }
        }
    }
    assert_eq!(started, vec![(ElementId(2), 10.0), (ElementId(3), 100.0)]);
}

#[test]
fn conflicting_effects_are_reported() {
    let document = Document::new(vec![
        ElementNode::new(1)
            .attr("data-count", "50")
            .attr("data-typewriter", "")
            .text("50"),
        ElementNode::new(2)
            .attr("data-animate", "fade")
            .attr("data-parallax", ""),
        ElementNode::new(3)
            .attr("data-typewriter", "")
            .attr("data-morph", "")
            .text("ok"),
    ])
    .unwrap();
    let adapter = RecordingAdapter::from_document(&document);
    let mut engine = Engine::new(
        EngineConfig::default(),
        Box::new(adapter.clone()),
        Some(Box::new(RecordingObserver::new())),
    );
    let report = engine.scan(&document);

    let conflicts: Vec<(ElementId, String, String)> = report
        .warnings
        .iter()
        .filter_map(|w| match w {
            DeclarationError::ConflictingEffects {
                element,
                first,
                second,
            } => Some((*element, first.clone(), second.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        conflicts,
        vec![
            (ElementId(1), "counter".to_string(), "typewriter".to_string()),
            (ElementId(2), "fade".to_string(), "parallax".to_string()),
            (ElementId(3), "typewriter".to_string(), "morph".to_string()),
        ]
    );
    assert_eq!(report.counters, 1);
    assert_eq!(report.typewriters, 1);
    assert_eq!(report.morphs, 0);
    assert_eq!(report.parallax, 0);
    // 元素 1 的文本没有被打字机清空
    assert!(adapter.texts(ElementId(1)).is_empty());
}

#[test]
fn shutdown_stops_all_work() {
    let mut h = Harness::new(vec![
        ElementNode::new(1).attr("data-count", "900"),
        ElementNode::new(2).attr("data-typewriter", "").text("Hello"),
        ElementNode::new(3).attr("data-morph", ""),
        ElementNode::new(4).attr("data-parallax", ""),
        ElementNode::new(5).attr("data-animate", "fade"),
    ]);
    h.show(1);
    h.show(3);
    h.show(5);
    h.tick(16.0);

    let events = h.engine.shutdown();
    assert!(events.contains(&EngineEvent::CounterFinished {
        element: ElementId(1),
        value: 900
    }));
    assert!(events.contains(&EngineEvent::TypewriterFinished {
        element: ElementId(2)
    }));
    assert_eq!(h.adapter.last_text(ElementId(1)).as_deref(), Some("900"));
    assert_eq!(h.adapter.last_text(ElementId(2)).as_deref(), Some("Hello"));
    assert_eq!(h.adapter.last_opacity(ElementId(5)), Some(1.0));
    assert_eq!(h.observer.observed_count(), 0);
    assert!(h.engine.is_idle());

    let writes = h.adapter.mutations().len();
    h.engine.handle(EngineInput::scroll(300.0));
    h.engine.handle(EngineInput::price(true));
    h.run_until(10_000.0, 16.0);
    assert_eq!(h.adapter.mutations().len(), writes);
    assert_eq!(h.engine.morph_progress(ElementId(3)), None);
}

#[test]
fn price_toggle_lands_on_target() {
    let mut h = Harness::new(vec![
        ElementNode::new(1)
            .attr("data-monthly", "29")
            .attr("data-yearly", "290")
            .text("29"),
        ElementNode::new(2)
            .attr("data-monthly", "99")
            .attr("data-yearly", "990")
            .text("99"),
    ]);

    h.engine.handle(EngineInput::price(true));
    let events = h.run_until(1000.0, 16.0);
    let settled: Vec<&EngineEvent> = events
        .iter()
        .map(|(_, e)| e)
        .filter(|e| matches!(e, EngineEvent::PriceSettled { .. }))
        .collect();
    assert_eq!(settled.len(), 2);
    assert_eq!(h.adapter.last_text(ElementId(1)).as_deref(), Some("290"));
    assert_eq!(h.engine.price_value(ElementId(2)), Some(990));

    h.engine.handle(EngineInput::price(false));
    h.run_until(2000.0, 16.0);
    assert_eq!(h.adapter.last_text(ElementId(1)).as_deref(), Some("29"));
    assert!(h.engine.is_idle());
}

#[test]
fn extreme_price_values_settle_without_overflow() {
    let mut h = Harness::new(vec![
        ElementNode::new(1)
            .attr("data-monthly", "9223372036854775807")
            .attr("data-yearly", "-9223372036854775807")
            .text("0"),
    ]);

    h.engine.handle(EngineInput::price(true));
    h.tick(16.0);
    let events = h.run_until(1000.0, 16.0);

    assert!(events.iter().any(|(_, e)| *e
        == EngineEvent::PriceSettled {
            element: ElementId(1),
            value: -i64::MAX
        }));
    assert_eq!(
        h.adapter.last_text(ElementId(1)).as_deref(),
        Some("-9223372036854775807")
    );
}

#[test]
fn counter_waits_for_its_own_threshold() {
    let mut h = Harness::new(vec![
        ElementNode::new(1)
            .attr("data-animate", "fade")
            .attr("data-count", "5000")
            .text("0"),
    ]);
    let thresholds = h.engine.config().thresholds.clone();
    assert_eq!(
        h.observer.threshold(ElementId(1), TriggerPurpose::Counter),
        Some(thresholds.counter)
    );
    assert_eq!(
        h.observer.threshold(ElementId(1), TriggerPurpose::Entrance),
        Some(thresholds.entrance)
    );

    h.engine.handle(EngineInput::visibility_for(
        ElementId(1),
        TriggerPurpose::Entrance,
        true,
    ));
    h.run_until(1000.0, 16.0);
    assert_eq!(h.adapter.last_opacity(ElementId(1)), Some(1.0));
    assert_eq!(h.engine.counter_phase(ElementId(1)), Some(CounterPhase::Idle));
    assert!(h.adapter.texts(ElementId(1)).is_empty());

    h.engine.handle(EngineInput::visibility_for(
        ElementId(1),
        TriggerPurpose::Counter,
        true,
    ));
    h.run_until(4000.0, 16.0);
    assert_eq!(h.adapter.last_text(ElementId(1)).as_deref(), Some("5,000"));
}

#[test]
fn disabled_engine_leaves_page_static() {
    let config = EngineConfig {
        enabled: false,
        ..EngineConfig::default()
    };
    let mut h = Harness::with_config(
        vec![
            ElementNode::new(1).attr("data-animate", "fade"),
            ElementNode::new(2).attr("data-typewriter", "").text("Hello"),
            ElementNode::new(3).attr("data-parallax", ""),
        ],
        config,
    );
    h.show(1);
    h.engine.handle(EngineInput::scroll(100.0));
    h.run_until(2000.0, 16.0);

    assert!(h.adapter.mutations().is_empty());
    assert_eq!(h.observer.observed_count(), 0);
}

#[test]
fn mutation_log_is_serializable() {
    let mut h = Harness::new(vec![ElementNode::new(1).attr("data-hover", "card")]);
    h.engine.handle(EngineInput::PointerEntered {
        element: ElementId(1),
    });
    let log = h.adapter.take();
    let json = serde_json::to_string(&log).unwrap();
    let back: Vec<StyleMutation> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, log);
    assert!(h.adapter.mutations().is_empty());
}
