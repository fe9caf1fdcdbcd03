//! # Session 模块
//!
//! 一次引擎会话：扫描页面，逐条送入输入，记录每一步写出的样式变更和事件。
//!
//! 没有产生任何变更或事件的输入（例如空闲时的帧）不进入记录。

use std::fmt;

use motion_runtime::{
    Document, Engine, EngineConfig, EngineEvent, EngineInput, RecordingAdapter, RecordingObserver,
    ScanReport, StyleMutation,
};
use serde::Serialize;
use tracing::{debug, info};

/// 宿主模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMode {
    /// 提供观察原语，可见性由输入脚本报告
    #[default]
    Observed,
    /// 没有观察原语，一次性效果在扫描时立即触发
    Degraded,
}

/// 记录中一步的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Scan,
    Input,
    Shutdown,
}

/// 记录中的一步
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<EngineInput>,
    pub mutations: Vec<StyleMutation>,
    pub events: Vec<EngineEvent>,
}

/// 会话记录
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    pub steps: Vec<Step>,
}

impl Transcript {
    /// 所有样式变更（按写出顺序）
    pub fn mutations(&self) -> impl Iterator<Item = &StyleMutation> {
        self.steps.iter().flat_map(|s| s.mutations.iter())
    }

    /// 所有事件（按产生顺序）
    pub fn events(&self) -> impl Iterator<Item = &EngineEvent> {
        self.steps.iter().flat_map(|s| s.events.iter())
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match (&step.stage, &step.input) {
                (Stage::Input, Some(input)) => writeln!(f, "== {} ==", describe_input(input))?,
                (Stage::Scan, _) => writeln!(f, "== scan ==")?,
                (Stage::Shutdown, _) | (Stage::Input, None) => writeln!(f, "== shutdown ==")?,
            }
            for mutation in &step.mutations {
                writeln!(f, "  {}", mutation)?;
            }
            for event in &step.events {
                writeln!(f, "  -> {}", event)?;
            }
        }
        Ok(())
    }
}

/// 输入的单行描述
pub fn describe_input(input: &EngineInput) -> String {
    match input {
        EngineInput::VisibilityChanged {
            element,
            purpose,
            visible,
        } => {
            let state = if *visible { "visible" } else { "hidden" };
            match purpose {
                Some(purpose) => format!("{} {} ({:?})", element, state, purpose),
                None => format!("{} {}", element, state),
            }
        }
        EngineInput::Tick { now_ms } => format!("tick {}ms", now_ms),
        EngineInput::ScrollChanged { position } => format!("scroll {}px", position),
        EngineInput::PriceToggled { yearly: true } => "price yearly".to_string(),
        EngineInput::PriceToggled { yearly: false } => "price monthly".to_string(),
        EngineInput::PointerEntered { element } => format!("{} pointer enter", element),
        EngineInput::PointerLeft { element } => format!("{} pointer leave", element),
        EngineInput::PointerPressed { element } => format!("{} pointer press", element),
        EngineInput::PointerReleased { element } => format!("{} pointer release", element),
        EngineInput::FocusGained { element } => format!("{} focus", element),
        EngineInput::FocusLost { element } => format!("{} blur", element),
    }
}

/// 一次引擎会话
pub struct Session {
    engine: Engine,
    adapter: RecordingAdapter,
    observer: Option<RecordingObserver>,
    report: ScanReport,
    transcript: Transcript,
}

impl Session {
    /// 创建引擎并扫描页面
    pub fn start(document: &Document, config: EngineConfig, mode: HostMode) -> Self {
        let adapter = RecordingAdapter::from_document(document);
        let observer = match mode {
            HostMode::Observed => Some(RecordingObserver::new()),
            HostMode::Degraded => None,
        };
        let boxed_observer = observer
            .clone()
            .map(|o| Box::new(o) as Box<dyn motion_runtime::VisibilityObserver>);

        let mut engine = Engine::new(config, Box::new(adapter.clone()), boxed_observer);
        let report = engine.scan(document);

        let mut session = Self {
            engine,
            adapter,
            observer,
            report,
            transcript: Transcript::default(),
        };
        session.record(Stage::Scan, None, Vec::new());
        session
    }

    /// 扫描结果
    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    /// 观察原语当前的观察数量（降级模式为 0）
    pub fn observed_count(&self) -> usize {
        self.observer
            .as_ref()
            .map_or(0, RecordingObserver::observed_count)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// 送入一条输入
    pub fn feed(&mut self, input: EngineInput) {
        let events = self.engine.handle(input.clone());
        self.record(Stage::Input, Some(input), events);
    }

    /// 依次送入多条输入
    pub fn feed_all(&mut self, inputs: impl IntoIterator<Item = EngineInput>) {
        for input in inputs {
            self.feed(input);
        }
    }

    /// 以固定帧间隔从 0 推进到 `until_ms`（含）
    pub fn play(&mut self, until_ms: f64, frame_ms: f64) {
        if !(frame_ms.is_finite() && frame_ms > 0.0) || !until_ms.is_finite() {
            return;
        }
        let frames = (until_ms.max(0.0) / frame_ms).floor() as u64;
        debug!(frames, frame_ms, "开始推进帧");
        for frame in 0..=frames {
            self.feed(EngineInput::tick(frame as f64 * frame_ms));
        }
    }

    /// 关闭引擎并结束会话
    pub fn finish(mut self, shutdown: bool) -> Transcript {
        if shutdown {
            let events = self.engine.shutdown();
            self.record(Stage::Shutdown, None, events);
        }
        info!(
            steps = self.transcript.steps.len(),
            idle = self.engine.is_idle(),
            "会话结束"
        );
        self.transcript
    }

    fn record(&mut self, stage: Stage, input: Option<EngineInput>, events: Vec<EngineEvent>) {
        let mutations = self.adapter.take();
        if stage == Stage::Input && mutations.is_empty() && events.is_empty() {
            return;
        }
        self.transcript.steps.push(Step {
            stage,
            input,
            mutations,
            events,
        });
    }
}
