//! # Motion Runtime
//!
//! 页面动效的调度核心：可见性触发的入场效果、分组错峰，以及逐帧推进的持续效果。
//!
//! ## 架构概述
//!
//! `motion-runtime` 是纯逻辑核心，不依赖任何 IO、布局或渲染引擎。
//! 它通过 **输入驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                                 Engine
//!   │                                    │
//!   │──── scan(Document) ───────────────►│ 解析声明、注册触发器
//!   │◄─── VisibilityObserver::observe ───│
//!   │                                    │
//!   │──── EngineInput ──────────────────►│ handle()
//!   │◄─── StyleAdapter::set_* ───────────│ 同步写出样式
//!   │◄─── Vec<EngineEvent> ──────────────│
//!   │                                    │
//! ```
//!
//! ## 核心类型
//!
//! - [`Engine`]：持有所有注册表与运行状态的唯一实例
//! - [`EngineInput`]：宿主向引擎传递的输入（可见性、帧、滚动、价格、指针）
//! - [`EngineEvent`]：引擎报告的事件
//! - [`StyleAdapter`] / [`VisibilityObserver`]：宿主实现的两个接口
//! - [`EngineConfig`]：时长、延迟与阈值配置
//!
//! ## 使用示例
//!
//! ```ignore
//! use motion_runtime::{Document, Engine, EngineConfig, EngineInput};
//!
//! let document = Document::from_json_str(page_json)?;
//! let mut engine = Engine::new(EngineConfig::default(), Box::new(adapter), Some(Box::new(observer)));
//! let report = engine.scan(&document);
//!
//! // 主循环
//! loop {
//!     for element in host.visibility_changes() {
//!         engine.handle(EngineInput::visibility(element.id, element.visible));
//!     }
//!     engine.handle(EngineInput::tick(host.now_ms()));
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`animation`]：缓动、过渡时间轴、变换与形状
//! - [`trigger`]：可见性触发注册表
//! - [`declaration`]：声明属性解析与通道冲突检测
//! - [`sequencer`]：入场过渡与分组错峰
//! - [`continuous`]：计数器、打字机、形变、视差、价格
//! - [`interaction`]：指针微交互
//! - [`adapter`]：样式变更适配器
//! - [`engine`]：引擎

pub mod adapter;
pub mod animation;
pub mod config;
pub mod continuous;
pub mod declaration;
pub mod document;
pub mod engine;
pub mod error;
pub mod event;
pub mod input;
pub mod interaction;
pub mod sequencer;
pub mod trigger;

// 重导出核心类型
pub use adapter::{BorderStyle, RecordingAdapter, StyleAdapter, StyleMutation, Surface};
pub use animation::{
    BorderShape, EasingFunction, Transform, Tween, TweenState, Vec2, VisualState, ease_in,
    ease_in_out, ease_out,
};
pub use config::EngineConfig;
pub use continuous::{CounterPhase, TypewriterPhase, group_thousands};
pub use declaration::{Direction, Effect, EffectKind, EntranceKind, HoverStyle, TriggerDeclaration};
pub use document::{Document, ElementId, ElementNode};
pub use engine::{Engine, ScanReport};
pub use error::{ConfigError, DeclarationError, DocumentError, MotionError, MotionResult};
pub use event::EngineEvent;
pub use input::EngineInput;
pub use trigger::{RecordingObserver, ThresholdConfig, TriggerMode, TriggerPurpose, VisibilityObserver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let document = Document::new(vec![ElementNode::new(1).attr("data-animate", "fade")]).unwrap();
        let adapter = RecordingAdapter::from_document(&document);
        let mut engine = Engine::new(
            EngineConfig::default(),
            Box::new(adapter),
            Some(Box::new(RecordingObserver::new())),
        );

        let report = engine.scan(&document);
        assert_eq!(report.entrances, 1);

        let _events = engine.handle(EngineInput::tick(0.0));
        let _easing = EasingFunction::EaseInOut.apply(0.5);
        let _css = Transform::identity().to_css();
    }
}
