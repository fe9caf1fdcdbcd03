//! # Event 模块
//!
//! engine 处理输入后报告给宿主的事件。
//!
//! 事件只用于通知与调试，可见变化已经通过 [`StyleAdapter`](crate::adapter::StyleAdapter) 写出。

use serde::{Deserialize, Serialize};

use crate::document::ElementId;
use crate::trigger::TriggerPurpose;

/// engine 产生的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineEvent {
    /// 可见性触发器触发
    TriggerFired {
        element: ElementId,
        purpose: TriggerPurpose,
        visible: bool,
    },

    /// 过渡结束等待，开始插值
    TransitionStarted { element: ElementId, at_ms: f64 },

    /// 过渡到达最终状态
    TransitionCompleted { element: ElementId, at_ms: f64 },

    /// 持续性入场离开视口，回到起始状态
    TransitionReset { element: ElementId },

    /// 计数器到达目标
    CounterFinished { element: ElementId, value: u64 },

    /// 打字机显示完全部文本并移除光标
    TypewriterFinished { element: ElementId },

    /// 形变暂停（离开视口）
    MorphPaused { element: ElementId, progress: f64 },

    /// 形变恢复（进入视口）
    MorphResumed { element: ElementId, progress: f64 },

    /// 价格过渡到达目标
    PriceSettled { element: ElementId, value: i64 },
}

impl EngineEvent {
    /// 事件涉及的元素
    pub fn element(&self) -> ElementId {
        match self {
            EngineEvent::TriggerFired { element, .. }
            | EngineEvent::TransitionStarted { element, .. }
            | EngineEvent::TransitionCompleted { element, .. }
            | EngineEvent::TransitionReset { element }
            | EngineEvent::CounterFinished { element, .. }
            | EngineEvent::TypewriterFinished { element }
            | EngineEvent::MorphPaused { element, .. }
            | EngineEvent::MorphResumed { element, .. }
            | EngineEvent::PriceSettled { element, .. } => *element,
        }
    }
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::TriggerFired {
                element,
                purpose,
                visible,
            } => write!(f, "{} trigger {:?} visible={}", element, purpose, visible),
            EngineEvent::TransitionStarted { element, at_ms } => {
                write!(f, "{} transition started @{}ms", element, at_ms)
            }
            EngineEvent::TransitionCompleted { element, at_ms } => {
                write!(f, "{} transition completed @{}ms", element, at_ms)
            }
            EngineEvent::TransitionReset { element } => write!(f, "{} transition reset", element),
            EngineEvent::CounterFinished { element, value } => {
                write!(f, "{} counter finished at {}", element, value)
            }
            EngineEvent::TypewriterFinished { element } => {
                write!(f, "{} typewriter finished", element)
            }
            EngineEvent::MorphPaused { element, progress } => {
                write!(f, "{} morph paused at {:.3}", element, progress)
            }
            EngineEvent::MorphResumed { element, progress } => {
                write!(f, "{} morph resumed at {:.3}", element, progress)
            }
            EngineEvent::PriceSettled { element, value } => {
                write!(f, "{} price settled at {}", element, value)
            }
        }
    }
}
