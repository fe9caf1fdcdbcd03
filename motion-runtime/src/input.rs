//! # Input 模块
//!
//! 宿主向 engine 传递的输入消息。
//!
//! ## 设计说明
//!
//! - engine 不读时钟、不监听滚动，所有外部变化都以 `EngineInput` 显式送入
//! - `Tick` 携带宿主的单调时间戳（毫秒），engine 自己计算与上一帧的差值
//! - 可见性变化由宿主的观察原语产生，可以批量送入

use serde::{Deserialize, Serialize};

use crate::document::ElementId;
use crate::trigger::TriggerPurpose;

/// 宿主向 engine 传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineInput {
    /// 元素跨越了可见阈值
    ///
    /// `purpose` 指明跨越的是哪个用途的阈值；省略时作用于元素的所有注册。
    VisibilityChanged {
        element: ElementId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        purpose: Option<TriggerPurpose>,
        visible: bool,
    },

    /// 帧回调
    ///
    /// `now_ms` 为宿主时间戳；第一帧与时钟回退时 `dt = 0`。
    Tick { now_ms: f64 },

    /// 页面滚动到绝对位置（px）
    ScrollChanged { position: f64 },

    /// 价格周期切换
    PriceToggled { yearly: bool },

    /// 指针进入元素
    PointerEntered { element: ElementId },

    /// 指针离开元素
    PointerLeft { element: ElementId },

    /// 指针在元素上按下
    PointerPressed { element: ElementId },

    /// 指针在元素上释放
    PointerReleased { element: ElementId },

    /// 元素获得焦点
    FocusGained { element: ElementId },

    /// 元素失去焦点
    FocusLost { element: ElementId },
}

impl EngineInput {
    /// 创建可见性输入
    pub fn visibility(element: ElementId, visible: bool) -> Self {
        Self::VisibilityChanged {
            element,
            purpose: None,
            visible,
        }
    }

    /// 创建针对单个用途阈值的可见性输入
    pub fn visibility_for(element: ElementId, purpose: TriggerPurpose, visible: bool) -> Self {
        Self::VisibilityChanged {
            element,
            purpose: Some(purpose),
            visible,
        }
    }

    /// 创建帧输入
    pub fn tick(now_ms: f64) -> Self {
        Self::Tick { now_ms }
    }

    /// 创建滚动输入
    pub fn scroll(position: f64) -> Self {
        Self::ScrollChanged { position }
    }

    /// 创建价格切换输入
    pub fn price(yearly: bool) -> Self {
        Self::PriceToggled { yearly }
    }

    /// 输入针对的元素（帧、滚动与价格输入是全局的）
    pub fn element(&self) -> Option<ElementId> {
        match self {
            EngineInput::VisibilityChanged { element, .. }
            | EngineInput::PointerEntered { element }
            | EngineInput::PointerLeft { element }
            | EngineInput::PointerPressed { element }
            | EngineInput::PointerReleased { element }
            | EngineInput::FocusGained { element }
            | EngineInput::FocusLost { element } => Some(*element),
            EngineInput::Tick { .. }
            | EngineInput::ScrollChanged { .. }
            | EngineInput::PriceToggled { .. } => None,
        }
    }
}

/// 帧时钟
///
/// 把宿主时间戳换算为帧间隔。
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进到 `now_ms`，返回与上一帧的间隔
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms {
            Some(last) if now_ms > last => now_ms - last,
            Some(last) if now_ms < last => return 0.0,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// 最近一帧的时间戳
    pub fn now(&self) -> Option<f64> {
        self.last_ms
    }
}
