//! # Observer 模块
//!
//! 宿主提供的可见区域观察原语。engine 不实现相交几何，只告诉宿主观察哪些元素、
//! 用什么阈值，再由宿主把可见性变化作为 `EngineInput::VisibilityChanged` 送回来。

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::registry::TriggerPurpose;
use crate::document::ElementId;

/// 相交阈值配置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// 元素可见面积比例达到该值时视为可见 (0.0 - 1.0)
    pub ratio: f64,
    /// 视口底部外边距（px，负数表示在元素到达视口边缘前提前触发）
    #[serde(default)]
    pub bottom_margin_px: f64,
}

impl ThresholdConfig {
    pub const fn new(ratio: f64, bottom_margin_px: f64) -> Self {
        Self {
            ratio,
            bottom_margin_px,
        }
    }
}

/// 可见区域观察原语
///
/// 观察以 (元素, 用途) 为单位：同一元素上的入场与计数器各自使用自己的阈值，
/// 宿主报告可见性变化时可以带上用途，只触发对应的注册。
pub trait VisibilityObserver {
    /// 以用途的阈值开始观察元素
    fn observe(&mut self, element: ElementId, purpose: TriggerPurpose, threshold: &ThresholdConfig);

    /// 停止观察元素的某个用途（对未观察的组合调用是安全的）
    fn unobserve(&mut self, element: ElementId, purpose: TriggerPurpose);
}

type ObservationTable = BTreeMap<(ElementId, TriggerPurpose), ThresholdConfig>;

/// 记录型观察者
///
/// 不做任何几何计算，只记录当前的观察及其阈值，供测试与无界面宿主使用。
/// 内部使用 `Rc<RefCell<..>>`，通过 [`RecordingObserver::observed_ref`] 共享给调用方。
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    observed: Rc<RefCell<ObservationTable>>,
}

impl RecordingObserver {
    /// 创建新的记录型观察者
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取共享的观察表
    pub fn observed_ref(&self) -> Rc<RefCell<ObservationTable>> {
        self.observed.clone()
    }

    /// 元素是否有任何用途正在被观察
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.borrow().keys().any(|(e, _)| *e == element)
    }

    /// 元素某个用途的观察阈值
    pub fn threshold(&self, element: ElementId, purpose: TriggerPurpose) -> Option<ThresholdConfig> {
        self.observed.borrow().get(&(element, purpose)).copied()
    }

    /// 当前观察数量
    pub fn observed_count(&self) -> usize {
        self.observed.borrow().len()
    }
}

impl VisibilityObserver for RecordingObserver {
    fn observe(&mut self, element: ElementId, purpose: TriggerPurpose, threshold: &ThresholdConfig) {
        self.observed
            .borrow_mut()
            .insert((element, purpose), *threshold);
    }

    fn unobserve(&mut self, element: ElementId, purpose: TriggerPurpose) {
        self.observed.borrow_mut().remove(&(element, purpose));
    }
}
