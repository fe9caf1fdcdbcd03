//! # Registry 模块
//!
//! 可见性触发注册表。
//!
//! ## 语义
//!
//! - **一次性**：第一次可见时触发；注册先被标记为 `fired` 并移除（停止观察），
//!   再把触发结果交给调用方，重复的可见事件不会再次进入
//! - **持续性**：每次跨越阈值（可见 ↔ 不可见）都报告一次，相同状态的重复报告被去重
//! - **降级**：宿主没有观察原语时，一次性注册立即触发，持续性注册被忽略
//!
//! 每个注册对应宿主的一份观察，阈值取自该用途的配置。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::observer::{ThresholdConfig, VisibilityObserver};
use crate::document::ElementId;

/// 触发用途
///
/// 同一元素每种用途最多一个注册。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPurpose {
    /// 入场效果（fade/slide/scale）
    Entrance,
    /// 分组错峰入场
    Stagger,
    /// 数字计数器
    Counter,
    /// 打字机
    Typewriter,
    /// 形变循环
    Morph,
}

impl TriggerPurpose {
    /// 所有用途（同一元素上多个用途同时触发时按此顺序报告）
    pub const ALL: [TriggerPurpose; 5] = [
        TriggerPurpose::Entrance,
        TriggerPurpose::Stagger,
        TriggerPurpose::Counter,
        TriggerPurpose::Typewriter,
        TriggerPurpose::Morph,
    ];
}

/// 触发模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerMode {
    /// 触发一次后停止观察
    OneShot,
    /// 报告每一次可见性变化
    Persistent,
}

/// 注册结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// 已交给宿主观察
    Observing,
    /// 降级模式：一次性注册立即触发，调用方应马上运行效果
    FiredImmediately,
    /// 降级模式：持续性注册被忽略
    Ignored,
    /// 该元素的此用途已有注册
    AlreadyRegistered,
}

/// 一次触发
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerFire {
    pub element: ElementId,
    pub purpose: TriggerPurpose,
    pub mode: TriggerMode,
    /// 一次性触发总是 `true`
    pub visible: bool,
}

/// 单个注册
#[derive(Debug, Clone)]
struct Registration {
    mode: TriggerMode,
    /// 一次性注册是否已触发
    fired: bool,
    /// 持续性注册最近一次报告的可见性
    last_visible: Option<bool>,
}

/// 可见性触发注册表
pub struct TriggerRegistry {
    /// 宿主观察原语（`None` 表示不可用，进入降级模式）
    observer: Option<Box<dyn VisibilityObserver>>,
    /// (元素, 用途) -> 注册
    registrations: HashMap<(ElementId, TriggerPurpose), Registration>,
}

impl std::fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerRegistry")
            .field("degraded", &self.is_degraded())
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

impl TriggerRegistry {
    /// 创建注册表
    pub fn new(observer: Option<Box<dyn VisibilityObserver>>) -> Self {
        if observer.is_none() {
            warn!("可见区域观察原语不可用，触发器降级为立即触发");
        }
        Self {
            observer,
            registrations: HashMap::new(),
        }
    }

    /// 是否处于降级模式
    pub fn is_degraded(&self) -> bool {
        self.observer.is_none()
    }

    /// 注册一次性触发
    pub fn register_one_shot(
        &mut self,
        element: ElementId,
        purpose: TriggerPurpose,
        threshold: &ThresholdConfig,
    ) -> RegisterOutcome {
        if self.is_degraded() {
            debug!(element = %element, purpose = ?purpose, "降级模式：一次性触发立即执行");
            return RegisterOutcome::FiredImmediately;
        }
        self.insert(element, purpose, TriggerMode::OneShot, threshold)
    }

    /// 注册持续性触发
    pub fn register_persistent(
        &mut self,
        element: ElementId,
        purpose: TriggerPurpose,
        threshold: &ThresholdConfig,
    ) -> RegisterOutcome {
        if self.is_degraded() {
            debug!(element = %element, purpose = ?purpose, "降级模式：忽略持续性触发");
            return RegisterOutcome::Ignored;
        }
        self.insert(element, purpose, TriggerMode::Persistent, threshold)
    }

    fn insert(
        &mut self,
        element: ElementId,
        purpose: TriggerPurpose,
        mode: TriggerMode,
        threshold: &ThresholdConfig,
    ) -> RegisterOutcome {
        let key = (element, purpose);
        if self.registrations.contains_key(&key) {
            return RegisterOutcome::AlreadyRegistered;
        }

        self.registrations.insert(
            key,
            Registration {
                mode,
                fired: false,
                last_visible: None,
            },
        );

        if let Some(observer) = self.observer.as_mut() {
            observer.observe(element, purpose, threshold);
        }

        debug!(
            element = %element,
            purpose = ?purpose,
            mode = ?mode,
            ratio = threshold.ratio,
            "注册触发器"
        );
        RegisterOutcome::Observing
    }

    /// 注销元素的所有注册
    ///
    /// 幂等：对没有注册的元素调用是安全的。
    pub fn unregister(&mut self, element: ElementId) {
        for purpose in TriggerPurpose::ALL {
            self.unregister_purpose(element, purpose);
        }
    }

    /// 注销元素某个用途的注册
    pub fn unregister_purpose(&mut self, element: ElementId, purpose: TriggerPurpose) {
        if self.registrations.remove(&(element, purpose)).is_some() {
            self.release(element, purpose);
        }
    }

    fn release(&mut self, element: ElementId, purpose: TriggerPurpose) {
        if let Some(observer) = self.observer.as_mut() {
            observer.unobserve(element, purpose);
        }
    }

    /// 处理宿主报告的可见性变化
    ///
    /// `only` 为 `Some` 时只处理该用途的注册（宿主按各自阈值分别报告），
    /// 为 `None` 时报告作用于元素的所有注册。
    ///
    /// # 返回
    /// 本次变化产生的触发，按 [`TriggerPurpose::ALL`] 的顺序排列
    pub fn handle_visibility(
        &mut self,
        element: ElementId,
        only: Option<TriggerPurpose>,
        visible: bool,
    ) -> Vec<TriggerFire> {
        let mut fires = Vec::new();

        for purpose in TriggerPurpose::ALL
            .into_iter()
            .filter(|p| only.is_none_or(|o| o == *p))
        {
            let key = (element, purpose);
            let Some(registration) = self.registrations.get_mut(&key) else {
                continue;
            };

            match registration.mode {
                TriggerMode::OneShot => {
                    if !visible || registration.fired {
                        continue;
                    }
                    // 先标记并停止观察，再交出触发结果
                    registration.fired = true;
                    self.registrations.remove(&key);
                    self.release(element, purpose);
                    fires.push(TriggerFire {
                        element,
                        purpose,
                        mode: TriggerMode::OneShot,
                        visible: true,
                    });
                }
                TriggerMode::Persistent => {
                    if registration.last_visible == Some(visible) {
                        continue;
                    }
                    registration.last_visible = Some(visible);
                    fires.push(TriggerFire {
                        element,
                        purpose,
                        mode: TriggerMode::Persistent,
                        visible,
                    });
                }
            }
        }

        if fires.is_empty() {
            trace!(element = %element, visible, "可见性变化未产生触发");
        }
        fires
    }

    /// 注销所有注册并停止所有观察
    pub fn clear(&mut self) {
        let keys: Vec<(ElementId, TriggerPurpose)> = self.registrations.keys().copied().collect();
        self.registrations.clear();
        for (element, purpose) in keys {
            self.release(element, purpose);
        }
    }

    /// 元素的某个用途是否已注册
    pub fn is_registered(&self, element: ElementId, purpose: TriggerPurpose) -> bool {
        self.registrations.contains_key(&(element, purpose))
    }

    /// 当前注册数量
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
