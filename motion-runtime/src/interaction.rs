//! # Interaction 模块
//!
//! 指针与焦点微交互：按钮的上浮 / 按压、卡片的悬停放大、图标旋转，以及表单字段的焦点上浮。
//!
//! 写入立即生效，过渡的平滑交给宿主的样式层。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::adapter::Surface;
use crate::animation::Transform;
use crate::declaration::HoverStyle;
use crate::document::ElementId;

/// 指针动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerAction {
    Enter,
    Leave,
    Press,
    Release,
    Focus,
    Blur,
}

#[derive(Debug, Clone, Copy)]
struct HoverState {
    style: HoverStyle,
    hovered: bool,
}

/// 指针交互跟踪器
#[derive(Debug, Default)]
pub struct InteractionTracker {
    elements: BTreeMap<ElementId, HoverState>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记交互元素
    pub fn add(&mut self, element: ElementId, style: HoverStyle) {
        self.elements.insert(
            element,
            HoverState {
                style,
                hovered: false,
            },
        );
    }

    /// 处理指针动作
    ///
    /// `blocked` 为 `true` 时（元素停在入场起始状态或正在过渡）输入被忽略。
    ///
    /// # 返回
    /// 是否写出了新的变换
    pub fn handle(
        &mut self,
        element: ElementId,
        action: PointerAction,
        blocked: bool,
        surface: &mut Surface,
    ) -> bool {
        let Some(state) = self.elements.get_mut(&element) else {
            return false;
        };
        if blocked {
            trace!(element = %element, action = ?action, "入场过渡进行中，忽略指针输入");
            return false;
        }

        match action {
            PointerAction::Enter => state.hovered = true,
            PointerAction::Leave => state.hovered = false,
            PointerAction::Press
            | PointerAction::Release
            | PointerAction::Focus
            | PointerAction::Blur => {}
        }

        match target_transform(state.style, action) {
            Some(transform) => surface.transform(element, &transform),
            None => false,
        }
    }

    /// 元素当前是否处于悬停状态
    pub fn is_hovered(&self, element: ElementId) -> bool {
        self.elements.get(&element).is_some_and(|s| s.hovered)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

/// 动作对应的变换，`None` 表示该样式不响应此动作
fn target_transform(style: HoverStyle, action: PointerAction) -> Option<Transform> {
    match (style, action) {
        (HoverStyle::Lift, PointerAction::Enter | PointerAction::Release) => {
            Some(Transform::translate_y(-2.0))
        }
        (HoverStyle::Lift, PointerAction::Press) => Some(Transform::scale(0.98)),
        (HoverStyle::Card, PointerAction::Enter) => {
            Some(Transform::translate_y(-8.0).with_scale(1.02))
        }
        (HoverStyle::Icon, PointerAction::Enter) => Some(Transform::rotate(360.0).with_scale(1.1)),
        (HoverStyle::Lift | HoverStyle::Card | HoverStyle::Icon, PointerAction::Leave) => {
            Some(Transform::identity())
        }
        (HoverStyle::Field, PointerAction::Focus) => Some(Transform::translate_y(-2.0)),
        (HoverStyle::Field, PointerAction::Blur) => Some(Transform::identity()),
        (HoverStyle::Lift, PointerAction::Focus | PointerAction::Blur)
        | (HoverStyle::Card | HoverStyle::Icon, _)
        | (HoverStyle::Field, _) => None,
    }
}
