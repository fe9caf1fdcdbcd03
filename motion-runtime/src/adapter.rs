//! # Adapter 模块
//!
//! 样式变更适配器：engine 产生可见变化的唯一出口。
//!
//! - [`StyleAdapter`]：宿主实现的 trait，必须同步生效，并能承受逐帧调用
//! - [`Surface`]：engine 内部使用的守卫层，每次写入前检查元素是否仍然存在
//! - [`RecordingAdapter`]：记录所有变更的内存实现，供测试与无界面宿主使用

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animation::{BorderShape, Transform, VisualState};
use crate::document::{Document, ElementId};

/// 边框样式
///
/// 打字机的闪烁光标与形变的圆角都写入边框通道。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BorderStyle {
    /// 清除边框装饰
    None,
    /// 右侧光标
    Caret { blinking: bool },
    /// 圆角形状
    Radius { shape: BorderShape },
}

impl BorderStyle {
    /// 组合为 CSS 风格的描述
    pub fn to_css(&self) -> String {
        match self {
            BorderStyle::None => "none".to_string(),
            BorderStyle::Caret { blinking: true } => "caret blink".to_string(),
            BorderStyle::Caret { blinking: false } => "caret".to_string(),
            BorderStyle::Radius { shape } => format!("radius {}", shape.to_css()),
        }
    }
}

/// 样式变更适配器
pub trait StyleAdapter {
    /// 元素是否仍然存在于宿主文档中
    fn contains(&self, element: ElementId) -> bool;

    /// 设置透明度 (0.0 - 1.0)
    fn set_opacity(&mut self, element: ElementId, value: f64);

    /// 设置变换
    fn set_transform(&mut self, element: ElementId, transform: &Transform);

    /// 设置文本内容
    fn set_text(&mut self, element: ElementId, text: &str);

    /// 设置边框样式
    fn set_border_style(&mut self, element: ElementId, style: &BorderStyle);
}

/// 守卫层
///
/// 元素在扫描与触发之间可能被宿主移除，所有写入都先检查存在性，缺失时静默跳过。
pub struct Surface {
    adapter: Box<dyn StyleAdapter>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new(adapter: Box<dyn StyleAdapter>) -> Self {
        Self { adapter }
    }

    /// 元素是否存在
    pub fn contains(&self, element: ElementId) -> bool {
        self.adapter.contains(element)
    }

    fn guard(&self, element: ElementId, what: &'static str) -> bool {
        let present = self.adapter.contains(element);
        if !present {
            trace!(element = %element, what, "元素不存在，跳过写入");
        }
        present
    }

    /// 写入可见状态（透明度 + 变换）
    pub fn visual(&mut self, element: ElementId, state: &VisualState) -> bool {
        if !self.guard(element, "visual") {
            return false;
        }
        self.adapter.set_opacity(element, state.opacity);
        self.adapter.set_transform(element, &state.transform);
        true
    }

    /// 写入变换
    pub fn transform(&mut self, element: ElementId, transform: &Transform) -> bool {
        if !self.guard(element, "transform") {
            return false;
        }
        self.adapter.set_transform(element, transform);
        true
    }

    /// 写入文本
    pub fn text(&mut self, element: ElementId, text: &str) -> bool {
        if !self.guard(element, "text") {
            return false;
        }
        self.adapter.set_text(element, text);
        true
    }

    /// 写入边框样式
    pub fn border(&mut self, element: ElementId, style: &BorderStyle) -> bool {
        if !self.guard(element, "border") {
            return false;
        }
        self.adapter.set_border_style(element, style);
        true
    }
}

/// 一次样式变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StyleMutation {
    Opacity {
        element: ElementId,
        value: f64,
    },
    Transform {
        element: ElementId,
        transform: Transform,
    },
    Text {
        element: ElementId,
        text: String,
    },
    Border {
        element: ElementId,
        style: BorderStyle,
    },
}

impl StyleMutation {
    /// 变更作用的元素
    pub fn element(&self) -> ElementId {
        match self {
            StyleMutation::Opacity { element, .. }
            | StyleMutation::Transform { element, .. }
            | StyleMutation::Text { element, .. }
            | StyleMutation::Border { element, .. } => *element,
        }
    }
}

impl std::fmt::Display for StyleMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleMutation::Opacity { element, value } => {
                write!(f, "{} opacity {:.3}", element, value)
            }
            StyleMutation::Transform { element, transform } => {
                write!(f, "{} transform {}", element, transform.to_css())
            }
            StyleMutation::Text { element, text } => write!(f, "{} text {:?}", element, text),
            StyleMutation::Border { element, style } => {
                write!(f, "{} border {}", element, style.to_css())
            }
        }
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    present: BTreeSet<ElementId>,
    log: Vec<StyleMutation>,
}

/// 记录型适配器
///
/// 克隆出的句柄共享同一份记录，把一个克隆交给 engine，保留另一个用于检查。
#[derive(Debug, Clone, Default)]
pub struct RecordingAdapter {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingAdapter {
    /// 创建包含指定元素的适配器
    pub fn new(elements: impl IntoIterator<Item = ElementId>) -> Self {
        let adapter = Self::default();
        adapter.state.borrow_mut().present.extend(elements);
        adapter
    }

    /// 创建包含文档中所有元素的适配器
    pub fn from_document(document: &Document) -> Self {
        Self::new(document.ids())
    }

    /// 模拟宿主移除元素
    pub fn remove(&self, element: ElementId) {
        self.state.borrow_mut().present.remove(&element);
    }

    /// 所有变更记录
    pub fn mutations(&self) -> Vec<StyleMutation> {
        self.state.borrow().log.clone()
    }

    /// 取出并清空变更记录
    pub fn take(&self) -> Vec<StyleMutation> {
        std::mem::take(&mut self.state.borrow_mut().log)
    }

    /// 某个元素的所有变更
    pub fn mutations_for(&self, element: ElementId) -> Vec<StyleMutation> {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|m| m.element() == element)
            .cloned()
            .collect()
    }

    /// 某个元素写入过的所有文本（按时间顺序）
    pub fn texts(&self, element: ElementId) -> Vec<String> {
        self.state
            .borrow()
            .log
            .iter()
            .filter_map(|m| match m {
                StyleMutation::Text { element: e, text } if *e == element => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// 某个元素最后一次写入的文本
    pub fn last_text(&self, element: ElementId) -> Option<String> {
        self.texts(element).pop()
    }

    /// 某个元素最后一次写入的透明度
    pub fn last_opacity(&self, element: ElementId) -> Option<f64> {
        self.state.borrow().log.iter().rev().find_map(|m| match m {
            StyleMutation::Opacity { element: e, value } if *e == element => Some(*value),
            _ => None,
        })
    }

    /// 某个元素最后一次写入的变换
    pub fn last_transform(&self, element: ElementId) -> Option<Transform> {
        self.state.borrow().log.iter().rev().find_map(|m| match m {
            StyleMutation::Transform {
                element: e,
                transform,
            } if *e == element => Some(*transform),
            _ => None,
        })
    }

    /// 某个元素最后一次写入的边框样式
    pub fn last_border(&self, element: ElementId) -> Option<BorderStyle> {
        self.state.borrow().log.iter().rev().find_map(|m| match m {
            StyleMutation::Border { element: e, style } if *e == element => Some(*style),
            _ => None,
        })
    }

    fn record(&self, mutation: StyleMutation) {
        self.state.borrow_mut().log.push(mutation);
    }
}

impl StyleAdapter for RecordingAdapter {
    fn contains(&self, element: ElementId) -> bool {
        self.state.borrow().present.contains(&element)
    }

    fn set_opacity(&mut self, element: ElementId, value: f64) {
        self.record(StyleMutation::Opacity { element, value });
    }

    fn set_transform(&mut self, element: ElementId, transform: &Transform) {
        self.record(StyleMutation::Transform {
            element,
            transform: *transform,
        });
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.record(StyleMutation::Text {
            element,
            text: text.to_string(),
        });
    }

    fn set_border_style(&mut self, element: ElementId, style: &BorderStyle) {
        self.record(StyleMutation::Border {
            element,
            style: *style,
        });
    }
}
