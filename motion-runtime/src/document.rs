//! # Document 模块
//!
//! 宿主文档的只读描述。
//!
//! 元素由宿主拥有：engine 从不创建或销毁元素，只读取挂在元素上的声明属性，
//! 并通过 [`StyleAdapter`](crate::adapter::StyleAdapter) 写入展示状态。

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// 元素句柄
///
/// 由宿主分配的不透明标识符，engine 以它为键保存所有元素状态。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    /// 创建元素句柄
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 文档中的一个元素
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementNode {
    /// 元素句柄
    pub id: ElementId,
    /// 声明属性（如 `data-animate = "fade"`）
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// 初始文本内容
    #[serde(default)]
    pub text: String,
    /// 子元素（按文档顺序）
    #[serde(default)]
    pub children: Vec<ElementId>,
}

impl ElementNode {
    /// 创建没有属性的元素
    pub fn new(id: u64) -> Self {
        Self {
            id: ElementId::new(id),
            ..Self::default()
        }
    }

    /// 添加属性
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// 设置文本
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// 设置子元素
    pub fn children(mut self, children: impl IntoIterator<Item = u64>) -> Self {
        self.children = children.into_iter().map(ElementId::new).collect();
        self
    }

    /// 读取属性
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// 是否声明了某个属性
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// 宿主文档
///
/// `elements` 按文档顺序排列；stagger 子元素和 morph/parallax 的序号都依赖这个顺序。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<ElementNode>,
}

impl Document {
    /// 创建文档并检查 ID 唯一性
    pub fn new(elements: Vec<ElementNode>) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for element in &elements {
            if !seen.insert(element.id) {
                return Err(DocumentError::DuplicateId(element.id));
            }
        }
        Ok(Self { elements })
    }

    /// 从 JSON 解析文档
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let document: Document =
            serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))?;
        Self::new(document.elements)
    }

    /// 查找元素
    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// 所有元素 ID
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }
}
