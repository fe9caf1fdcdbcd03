//! # Error 模块
//!
//! 定义 motion-runtime 中使用的错误类型。
//!
//! 动效只是展示层的润色，没有致命错误：声明错误只作为警告收集，
//! 元素退回到默认参数或保持静态内容。

use thiserror::Error;

use crate::document::ElementId;

/// 声明错误
///
/// 扫描元素属性时发现的问题，不会中断扫描。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeclarationError {
    /// 无效的数值参数
    #[error("元素 {element}：属性 '{attribute}' 的值 '{value}' 无效，使用默认值")]
    InvalidNumber {
        element: ElementId,
        attribute: String,
        value: String,
    },

    /// 无法使用的数值参数（效果被跳过）
    #[error("元素 {element}：属性 '{attribute}' 的值 '{value}' 无法使用，效果已跳过")]
    UnusableValue {
        element: ElementId,
        attribute: String,
        value: String,
    },

    /// 未知的效果类型
    #[error("元素 {element}：未知的效果类型 '{value}'")]
    UnknownEffect { element: ElementId, value: String },

    /// 未知的方向
    #[error("元素 {element}：未知的方向 '{value}'，使用 left")]
    UnknownDirection { element: ElementId, value: String },

    /// 同一元素上的两个效果争用同一个展示通道
    #[error("元素 {element}：效果 '{second}' 与 '{first}' 争用同一展示通道，已跳过 '{second}'")]
    ConflictingEffects {
        element: ElementId,
        first: String,
        second: String,
    },
}

/// 文档错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// 文档解析失败
    #[error("文档解析失败: {0}")]
    Parse(String),

    /// 元素 ID 重复
    #[error("元素 ID 重复: {0}")]
    DuplicateId(ElementId),
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化/反序列化失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// motion-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// 声明错误
    #[error("声明错误: {0}")]
    Declaration(#[from] DeclarationError),

    /// 文档错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type MotionResult<T> = Result<T, MotionError>;
