//! 页面、输入脚本与配置的加载

use std::fs;
use std::path::Path;

use anyhow::Context;
use motion_runtime::{Document, EngineConfig, EngineInput};
use tracing::debug;

/// 读取页面描述
pub fn load_page(path: &Path) -> anyhow::Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取页面文件: {}", path.display()))?;
    let document = Document::from_json_str(&content)
        .with_context(|| format!("页面文件无效: {}", path.display()))?;
    debug!(path = %path.display(), elements = document.elements.len(), "页面已加载");
    Ok(document)
}

/// 读取输入脚本（`EngineInput` 数组）
pub fn load_events(path: &Path) -> anyhow::Result<Vec<EngineInput>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取输入脚本: {}", path.display()))?;
    let inputs: Vec<EngineInput> = serde_json::from_str(&content)
        .with_context(|| format!("输入脚本无效: {}", path.display()))?;
    debug!(path = %path.display(), inputs = inputs.len(), "输入脚本已加载");
    Ok(inputs)
}

/// 读取引擎配置
///
/// 未指定路径时使用默认配置；文件有问题时同样退回默认配置。
pub fn load_config(path: Option<&Path>) -> EngineConfig {
    match path {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::default(),
    }
}
