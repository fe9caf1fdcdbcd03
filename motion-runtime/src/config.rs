//! # Config 模块
//!
//! 引擎配置，集中管理所有时长、延迟与阈值。
//!
//! ## 配置来源
//!
//! 1. 配置文件（JSON，缺失字段取默认值）
//! 2. 默认值（与页面脚本原有的节奏一致）
//!
//! `enabled = false` 是调用方的全局开关：关闭后 engine 不注册任何触发器、不写任何样式，
//! 页面保持静态最终状态。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::animation::EasingFunction;
use crate::error::ConfigError;
use crate::trigger::ThresholdConfig;

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 是否启用所有动效
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 一帧的名义时长（毫秒），计数器按帧推进
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f64,

    /// 入场效果配置
    #[serde(default)]
    pub entrance: EntranceConfig,

    /// 分组错峰配置
    #[serde(default)]
    pub stagger: StaggerConfig,

    /// 计数器配置
    #[serde(default)]
    pub counter: CounterConfig,

    /// 打字机配置
    #[serde(default)]
    pub typewriter: TypewriterConfig,

    /// 形变配置
    #[serde(default)]
    pub morph: MorphConfig,

    /// 视差配置
    #[serde(default)]
    pub parallax: ParallaxConfig,

    /// 价格切换配置
    #[serde(default)]
    pub price: PriceConfig,

    /// 各触发用途的可见阈值
    #[serde(default)]
    pub thresholds: ThresholdSet,
}

/// 单个入场效果的时长与延迟
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntranceTiming {
    pub duration_ms: f64,
    pub delay_ms: f64,
}

/// 入场效果配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceConfig {
    #[serde(default = "default_fade_timing")]
    pub fade: EntranceTiming,

    #[serde(default = "default_slide_timing")]
    pub slide: EntranceTiming,

    #[serde(default = "default_scale_timing")]
    pub scale: EntranceTiming,

    /// 默认缓动
    #[serde(default)]
    pub easing: EasingFunction,

    /// fade 起始的向下偏移（px）
    #[serde(default = "default_fade_offset_px")]
    pub fade_offset_px: f64,

    /// slide 起始的偏移距离（px）
    #[serde(default = "default_slide_offset_px")]
    pub slide_offset_px: f64,

    /// scale 起始缩放
    #[serde(default = "default_scale_from")]
    pub scale_from: f64,
}

/// 分组错峰配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// 相邻子元素的默认延迟（毫秒）
    #[serde(default = "default_stagger_delay_ms")]
    pub delay_ms: f64,

    /// 每个子元素的过渡时长（毫秒）
    #[serde(default = "default_stagger_duration_ms")]
    pub duration_ms: f64,

    /// 子元素起始的向下偏移（px）
    #[serde(default = "default_stagger_offset_px")]
    pub offset_px: f64,
}

/// 计数器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_counter_duration_ms")]
    pub duration_ms: f64,
}

/// 打字机配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// 可见后开始打字前的等待（毫秒）
    #[serde(default = "default_typewriter_initial_wait_ms")]
    pub initial_wait_ms: f64,

    /// 每个字符的间隔（毫秒）
    #[serde(default = "default_typewriter_speed_ms")]
    pub speed_ms: f64,
}

/// 形变配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphConfig {
    /// 第一个形变元素的周期（毫秒）
    #[serde(default = "default_morph_base_cycle_ms")]
    pub base_cycle_ms: f64,

    /// 每个后续形变元素增加的周期（毫秒）
    #[serde(default = "default_morph_cycle_step_ms")]
    pub cycle_step_ms: f64,
}

/// 视差配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxConfig {
    /// 速度步长：第 i 个视差元素的速度为 `(i + 1) × speed_step`
    #[serde(default = "default_parallax_speed_step")]
    pub speed_step: f64,
}

/// 价格切换配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    #[serde(default = "default_price_duration_ms")]
    pub duration_ms: f64,
}

/// 各触发用途的可见阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    #[serde(default = "default_entrance_threshold")]
    pub entrance: ThresholdConfig,

    #[serde(default = "default_stagger_threshold")]
    pub stagger: ThresholdConfig,

    #[serde(default = "default_counter_threshold")]
    pub counter: ThresholdConfig,

    #[serde(default)]
    pub typewriter: ThresholdConfig,

    #[serde(default)]
    pub morph: ThresholdConfig,
}

// 默认值函数
fn default_enabled() -> bool {
    true
}

fn default_frame_interval_ms() -> f64 {
    16.0
}

fn default_fade_timing() -> EntranceTiming {
    EntranceTiming {
        duration_ms: 600.0,
        delay_ms: 100.0,
    }
}

fn default_slide_timing() -> EntranceTiming {
    EntranceTiming {
        duration_ms: 800.0,
        delay_ms: 150.0,
    }
}

fn default_scale_timing() -> EntranceTiming {
    EntranceTiming {
        duration_ms: 500.0,
        delay_ms: 200.0,
    }
}

fn default_fade_offset_px() -> f64 {
    30.0
}

fn default_slide_offset_px() -> f64 {
    50.0
}

fn default_scale_from() -> f64 {
    0.8
}

fn default_stagger_delay_ms() -> f64 {
    100.0
}

fn default_stagger_duration_ms() -> f64 {
    600.0
}

fn default_stagger_offset_px() -> f64 {
    20.0
}

fn default_counter_duration_ms() -> f64 {
    2000.0
}

fn default_typewriter_initial_wait_ms() -> f64 {
    500.0
}

fn default_typewriter_speed_ms() -> f64 {
    100.0
}

fn default_morph_base_cycle_ms() -> f64 {
    8000.0
}

fn default_morph_cycle_step_ms() -> f64 {
    2000.0
}

fn default_parallax_speed_step() -> f64 {
    0.5
}

fn default_price_duration_ms() -> f64 {
    500.0
}

fn default_entrance_threshold() -> ThresholdConfig {
    ThresholdConfig::new(0.1, -100.0)
}

fn default_stagger_threshold() -> ThresholdConfig {
    ThresholdConfig::new(0.1, 0.0)
}

fn default_counter_threshold() -> ThresholdConfig {
    ThresholdConfig::new(0.5, 0.0)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            frame_interval_ms: default_frame_interval_ms(),
            entrance: EntranceConfig::default(),
            stagger: StaggerConfig::default(),
            counter: CounterConfig::default(),
            typewriter: TypewriterConfig::default(),
            morph: MorphConfig::default(),
            parallax: ParallaxConfig::default(),
            price: PriceConfig::default(),
            thresholds: ThresholdSet::default(),
        }
    }
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            fade: default_fade_timing(),
            slide: default_slide_timing(),
            scale: default_scale_timing(),
            easing: EasingFunction::default(),
            fade_offset_px: default_fade_offset_px(),
            slide_offset_px: default_slide_offset_px(),
            scale_from: default_scale_from(),
        }
    }
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_stagger_delay_ms(),
            duration_ms: default_stagger_duration_ms(),
            offset_px: default_stagger_offset_px(),
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration_ms(),
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            initial_wait_ms: default_typewriter_initial_wait_ms(),
            speed_ms: default_typewriter_speed_ms(),
        }
    }
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            base_cycle_ms: default_morph_base_cycle_ms(),
            cycle_step_ms: default_morph_cycle_step_ms(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed_step: default_parallax_speed_step(),
        }
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_price_duration_ms(),
        }
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            entrance: default_entrance_threshold(),
            stagger: default_stagger_threshold(),
            counter: default_counter_threshold(),
            typewriter: ThresholdConfig::default(),
            morph: ThresholdConfig::default(),
        }
    }
}

impl EngineConfig {
    /// 从 JSON 字符串解析配置
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置文件
    ///
    /// 文件不存在、解析失败或验证失败时返回默认配置并记录警告，动效从不阻塞页面。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件读取失败，使用默认配置");
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(config) => {
                info!(path = ?path, "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件无效，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms > 0.0) {
            return Err(ConfigError::Validation(
                "frame_interval_ms 必须为正数".to_string(),
            ));
        }

        let durations = [
            ("entrance.fade.duration_ms", self.entrance.fade.duration_ms),
            ("entrance.fade.delay_ms", self.entrance.fade.delay_ms),
            ("entrance.slide.duration_ms", self.entrance.slide.duration_ms),
            ("entrance.slide.delay_ms", self.entrance.slide.delay_ms),
            ("entrance.scale.duration_ms", self.entrance.scale.duration_ms),
            ("entrance.scale.delay_ms", self.entrance.scale.delay_ms),
            ("stagger.delay_ms", self.stagger.delay_ms),
            ("stagger.duration_ms", self.stagger.duration_ms),
            ("counter.duration_ms", self.counter.duration_ms),
            ("typewriter.initial_wait_ms", self.typewriter.initial_wait_ms),
            ("typewriter.speed_ms", self.typewriter.speed_ms),
            ("morph.base_cycle_ms", self.morph.base_cycle_ms),
            ("morph.cycle_step_ms", self.morph.cycle_step_ms),
            ("price.duration_ms", self.price.duration_ms),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Validation(format!("{} 不能为负数", name)));
            }
        }

        if self.morph.base_cycle_ms <= 0.0 {
            return Err(ConfigError::Validation(
                "morph.base_cycle_ms 必须为正数".to_string(),
            ));
        }

        let thresholds = [
            ("thresholds.entrance", &self.thresholds.entrance),
            ("thresholds.stagger", &self.thresholds.stagger),
            ("thresholds.counter", &self.thresholds.counter),
            ("thresholds.typewriter", &self.thresholds.typewriter),
            ("thresholds.morph", &self.thresholds.morph),
        ];
        for (name, threshold) in thresholds {
            if !(0.0..=1.0).contains(&threshold.ratio) {
                return Err(ConfigError::Validation(format!(
                    "{}.ratio 必须在 0.0 - 1.0 之间",
                    name
                )));
            }
        }

        Ok(())
    }
}
