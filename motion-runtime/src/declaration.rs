//! # Declaration 模块
//!
//! 把元素上的声明属性解析为效果列表。
//!
//! 声明在扫描时读取一次，此后不可变。属性缺失表示该效果不适用；
//! 数值无效时退回文档化的默认值，并以 [`DeclarationError`] 警告的形式报告。
//!
//! | 属性 | 效果 |
//! |------|------|
//! | `data-animate` | fade / slide / scale 入场 |
//! | `data-stagger` | 分组错峰 |
//! | `data-count` | 数字计数器 |
//! | `data-typewriter` | 打字机 |
//! | `data-morph` | 形变循环 |
//! | `data-parallax` | 滚动视差 |
//! | `data-monthly` + `data-yearly` | 价格切换 |
//! | `data-hover` | 指针微交互（lift / card / icon / field） |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::{ElementId, ElementNode};
use crate::error::DeclarationError;
use crate::trigger::TriggerMode;

/// 滑入方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// 从左侧滑入
    #[default]
    Left,
    /// 从右侧滑入
    Right,
    /// 从下方向上滑入
    Up,
    /// 从上方向下滑入
    Down,
}

impl Direction {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

/// 入场效果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntranceKind {
    Fade,
    Slide(Direction),
    Scale,
}

/// 指针微交互样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoverStyle {
    /// 按钮：悬停上浮 2px，按下缩小
    Lift,
    /// 卡片：悬停上浮 8px 并放大
    Card,
    /// 图标：悬停旋转一周并放大
    Icon,
    /// 表单字段：获得焦点时上浮 2px
    Field,
}

/// 效果类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Fade,
    Slide,
    Scale,
    StaggerGroup,
    /// 分组中的子元素（由分组声明派生）
    StaggerMember,
    Counter,
    Typewriter,
    Morph,
    Parallax,
    Price,
    Hover,
}

/// 展示通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Opacity,
    Transform,
    Text,
    Border,
}

impl EffectKind {
    /// 效果名称（与声明属性中的写法一致）
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Fade => "fade",
            EffectKind::Slide => "slide",
            EffectKind::Scale => "scale",
            EffectKind::StaggerGroup => "stagger-group",
            EffectKind::StaggerMember => "stagger-member",
            EffectKind::Counter => "counter",
            EffectKind::Typewriter => "typewriter",
            EffectKind::Morph => "morph",
            EffectKind::Parallax => "parallax",
            EffectKind::Price => "price",
            EffectKind::Hover => "hover",
        }
    }

    /// 效果写入的展示通道
    pub fn channels(&self) -> &'static [Channel] {
        match self {
            EffectKind::Fade
            | EffectKind::Slide
            | EffectKind::Scale
            | EffectKind::StaggerMember => &[Channel::Opacity, Channel::Transform],
            EffectKind::StaggerGroup => &[],
            EffectKind::Counter | EffectKind::Price => &[Channel::Text],
            // 光标写入边框
            EffectKind::Typewriter => &[Channel::Text, Channel::Border],
            EffectKind::Morph => &[Channel::Border],
            EffectKind::Parallax | EffectKind::Hover => &[Channel::Transform],
        }
    }

    fn is_entrance(&self) -> bool {
        matches!(
            self,
            EffectKind::Fade | EffectKind::Slide | EffectKind::Scale | EffectKind::StaggerMember
        )
    }

    /// 两个效果放在同一元素上是否冲突
    ///
    /// 入场与指针交互分时共享变换通道：入场停在起始状态或过渡运行期间，指针输入被忽略。
    pub fn conflicts_with(&self, other: &EffectKind) -> bool {
        let time_shared = (self.is_entrance() && *other == EffectKind::Hover)
            || (*self == EffectKind::Hover && other.is_entrance());
        if time_shared {
            return false;
        }
        self.channels().iter().any(|c| other.channels().contains(c))
    }
}

/// 一个已解析的效果声明
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// fade / slide / scale 入场
    Entrance {
        kind: EntranceKind,
        duration_ms: Option<f64>,
        delay_ms: Option<f64>,
        mode: TriggerMode,
    },
    /// 分组错峰
    StaggerGroup {
        delay_ms: f64,
        children: Vec<ElementId>,
    },
    /// 计数器
    Counter { target: u64 },
    /// 打字机
    Typewriter { text: String, speed_ms: Option<f64> },
    /// 形变循环
    Morph,
    /// 滚动视差，`speed` 为显式速度
    Parallax { speed: Option<f64> },
    /// 价格切换
    Price { monthly: i64, yearly: i64 },
    /// 指针微交互
    Hover(HoverStyle),
}

impl Effect {
    /// 效果类型标签
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Entrance { kind, .. } => match kind {
                EntranceKind::Fade => EffectKind::Fade,
                EntranceKind::Slide(_) => EffectKind::Slide,
                EntranceKind::Scale => EffectKind::Scale,
            },
            Effect::StaggerGroup { .. } => EffectKind::StaggerGroup,
            Effect::Counter { .. } => EffectKind::Counter,
            Effect::Typewriter { .. } => EffectKind::Typewriter,
            Effect::Morph => EffectKind::Morph,
            Effect::Parallax { .. } => EffectKind::Parallax,
            Effect::Price { .. } => EffectKind::Price,
            Effect::Hover(_) => EffectKind::Hover,
        }
    }
}

/// 元素的触发声明
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDeclaration {
    pub element: ElementId,
    pub effects: Vec<Effect>,
}

impl TriggerDeclaration {
    /// 解析元素属性
    ///
    /// `default_stagger_ms` 用于 `data-stagger` 缺省、为 0 或无效时。
    ///
    /// # 返回
    /// 声明本身与解析中产生的警告
    pub fn parse(node: &ElementNode, default_stagger_ms: f64) -> (Self, Vec<DeclarationError>) {
        let mut parser = AttributeParser {
            node,
            warnings: Vec::new(),
        };
        let mut effects = Vec::new();

        if let Some(effect) = parser.entrance() {
            effects.push(effect);
        }
        if let Some(effect) = parser.stagger(default_stagger_ms) {
            effects.push(effect);
        }
        if let Some(effect) = parser.counter() {
            effects.push(effect);
        }
        if let Some(effect) = parser.typewriter() {
            effects.push(effect);
        }
        if let Some(effect) = parser.price() {
            effects.push(effect);
        }
        if node.has_attribute("data-morph") {
            effects.push(Effect::Morph);
        }
        if let Some(effect) = parser.parallax() {
            effects.push(effect);
        }
        if let Some(effect) = parser.hover() {
            effects.push(effect);
        }

        let declaration = Self {
            element: node.id,
            effects,
        };
        (declaration, parser.warnings)
    }

    /// 是否没有任何效果
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

struct AttributeParser<'a> {
    node: &'a ElementNode,
    warnings: Vec<DeclarationError>,
}

impl AttributeParser<'_> {
    fn invalid(&mut self, attribute: &str, value: &str) {
        self.warnings.push(DeclarationError::InvalidNumber {
            element: self.node.id,
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }

    fn unusable(&mut self, attribute: &str, value: &str) {
        self.warnings.push(DeclarationError::UnusableValue {
            element: self.node.id,
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }

    /// 可选的非负毫秒数，无效时警告并返回 `None`
    fn millis(&mut self, attribute: &str) -> Option<f64> {
        let raw = self.node.attribute(attribute)?;
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
            _ => {
                self.invalid(attribute, raw);
                None
            }
        }
    }

    fn entrance(&mut self) -> Option<Effect> {
        let raw = self.node.attribute("data-animate")?;
        let kind = match raw.trim() {
            "fade" => EntranceKind::Fade,
            "scale" => EntranceKind::Scale,
            "slide" => {
                let direction = match self.node.attribute("data-direction") {
                    None => Direction::default(),
                    Some(value) => Direction::parse(value).unwrap_or_else(|| {
                        self.warnings.push(DeclarationError::UnknownDirection {
                            element: self.node.id,
                            value: value.to_string(),
                        });
                        Direction::default()
                    }),
                };
                EntranceKind::Slide(direction)
            }
            other => {
                self.warnings.push(DeclarationError::UnknownEffect {
                    element: self.node.id,
                    value: other.to_string(),
                });
                return None;
            }
        };

        let mode = match self.node.attribute("data-once").map(str::trim) {
            Some("false") => TriggerMode::Persistent,
            _ => TriggerMode::OneShot,
        };

        Some(Effect::Entrance {
            kind,
            duration_ms: self.millis("data-duration"),
            delay_ms: self.millis("data-delay"),
            mode,
        })
    }

    fn stagger(&mut self, default_ms: f64) -> Option<Effect> {
        let raw = self.node.attribute("data-stagger")?;
        let delay_ms = if raw.trim().is_empty() {
            default_ms
        } else {
            match parse_leading_int(raw) {
                Some(value) if value > 0 => value as f64,
                Some(_) => default_ms,
                None => {
                    self.invalid("data-stagger", raw);
                    default_ms
                }
            }
        };
        Some(Effect::StaggerGroup {
            delay_ms,
            children: self.node.children.clone(),
        })
    }

    fn counter(&mut self) -> Option<Effect> {
        let raw = self.node.attribute("data-count")?;
        match parse_leading_int(raw) {
            Some(value) if value >= 0 => Some(Effect::Counter {
                target: value as u64,
            }),
            _ => {
                self.unusable("data-count", raw);
                None
            }
        }
    }

    fn typewriter(&mut self) -> Option<Effect> {
        if !self.node.has_attribute("data-typewriter") {
            return None;
        }
        let speed_ms = match self.node.attribute("data-speed") {
            None => None,
            Some(raw) => match parse_leading_int(raw) {
                Some(value) if value > 0 => Some(value as f64),
                _ => {
                    self.invalid("data-speed", raw);
                    None
                }
            },
        };
        Some(Effect::Typewriter {
            text: self.node.text.clone(),
            speed_ms,
        })
    }

    fn price(&mut self) -> Option<Effect> {
        let monthly_raw = self.node.attribute("data-monthly");
        let yearly_raw = self.node.attribute("data-yearly");
        if monthly_raw.is_none() && yearly_raw.is_none() {
            return None;
        }

        let monthly = monthly_raw.and_then(parse_leading_int);
        let yearly = yearly_raw.and_then(parse_leading_int);
        match (monthly, yearly) {
            (Some(monthly), Some(yearly)) => Some(Effect::Price { monthly, yearly }),
            _ => {
                if monthly.is_none() {
                    self.unusable("data-monthly", monthly_raw.unwrap_or_default());
                }
                if yearly.is_none() {
                    self.unusable("data-yearly", yearly_raw.unwrap_or_default());
                }
                None
            }
        }
    }

    fn parallax(&mut self) -> Option<Effect> {
        let raw = self.node.attribute("data-parallax")?;
        if raw.trim().is_empty() {
            return Some(Effect::Parallax { speed: None });
        }
        match raw.trim().parse::<f64>() {
            Ok(speed) if speed.is_finite() && speed > 0.0 => {
                Some(Effect::Parallax { speed: Some(speed) })
            }
            _ => {
                self.invalid("data-parallax", raw);
                Some(Effect::Parallax { speed: None })
            }
        }
    }

    fn hover(&mut self) -> Option<Effect> {
        let raw = self.node.attribute("data-hover")?;
        match raw.trim() {
            "lift" => Some(Effect::Hover(HoverStyle::Lift)),
            "card" => Some(Effect::Hover(HoverStyle::Card)),
            "icon" => Some(Effect::Hover(HoverStyle::Icon)),
            "field" => Some(Effect::Hover(HoverStyle::Field)),
            other => {
                self.warnings.push(DeclarationError::UnknownEffect {
                    element: self.node.id,
                    value: other.to_string(),
                });
                None
            }
        }
    }
}

/// 解析开头的整数部分
///
/// 与页面脚本常见的宽松解析一致：忽略前导空白，接受可选符号，读取连续数字，
/// 其后的任何字符都被忽略（`"5000+"` → 5000，`"1,200"` → 1）。没有数字时返回 `None`。
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// 展示通道占用表
///
/// 记录每个元素已被哪些效果占用；同一通道上的后来者被拒绝。
#[derive(Debug, Default)]
pub struct ChannelClaims {
    claims: HashMap<ElementId, Vec<EffectKind>>,
}

impl ChannelClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为元素占用效果所需的通道
    pub fn claim(&mut self, element: ElementId, kind: EffectKind) -> Result<(), DeclarationError> {
        let claimed = self.claims.entry(element).or_default();
        if let Some(first) = claimed.iter().find(|k| k.conflicts_with(&kind)) {
            return Err(DeclarationError::ConflictingEffects {
                element,
                first: first.name().to_string(),
                second: kind.name().to_string(),
            });
        }
        claimed.push(kind);
        Ok(())
    }

    /// 元素已占用的效果
    pub fn kinds(&self, element: ElementId) -> &[EffectKind] {
        self.claims.get(&element).map(Vec::as_slice).unwrap_or(&[])
    }
}
