//! 数字计数器：从 0 按固定步长逐帧计数到目标值。

use serde::{Deserialize, Serialize};

/// 计数器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterPhase {
    /// 尚未可见
    #[default]
    Idle,
    Running,
    /// 已到达目标
    Done,
}

/// 单个计数器
///
/// 每帧前进 `target / (duration / frame_interval)`，显示值向下取整并按千位分组。
#[derive(Debug, Clone)]
pub struct CounterRun {
    target: u64,
    increment: f64,
    current: f64,
    phase: CounterPhase,
    displayed: Option<String>,
}

impl CounterRun {
    pub fn new(target: u64, duration_ms: f64, frame_interval_ms: f64) -> Self {
        let frames = if frame_interval_ms > 0.0 {
            (duration_ms / frame_interval_ms).max(1.0)
        } else {
            1.0
        };
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            phase: CounterPhase::Idle,
            displayed: None,
        }
    }

    /// 开始计数（重复调用无效）
    pub fn start(&mut self) {
        if self.phase == CounterPhase::Idle {
            self.phase = CounterPhase::Running;
        }
    }

    /// 前进一步
    ///
    /// # 返回
    /// 显示文本发生变化时返回新文本
    pub fn step(&mut self) -> Option<String> {
        if self.phase != CounterPhase::Running {
            return None;
        }
        self.current += self.increment;
        let value = if self.current < self.target as f64 {
            self.current.floor() as u64
        } else {
            self.phase = CounterPhase::Done;
            self.target
        };
        self.show(value)
    }

    /// 直接跳到目标值
    pub fn finish(&mut self) -> Option<String> {
        if self.phase == CounterPhase::Done {
            return None;
        }
        self.phase = CounterPhase::Done;
        self.current = self.target as f64;
        self.show(self.target)
    }

    fn show(&mut self, value: u64) -> Option<String> {
        let text = group_thousands(value);
        if self.displayed.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.displayed = Some(text.clone());
        Some(text)
    }

    pub fn phase(&self) -> CounterPhase {
        self.phase
    }

    pub fn target(&self) -> u64 {
        self.target
    }
}

/// 按千位分组格式化（`5000` → `"5,000"`）
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
