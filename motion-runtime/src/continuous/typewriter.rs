//! 打字机：逐字显示扫描时捕获的文本。
//!
//! 时间线（`wait` 为初始等待，`speed` 为字符间隔）：
//!
//! ```text
//! 可见 ──wait──> 第 1 个字符 ──speed──> 第 2 个字符 ... 最后一个字符 ──speed──> 移除光标
//! ```

use serde::{Deserialize, Serialize};

/// 打字机阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypewriterPhase {
    /// 尚未可见（文本已清空，光标闪烁）
    #[default]
    Idle,
    /// 可见后的初始等待
    Waiting,
    Typing,
    /// 全部显示，光标已移除
    Finished,
}

/// 一次推进的结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypewriterStep {
    /// 显示文本变化时的新文本
    pub text: Option<String>,
    /// 本次推进是否移除了光标
    pub caret_removed: bool,
}

/// 单个打字机
#[derive(Debug, Clone)]
pub struct TypewriterRun {
    chars: Vec<char>,
    shown: usize,
    initial_wait_ms: f64,
    speed_ms: f64,
    /// 距离下一个动作的剩余时间
    remaining_ms: f64,
    phase: TypewriterPhase,
}

impl TypewriterRun {
    pub fn new(text: &str, initial_wait_ms: f64, speed_ms: f64) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            initial_wait_ms: initial_wait_ms.max(0.0),
            speed_ms: speed_ms.max(0.0),
            remaining_ms: 0.0,
            phase: TypewriterPhase::Idle,
        }
    }

    /// 元素可见，开始初始等待（重复调用无效）
    pub fn start(&mut self) {
        if self.phase == TypewriterPhase::Idle {
            self.phase = TypewriterPhase::Waiting;
            self.remaining_ms = self.initial_wait_ms;
        }
    }

    /// 推进 `dt` 毫秒
    ///
    /// 一帧较长时可能一次显示多个字符。
    pub fn update(&mut self, dt: f64) -> TypewriterStep {
        let mut step = TypewriterStep::default();
        if !matches!(
            self.phase,
            TypewriterPhase::Waiting | TypewriterPhase::Typing
        ) {
            return step;
        }

        let before = self.shown;
        self.remaining_ms -= dt.max(0.0);

        while self.remaining_ms <= 0.0 {
            if self.shown < self.chars.len() {
                self.phase = TypewriterPhase::Typing;
                self.shown += 1;
                self.remaining_ms += self.speed_ms;
            } else {
                self.phase = TypewriterPhase::Finished;
                step.caret_removed = true;
                break;
            }
        }

        if self.shown != before {
            step.text = Some(self.visible_text());
        }
        step
    }

    /// 直接显示全部文本并移除光标
    pub fn finish(&mut self) -> TypewriterStep {
        if self.phase == TypewriterPhase::Finished {
            return TypewriterStep::default();
        }
        let changed = self.shown != self.chars.len();
        self.shown = self.chars.len();
        self.phase = TypewriterPhase::Finished;
        TypewriterStep {
            text: changed.then(|| self.visible_text()),
            caret_removed: true,
        }
    }

    /// 当前已显示的文本
    pub fn visible_text(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    /// 完整文本
    pub fn full_text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }
}
