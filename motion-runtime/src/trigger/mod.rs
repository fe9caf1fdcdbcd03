//! # Trigger 模块
//!
//! 可见性触发：宿主观察原语的抽象与触发注册表。

mod observer;
mod registry;

pub use observer::{RecordingObserver, ThresholdConfig, VisibilityObserver};
pub use registry::{RegisterOutcome, TriggerFire, TriggerMode, TriggerPurpose, TriggerRegistry};
