//! # Motion CLI
//!
//! 无界面宿主：用 JSON 描述的页面和输入脚本驱动 [`motion_runtime::Engine`]，
//! 把引擎写出的样式变更与事件整理成可阅读的记录。
//!
//! ```text
//! page.json ──► Document ──┐
//!                          ├──► Session ──► Transcript ──► stdout (文本 / JSON)
//! events.json ─► inputs ───┘
//! ```
//!
//! - [`script`]：页面、输入与配置文件的加载
//! - [`session`]：一次引擎会话及其记录

pub mod script;
pub mod session;

pub use script::{load_config, load_events, load_page};
pub use session::{HostMode, Session, Stage, Step, Transcript};
