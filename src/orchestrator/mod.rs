//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层把控制台输入、应用状态和服务层串起来，是整个客户端的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主结构
//! - 管理应用生命周期（初始化、运行）
//! - 读取命令，调用服务层，再把结果交给 `AppState`
//! - 把错误转换为界面上的提示，不中断主循环
//!
//! ### `app_state` - 应用状态
//! - 标签页、主题、输入框、预览、历史记录、弹窗
//! - 只能通过 `reduce(AppAction)` 修改
//!
//! ### `console` - 命令解析
//!
//! ### `render` - 文本渲染，只读状态
//!
//! ## 层次关系
//!
//! ```text
//! app (读取命令 / 输出界面)
//!     ↓
//! app_state (AppAction → 状态)
//!     ↓
//! session::QuizSession (SessionEvent → 状态 + 副作用)
//!     ↓
//! services::QuizService (执行副作用)
//!     ↓
//! clients::QuizApi (HTTP)
//! ```

pub mod app;
pub mod app_state;
pub mod console;
pub mod render;

// 重新导出主要类型
pub use app::{App, Outcome};
pub use app_state::{AppAction, AppState, HistoryState, Tab, Theme};
pub use console::{parse_command, Choice, Command};
