//! # Wiki Quiz Client
//!
//! 维基百科测验生成服务的命令行客户端
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与测验服务通信，只负责 HTTP 和响应校验
//! - `QuizApi` - 服务接口（预览 / 生成 / 历史 / 详情 / 提交）
//! - `HttpQuizClient` - 基于 reqwest 的实现
//!
//! ### ② 会话层（Session）
//! - `session/` - 单次答题的状态机，不做任何 I/O
//! - `QuizSession` - `apply(SessionEvent)` 返回需要执行的副作用
//! - 按章节分组、结果视图、计时
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 输入校验，执行会话产生的副作用
//! - `QuizService` - 提交答案并把结果回灌给会话
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app_state` - 应用状态（标签页、弹窗、主题）
//! - `orchestrator/app` - 命令循环
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;

// 重新导出常用类型
pub use clients::{HttpQuizClient, QuizApi};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{HistoryItem, Question, Quiz, QuizId, ScoreResult, UrlPreview};
pub use orchestrator::{App, AppState};
pub use services::QuizService;
pub use session::{QuizSession, SessionEffect, SessionEvent, SessionState};
