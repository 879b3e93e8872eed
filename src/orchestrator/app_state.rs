//! 应用状态
//!
//! 标签页、弹窗、输入框、预览和当前测验都集中在 `AppState` 中，
//! 只能通过 `reduce` 修改。

use crate::error::SessionError;
use crate::models::{HistoryItem, Quiz, UrlPreview};
use crate::session::{QuizSession, SessionEffect, SessionEvent};

/// 标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generate,
    History,
}

/// 主题，只在内存中切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// 历史记录加载状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HistoryState {
    #[default]
    NotLoaded,
    Loaded(Vec<HistoryItem>),
}

/// 状态变更动作
#[derive(Debug, Clone)]
pub enum AppAction {
    SelectTab(Tab),
    ToggleTheme,
    SetUrl(String),
    /// 开始预览：清空错误和旧预览
    PreviewRequested,
    PreviewLoaded(UrlPreview),
    /// 开始生成：清空错误和当前测验
    GenerateRequested,
    QuizGenerated(Quiz),
    RequestFailed(String),
    HistoryLoaded(Vec<HistoryItem>),
    OpenModal(Quiz),
    CloseModal,
    /// 转发给当前测验会话（弹窗优先）
    Session(SessionEvent),
}

/// 应用状态
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tab: Tab,
    pub theme: Theme,
    pub url_input: String,
    pub preview: Option<UrlPreview>,
    pub error: Option<String>,
    /// 生成页的测验
    pub generated: Option<QuizSession>,
    pub history: HistoryState,
    /// 从历史记录打开的测验
    pub modal: Option<QuizSession>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前操作的会话：弹窗打开时为弹窗，否则为生成页测验
    pub fn active_session(&self) -> Option<&QuizSession> {
        self.modal.as_ref().or(self.generated.as_ref())
    }

    pub fn active_session_mut(&mut self) -> Option<&mut QuizSession> {
        match self.modal {
            Some(ref mut session) => Some(session),
            None => self.generated.as_mut(),
        }
    }

    pub fn reduce(&mut self, action: AppAction) -> Result<SessionEffect, SessionError> {
        match action {
            AppAction::SelectTab(tab) => self.tab = tab,
            AppAction::ToggleTheme => self.theme = self.theme.toggled(),
            AppAction::SetUrl(url) => self.url_input = url,
            AppAction::PreviewRequested => {
                self.error = None;
                self.preview = None;
            }
            AppAction::PreviewLoaded(preview) => self.preview = Some(preview),
            AppAction::GenerateRequested => {
                self.error = None;
                self.generated = None;
            }
            AppAction::QuizGenerated(quiz) => {
                self.generated = Some(QuizSession::new(quiz));
                self.preview = None;
            }
            AppAction::RequestFailed(message) => self.error = Some(message),
            AppAction::HistoryLoaded(items) => self.history = HistoryState::Loaded(items),
            AppAction::OpenModal(quiz) => self.modal = Some(QuizSession::new(quiz)),
            AppAction::CloseModal => self.modal = None,
            AppAction::Session(event) => {
                let session = self
                    .active_session_mut()
                    .ok_or(SessionError::NoActiveQuiz)?;
                return session.apply(event);
            }
        }
        Ok(SessionEffect::None)
    }
}
