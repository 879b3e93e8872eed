use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::clients::HttpQuizClient;
use crate::config::Config;
use crate::error::{AppError, AppResult, SessionError};
use crate::models::Question;
use crate::orchestrator::app_state::{AppAction, AppState, Tab};
use crate::orchestrator::console::{parse_command, Choice, Command, HELP};
use crate::orchestrator::render;
use crate::services::{require_url, QuizService};
use crate::session::SessionEvent;
use crate::utils::logging::log_startup;

/// 单条命令的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub quit: bool,
}

impl Outcome {
    fn show(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// 应用主结构
pub struct App {
    service: QuizService,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);
        let client = HttpQuizClient::new(&config)?;
        Ok(Self::with_service(QuizService::new(Arc::new(client))))
    }

    pub fn with_service(service: QuizService) -> Self {
        Self {
            service,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// 运行交互主循环，直到 quit 或输入结束
    pub async fn run(&mut self) -> AppResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        self.write(&mut stdout, HELP).await;

        loop {
            self.write(&mut stdout, "> ").await;
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("读取输入失败: {}", e);
                    break;
                }
            };

            let outcome = self.handle_line(&line).await;
            self.write(&mut stdout, &outcome.output).await;
            if outcome.quit {
                break;
            }
        }

        info!("👋 已退出");
        Ok(())
    }

    async fn write(&self, stdout: &mut tokio::io::Stdout, text: &str) {
        if let Err(e) = write_out(stdout, text).await {
            warn!("输出失败: {}", e);
        }
    }

    /// 处理一行输入；错误转换为可展示的文本，不会中断主循环
    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Outcome::show(""),
            Err(e) => return Outcome::show(format!("❌ {}\n", e)),
        };

        debug!("命令: {:?}", command);

        match self.handle(command).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::show(format!("❌ {}\n", e.user_message())),
        }
    }

    /// 执行一条命令
    pub async fn handle(&mut self, command: Command) -> AppResult<Outcome> {
        match command {
            Command::Quit => {
                return Ok(Outcome {
                    output: String::new(),
                    quit: true,
                })
            }
            Command::Help => return Ok(Outcome::show(HELP)),
            Command::Show => {}
            Command::Theme => {
                self.state.reduce(AppAction::ToggleTheme)?;
            }
            Command::Url(url) => {
                self.state.reduce(AppAction::SetUrl(url))?;
            }
            Command::Tab(tab) => {
                self.state.reduce(AppAction::SelectTab(tab))?;
                if tab == Tab::History {
                    self.load_history().await?;
                }
            }
            Command::History => {
                self.state.reduce(AppAction::SelectTab(Tab::History))?;
                self.load_history().await?;
            }
            Command::Preview => self.preview().await?,
            Command::Generate => self.generate().await?,
            Command::Open(id) => match self.service.detail(&id).await {
                Ok(quiz) => {
                    self.state.reduce(AppAction::OpenModal(quiz))?;
                }
                Err(e) => {
                    return Ok(Outcome::show(format!(
                        "❌ Failed to load quiz: {}\n",
                        e.user_message()
                    )))
                }
            },
            Command::Close => {
                self.state.reduce(AppAction::CloseModal)?;
            }
            Command::Take => {
                self.state.reduce(AppAction::Session(SessionEvent::Start))?;
            }
            Command::Retake => {
                self.state.reduce(AppAction::Session(SessionEvent::Retake))?;
            }
            Command::Exit => {
                self.state.reduce(AppAction::Session(SessionEvent::Exit))?;
            }
            Command::Answer { number, choice } => {
                let index = number - 1;
                let option = {
                    let session = self
                        .state
                        .active_session()
                        .ok_or(SessionError::NoActiveQuiz)?;
                    let total = session.quiz().question_count();
                    let question = session
                        .quiz()
                        .question(index)
                        .ok_or(SessionError::QuestionOutOfRange { index, total })?;
                    resolve_choice(question, choice)
                };
                self.state
                    .reduce(AppAction::Session(SessionEvent::SelectAnswer { index, option }))?;
            }
            Command::Submit => {
                let session = self
                    .state
                    .active_session_mut()
                    .ok_or(SessionError::NoActiveQuiz)?;
                // 失败时会话已回到答题中，错误展示在界面中
                if let Err(e) = self.service.submit(session).await {
                    if !matches!(e, AppError::Api(_)) {
                        return Err(e);
                    }
                }
            }
        }

        Ok(Outcome::show(render::render_app(&self.state)))
    }

    async fn load_history(&mut self) -> AppResult<()> {
        let items = self.service.history().await;
        self.state.reduce(AppAction::HistoryLoaded(items))?;
        Ok(())
    }

    /// 链接为空时只记录错误，保留当前预览和测验
    fn check_url(&mut self) -> AppResult<bool> {
        match require_url(&self.state.url_input) {
            Ok(_) => Ok(true),
            Err(e) => {
                self.state.reduce(AppAction::RequestFailed(e.to_string()))?;
                Ok(false)
            }
        }
    }

    async fn preview(&mut self) -> AppResult<()> {
        if !self.check_url()? {
            return Ok(());
        }
        self.state.reduce(AppAction::PreviewRequested)?;
        match self.service.preview(&self.state.url_input).await {
            Ok(preview) => {
                self.state.reduce(AppAction::PreviewLoaded(preview))?;
            }
            Err(e) => {
                self.state.reduce(AppAction::RequestFailed(e.user_message()))?;
            }
        }
        Ok(())
    }

    async fn generate(&mut self) -> AppResult<()> {
        if !self.check_url()? {
            return Ok(());
        }
        self.state.reduce(AppAction::GenerateRequested)?;
        match self.service.generate(&self.state.url_input).await {
            Ok(quiz) => {
                self.state.reduce(AppAction::QuizGenerated(quiz))?;
            }
            Err(e) => {
                self.state.reduce(AppAction::RequestFailed(e.user_message()))?;
            }
        }
        Ok(())
    }
}

/// 写出文本并立即刷新
async fn write_out<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

/// 优先按选项原文精确匹配，单个字母再按选项序号解析
fn resolve_choice(question: &Question, choice: Choice) -> String {
    match choice {
        Choice::Letter(letter) => {
            let text = letter.to_string();
            if question.has_option(&text) {
                return text;
            }
            question
                .option_by_letter(letter)
                .map(str::to_string)
                .unwrap_or(text)
        }
        Choice::Text(text) => text,
    }
}
