//! 答题会话控制器
//!
//! 管理一次答题的完整生命周期：收集答案 → 提交评分 → 展示权威结果。
//!
//! 状态流转：
//!
//! ```text
//! Idle ──Start──▶ InProgress ──Submit──▶ Submitting ──成功──▶ Completed
//!                     ▲                      │                  │
//!                     └──────失败────────────┘                  │
//!                     └────────────────Retake───────────────────┘
//! 任意状态 ──Exit──▶ Idle
//! ```
//!
//! 所有状态变化都经过 `QuizSession::apply`，不在别处直接修改字段。

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::models::{AnswerSet, Quiz, QuizSubmission, ScoreResult};
use crate::session::clock::{elapsed_whole_secs, Clock};
use crate::session::grouping::{group_by_section, QuestionGroup};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 未在答题（浏览模式）
    Idle,
    /// 答题中，计时进行
    InProgress,
    /// 已提交，等待评分
    Submitting,
    /// 已出分，答案锁定
    Completed,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::InProgress => "InProgress",
            SessionState::Submitting => "Submitting",
            SessionState::Completed => "Completed",
        }
    }
}

/// 驱动会话的事件
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Start,
    SelectAnswer { index: usize, option: String },
    Submit,
    SubmitSucceeded(ScoreResult),
    SubmitFailed(String),
    Retake,
    Exit,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Start => "Start",
            SessionEvent::SelectAnswer { .. } => "SelectAnswer",
            SessionEvent::Submit => "Submit",
            SessionEvent::SubmitSucceeded(_) => "SubmitSucceeded",
            SessionEvent::SubmitFailed(_) => "SubmitFailed",
            SessionEvent::Retake => "Retake",
            SessionEvent::Exit => "Exit",
        }
    }
}

/// 事件处理后需要调用方执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    None,
    /// 需要把该请求发送给评分服务，完成后回送 `SubmitSucceeded` / `SubmitFailed`
    Submit(QuizSubmission),
}

/// 单个测验的答题会话
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    state: SessionState,
    answers: AnswerSet,
    started_at: Option<DateTime<Utc>>,
    score: Option<ScoreResult>,
    last_error: Option<String>,
    clock: Clock,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self::with_clock(quiz, Clock::System)
    }

    pub fn with_clock(quiz: Quiz, clock: Clock) -> Self {
        Self {
            quiz,
            state: SessionState::Idle,
            answers: AnswerSet::new(),
            started_at: None,
            score: None,
            last_error: None,
            clock,
        }
    }

    // ========== 只读访问 ==========

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// 评分结果，仅在提交成功后存在
    pub fn score(&self) -> Option<&ScoreResult> {
        self.score.as_ref()
    }

    /// 最近一次提交失败的原因
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// 是否处于答题模式（非浏览模式）
    pub fn in_quiz_mode(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.quiz.question_count()
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self) -> bool {
        self.state == SessionState::InProgress && self.is_complete()
    }

    /// 自开始以来的整秒数；未开始时为 0
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at
            .map(|start| elapsed_whole_secs(start, self.clock.now()))
            .unwrap_or(0)
    }

    pub fn groups(&self) -> Vec<QuestionGroup<'_>> {
        group_by_section(&self.quiz.questions)
    }

    // ========== 状态机 ==========

    /// 处理一个事件
    ///
    /// 不合法的事件返回错误且不改变任何状态。
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionEffect, SessionError> {
        debug!("会话 {} [{}] ← {}", self.quiz.id, self.state.name(), event.name());

        match event {
            SessionEvent::Start => {
                self.ensure(&[SessionState::Idle, SessionState::Completed], "Start")?;
                self.restart();
                Ok(SessionEffect::None)
            }
            SessionEvent::Retake => {
                self.ensure(&[SessionState::Completed], "Retake")?;
                self.restart();
                Ok(SessionEffect::None)
            }
            SessionEvent::SelectAnswer { index, option } => {
                self.select_answer(index, option)?;
                Ok(SessionEffect::None)
            }
            SessionEvent::Submit => self.begin_submit().map(SessionEffect::Submit),
            SessionEvent::SubmitSucceeded(score) => {
                self.ensure(&[SessionState::Submitting], "SubmitSucceeded")?;
                info!("✓ 测验 {} 评分完成: {}", self.quiz.id, score.summary_line());
                self.score = Some(score);
                self.last_error = None;
                self.state = SessionState::Completed;
                Ok(SessionEffect::None)
            }
            SessionEvent::SubmitFailed(message) => {
                self.ensure(&[SessionState::Submitting], "SubmitFailed")?;
                warn!("⚠️ 测验 {} 提交失败: {}", self.quiz.id, message);
                // 答案和计时保留，可直接重新提交
                self.last_error = Some(message);
                self.state = SessionState::InProgress;
                Ok(SessionEffect::None)
            }
            SessionEvent::Exit => {
                self.state = SessionState::Idle;
                Ok(SessionEffect::None)
            }
        }
    }

    fn ensure(&self, allowed: &[SessionState], action: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                state: self.state.name(),
                action,
            })
        }
    }

    fn restart(&mut self) {
        self.answers.clear();
        self.score = None;
        self.last_error = None;
        self.started_at = Some(self.clock.now());
        self.state = SessionState::InProgress;
        info!(
            "▶ 开始测验 {}: {} ({} 题)",
            self.quiz.id,
            self.quiz.title,
            self.quiz.question_count()
        );
    }

    fn select_answer(&mut self, index: usize, option: String) -> Result<(), SessionError> {
        match self.state {
            SessionState::InProgress => {}
            // 出分后答案锁定
            SessionState::Completed => return Ok(()),
            _ => self.ensure(&[SessionState::InProgress], "SelectAnswer")?,
        }

        let total = self.quiz.question_count();
        let question = self
            .quiz
            .question(index)
            .ok_or(SessionError::QuestionOutOfRange { index, total })?;
        if !question.has_option(&option) {
            return Err(SessionError::InvalidOption { index, option });
        }

        self.answers.select(index, option);
        Ok(())
    }

    fn begin_submit(&mut self) -> Result<QuizSubmission, SessionError> {
        self.ensure(&[SessionState::InProgress], "Submit")?;

        let total = self.quiz.question_count();
        if self.answers.len() != total {
            return Err(SessionError::Incomplete {
                answered: self.answers.len(),
                total,
            });
        }

        let submission = QuizSubmission {
            quiz_id: self.quiz.id.clone(),
            answers: self.answers.clone(),
            time_taken: self.elapsed_secs(),
        };
        self.last_error = None;
        self.state = SessionState::Submitting;
        Ok(submission)
    }
}
