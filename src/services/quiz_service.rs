//! 测验服务 - 业务能力层
//!
//! 在 `QuizApi` 之上补充本地输入校验和错误分类：
//! - 空链接在本地拦截，不发起请求
//! - 历史记录加载失败只记日志，返回空列表
//! - 提交流程驱动会话状态机，失败时会话回到答题中

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::QuizApi;
use crate::error::{AppResult, InputError, SessionError};
use crate::models::{HistoryItem, Quiz, QuizId, ScoreResult, UrlPreview};
use crate::session::{QuizSession, SessionEffect, SessionEvent};

/// 测验服务
///
/// 职责：
/// - 校验用户输入
/// - 调用外部测验服务
/// - 把评分结果或失败回送给会话
/// - 不关心展示
#[derive(Clone)]
pub struct QuizService {
    api: Arc<dyn QuizApi>,
}

impl QuizService {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// 预览文章链接
    pub async fn preview(&self, url: &str) -> AppResult<UrlPreview> {
        let url = require_url(url)?;
        let preview = self.api.preview(url).await?;
        info!(
            "✓ 预览: {} (已有测验: {})",
            preview.title, preview.exists_in_db
        );
        Ok(preview)
    }

    /// 生成测验
    pub async fn generate(&self, url: &str) -> AppResult<Quiz> {
        let url = require_url(url)?;
        self.api.generate(url).await
    }

    /// 加载历史记录
    ///
    /// 失败时只记录日志，返回空列表（展示为空状态）
    pub async fn history(&self) -> Vec<HistoryItem> {
        match self.api.history().await {
            Ok(items) => {
                info!("✓ 加载历史记录 {} 条", items.len());
                items
            }
            Err(e) => {
                error!("❌ 历史记录加载失败: {}", e);
                Vec::new()
            }
        }
    }

    /// 获取测验详情
    pub async fn detail(&self, quiz_id: &QuizId) -> AppResult<Quiz> {
        self.api.detail(quiz_id).await
    }

    /// 提交会话中的答案
    ///
    /// 本地完整性校验不通过时直接返回错误，不发起请求。
    /// 评分服务失败时会话回到 `InProgress`，答案和计时保留，错误返回给调用方。
    pub async fn submit(&self, session: &mut QuizSession) -> AppResult<ScoreResult> {
        let SessionEffect::Submit(submission) = session.apply(SessionEvent::Submit)? else {
            return Err(SessionError::InvalidTransition {
                state: session.state().name(),
                action: "Submit",
            }
            .into());
        };

        match self.api.submit(&submission).await {
            Ok(score) => {
                session.apply(SessionEvent::SubmitSucceeded(score.clone()))?;
                Ok(score)
            }
            Err(e) => {
                warn!("⚠️ 提交失败，保留已选答案: {}", e);
                session.apply(SessionEvent::SubmitFailed(e.user_message()))?;
                Err(e)
            }
        }
    }
}

/// 校验链接非空，返回去除首尾空白后的链接
pub fn require_url(url: &str) -> Result<&str, InputError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        Err(InputError::EmptyUrl)
    } else {
        Ok(trimmed)
    }
}
