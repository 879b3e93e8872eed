//! 测验服务接口
//!
//! 会话层和服务层只依赖这个 trait，不直接接触 HTTP。
//! 生产环境使用 `HttpQuizClient`，测试中可替换为内存实现。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{HistoryItem, Quiz, QuizId, QuizSubmission, ScoreResult, UrlPreview};

/// 外部测验服务（内容提供方 + 评分服务）
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// 预览文章链接
    async fn preview(&self, url: &str) -> AppResult<UrlPreview>;

    /// 根据文章链接生成测验
    async fn generate(&self, url: &str) -> AppResult<Quiz>;

    /// 获取历史测验列表
    async fn history(&self) -> AppResult<Vec<HistoryItem>>;

    /// 获取测验详情
    async fn detail(&self, quiz_id: &QuizId) -> AppResult<Quiz>;

    /// 提交答案并获取评分
    async fn submit(&self, submission: &QuizSubmission) -> AppResult<ScoreResult>;
}
