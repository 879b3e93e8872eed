use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::quiz::QuizId;

/// 文章链接预览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlPreview {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default = "default_true")]
    pub is_valid: bool,
    /// 后端是否已有该文章的测验
    #[serde(default)]
    pub exists_in_db: bool,
    #[serde(default)]
    pub cached_quiz_id: Option<QuizId>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
}

fn default_true() -> bool {
    true
}

/// 历史记录中的一条测验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub question_count: Option<usize>,
    #[serde(
        default,
        deserialize_with = "crate::models::timestamp::deserialize_opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_generated: Option<NaiveDateTime>,
}
