use serde::{Deserialize, Serialize};

use crate::models::answer_set::AnswerSet;
use crate::models::quiz::QuizId;

/// 提交评分的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSubmission {
    pub quiz_id: QuizId,
    pub answers: AnswerSet,
    /// 用时（秒，向下取整）
    pub time_taken: u64,
}

/// 评分服务返回的单题结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_index: usize,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
}

/// 评分结果，以评分服务返回为准，客户端不做本地重算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(default)]
    pub quiz_id: Option<QuizId>,
    pub total_questions: usize,
    pub correct_answers: usize,
    /// 正确率（0–100）
    pub score_percentage: f64,
    #[serde(default)]
    pub results: Vec<QuestionResult>,
    #[serde(default)]
    pub time_taken: Option<u64>,
}

impl ScoreResult {
    /// 用时格式化为 `m:ss`
    pub fn formatted_time(&self) -> Option<String> {
        self.time_taken.map(format_elapsed)
    }

    /// 形如 `67% (2/3 correct)`
    pub fn summary_line(&self) -> String {
        format!(
            "{:.0}% ({}/{} correct)",
            self.score_percentage, self.correct_answers, self.total_questions
        )
    }
}

/// 秒数格式化为 `m:ss`
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
