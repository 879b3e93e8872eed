//! 响应结构校验
//!
//! 每个接口的响应先反序列化为强类型，再做语义校验。
//! 任一步失败都视为 `MalformedResponse`，不把不可信的数据交给会话层。

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::article::{HistoryItem, UrlPreview};
use crate::models::quiz::Quiz;
use crate::models::score::ScoreResult;

/// 响应的语义校验
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// 将 JSON 解码为目标类型并校验
pub fn decode<T>(endpoint: &str, value: JsonValue) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let typed: T = serde_json::from_value(value)
        .map_err(|e| AppError::malformed(endpoint, e.to_string()))?;
    typed
        .validate()
        .map_err(|reason| AppError::malformed(endpoint, reason))?;
    Ok(typed)
}

/// 将 JSON 数组解码为列表，逐行校验
///
/// 整体结构不对时返回 `MalformedResponse`；单行校验失败只跳过该行并记录警告。
pub fn decode_rows<T>(endpoint: &str, value: JsonValue) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    let rows: Vec<T> = serde_json::from_value(value)
        .map_err(|e| AppError::malformed(endpoint, e.to_string()))?;
    Ok(rows
        .into_iter()
        .filter(|row| match row.validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!("⚠️ 跳过无效记录 ({}): {}", endpoint, reason);
                false
            }
        })
        .collect())
}

impl Validate for Quiz {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("quiz title is empty".to_string());
        }
        for (idx, q) in self.questions.iter().enumerate() {
            if q.text.trim().is_empty() {
                return Err(format!("question {} has empty text", idx));
            }
            if q.options.len() < 2 {
                return Err(format!(
                    "question {} has {} option(s), expected at least 2",
                    idx,
                    q.options.len()
                ));
            }
            if !q.has_option(&q.answer) {
                return Err(format!(
                    "question {} answer '{}' is not one of its options",
                    idx, q.answer
                ));
            }
        }
        Ok(())
    }
}

impl Validate for UrlPreview {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("preview title is empty".to_string());
        }
        Ok(())
    }
}

impl Validate for HistoryItem {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(format!("history item {} has empty title", self.id));
        }
        Ok(())
    }
}

impl Validate for ScoreResult {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.score_percentage) {
            return Err(format!(
                "score_percentage {} is outside 0..=100",
                self.score_percentage
            ));
        }
        if self.correct_answers > self.total_questions {
            return Err(format!(
                "correct_answers {} exceeds total_questions {}",
                self.correct_answers, self.total_questions
            ));
        }
        Ok(())
    }
}
