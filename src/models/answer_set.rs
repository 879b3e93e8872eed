use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 答案集合：题目索引（从 0 开始）→ 用户所选选项
///
/// 每题只保留一个答案，后选覆盖先选。序列化为 `{"0": "...", "1": "..."}`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<usize, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录答案，返回被覆盖的旧答案
    pub fn select(&mut self, index: usize, option: impl Into<String>) -> Option<String> {
        self.answers.insert(index, option.into())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    /// 已作答题目数
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.answers.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(usize, String)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
