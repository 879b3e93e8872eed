use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 未标注章节的题目归入此分组
pub const DEFAULT_SECTION: &str = "General";

/// 测验 ID
///
/// 对客户端而言是不透明的；后端使用整数，但也接受字符串形式，
/// 提交时按收到时的原样回传。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for QuizId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizId::Int(id) => write!(f, "{}", id),
            QuizId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for QuizId {
    fn from(id: i64) -> Self {
        QuizId::Int(id)
    }
}

impl std::str::FromStr for QuizId {
    type Err = std::convert::Infallible;

    /// 纯数字解析为整数 ID，其余原样保留
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => QuizId::Int(id),
            Err(_) => QuizId::Text(s.to_string()),
        })
    }
}

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// 未知的难度标签按 medium 处理，与后端一致
impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.as_str().to_string()
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单道选择题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 题干
    #[serde(rename = "question")]
    pub text: String,
    /// 选项（有序）
    pub options: Vec<String>,
    /// 正确选项，取值必须是 `options` 之一
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl Question {
    /// 分组用的章节名，缺省或空白时为 "General"
    pub fn section_label(&self) -> &str {
        match self.section.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_SECTION,
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    /// 按字母（A, B, C...）取选项
    pub fn option_by_letter(&self, letter: char) -> Option<&str> {
        let upper = letter.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        let idx = (upper as u8 - b'A') as usize;
        self.options.get(idx).map(String::as_str)
    }
}

/// 选项序号转字母
pub fn option_letter(idx: usize) -> char {
    if idx < 26 {
        (b'A' + idx as u8) as char
    } else {
        '?'
    }
}

/// 文章中的关键实体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyEntities {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// 由一篇文章生成的测验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_entities: KeyEntities,
    /// 文章章节列表
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    /// 题目列表，顺序即答案集合的索引
    #[serde(rename = "quiz")]
    pub questions: Vec<Question>,
    #[serde(
        default,
        deserialize_with = "crate::models::timestamp::deserialize_opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_generated: Option<NaiveDateTime>,
    /// 是否命中后端缓存
    #[serde(default)]
    pub is_cached: bool,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}
