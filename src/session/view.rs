//! 答题结果展示模型
//!
//! 出分后每道题展示：是否答对、是否选错、解析。
//! 这里只做展示用的比对，分数完全来自评分服务。

use crate::models::{option_letter, Question};
use crate::session::controller::{QuizSession, SessionState};

/// 单题结果标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Correct,
    Incorrect,
    Unanswered,
}

/// 选项展示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    /// 答题中被选中
    Selected,
    /// 出分后：正确答案
    Correct,
    /// 出分后：用户选中但错误
    IncorrectSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionView<'a> {
    pub letter: char,
    pub text: &'a str,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView<'a> {
    /// 原始索引（答案集合的键）
    pub index: usize,
    pub question: &'a Question,
    pub selected: Option<&'a str>,
    pub options: Vec<OptionView<'a>>,
    /// 仅在出分后存在
    pub indicator: Option<Indicator>,
    /// 仅在出分后存在
    pub explanation: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView<'a> {
    pub section: &'a str,
    pub questions: Vec<QuestionView<'a>>,
}

impl QuestionView<'_> {
    pub fn is_correct(&self) -> bool {
        self.indicator == Some(Indicator::Correct)
    }

    pub fn is_incorrect(&self) -> bool {
        self.indicator == Some(Indicator::Incorrect)
    }
}

fn question_view<'a>(
    index: usize,
    question: &'a Question,
    selected: Option<&'a str>,
    revealed: bool,
) -> QuestionView<'a> {
    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let is_selected = selected == Some(text.as_str());
            let mark = if revealed && question.is_correct(text) {
                OptionMark::Correct
            } else if revealed && is_selected {
                OptionMark::IncorrectSelection
            } else if is_selected {
                OptionMark::Selected
            } else {
                OptionMark::Plain
            };
            OptionView {
                letter: option_letter(i),
                text: text.as_str(),
                mark,
            }
        })
        .collect();

    let indicator = revealed.then(|| match selected {
        Some(choice) if question.is_correct(choice) => Indicator::Correct,
        Some(_) => Indicator::Incorrect,
        None => Indicator::Unanswered,
    });

    QuestionView {
        index,
        question,
        selected,
        options,
        indicator,
        explanation: revealed.then_some(question.explanation.as_str()),
    }
}

impl QuizSession {
    /// 结果是否已揭晓
    pub fn is_revealed(&self) -> bool {
        self.state() == SessionState::Completed
    }

    /// 按章节分组的题目展示
    pub fn section_views(&self) -> Vec<SectionView<'_>> {
        let revealed = self.is_revealed();
        // 浏览模式下不展示答题痕迹
        let show_answers = self.in_quiz_mode();

        self.groups()
            .into_iter()
            .map(|group| SectionView {
                section: group.section,
                questions: group
                    .questions
                    .into_iter()
                    .map(|entry| {
                        let selected = if show_answers {
                            self.answers().get(entry.original_index)
                        } else {
                            None
                        };
                        question_view(entry.original_index, entry.question, selected, revealed)
                    })
                    .collect(),
            })
            .collect()
    }
}
