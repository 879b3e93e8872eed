//! 题目按章节分组
//!
//! 分组顺序按章节首次出现的位置，组内保持原始题目顺序。
//! 每道题保留原始索引，答案集合始终以原始索引为键。

use crate::models::Question;

/// 带原始索引的题目
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedQuestion<'a> {
    pub original_index: usize,
    pub question: &'a Question,
}

/// 一个章节分组
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionGroup<'a> {
    pub section: &'a str,
    pub questions: Vec<IndexedQuestion<'a>>,
}

/// 按章节分组
pub fn group_by_section(questions: &[Question]) -> Vec<QuestionGroup<'_>> {
    let mut groups: Vec<QuestionGroup<'_>> = Vec::new();

    for (idx, question) in questions.iter().enumerate() {
        let section = question.section_label();
        let entry = IndexedQuestion {
            original_index: idx,
            question,
        };
        match groups.iter_mut().find(|g| g.section == section) {
            Some(group) => group.questions.push(entry),
            None => groups.push(QuestionGroup {
                section,
                questions: vec![entry],
            }),
        }
    }

    groups
}

/// 按分组顺序展开为原始索引序列
pub fn flatten_indices(groups: &[QuestionGroup<'_>]) -> Vec<usize> {
    groups
        .iter()
        .flat_map(|g| g.questions.iter().map(|q| q.original_index))
        .collect()
}
