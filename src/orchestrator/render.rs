//! 文本渲染
//!
//! 只读取状态生成字符串，不修改任何状态。

use std::fmt::Write as _;

use crate::models::{format_elapsed, HistoryItem, Quiz, UrlPreview};
use crate::orchestrator::app_state::{AppState, HistoryState, Tab, Theme};
use crate::session::{Indicator, OptionMark, QuestionView, QuizSession, SessionState};
use crate::utils::logging::truncate_text;

const RULE_WIDTH: usize = 60;

fn rule(ch: &str) -> String {
    ch.repeat(RULE_WIDTH)
}

/// 链接预览
pub fn render_preview(preview: &UrlPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📖 {}", preview.title);
    if let Some(summary) = &preview.summary {
        let _ = writeln!(out, "   {}", truncate_text(summary, 300));
    }
    if let Some(words) = preview.word_count {
        let _ = writeln!(out, "   字数: {}", words);
    }
    if let Some(image) = &preview.image_url {
        let _ = writeln!(out, "   图片: {}", image);
    }
    if preview.exists_in_db {
        match &preview.cached_quiz_id {
            Some(id) => {
                let _ = writeln!(out, "   ⚡ 已有测验 (ID {})，生成时将直接返回缓存", id);
            }
            None => {
                let _ = writeln!(out, "   ⚡ 已有测验，生成时将直接返回缓存");
            }
        }
    }
    out
}

/// 测验概要（浏览模式的头部）
pub fn render_quiz_details(quiz: &Quiz) -> String {
    let mut out = String::new();
    let cached = if quiz.is_cached { " [Cached]" } else { "" };
    let _ = writeln!(out, "{}", rule("="));
    let _ = writeln!(out, "{} (ID {}){}", quiz.title, quiz.id, cached);
    let _ = writeln!(out, "{}", quiz.url);
    let _ = writeln!(out, "{}", rule("="));
    if !quiz.summary.is_empty() {
        let _ = writeln!(out, "{}\n", quiz.summary);
    }

    let entities = &quiz.key_entities;
    for (label, items) in [
        ("People", &entities.people),
        ("Organizations", &entities.organizations),
        ("Locations", &entities.locations),
    ] {
        if !items.is_empty() {
            let _ = writeln!(out, "{}: {}", label, items.join(", "));
        }
    }
    if !quiz.sections.is_empty() {
        let _ = writeln!(out, "Article Sections: {}", quiz.sections.join(" | "));
    }
    if !quiz.related_topics.is_empty() {
        let _ = writeln!(out, "Related Topics: {}", quiz.related_topics.join(", "));
    }
    out
}

fn option_prefix(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Plain => "   ",
        OptionMark::Selected => " > ",
        OptionMark::Correct => " ✓ ",
        OptionMark::IncorrectSelection => " ✗ ",
    }
}

fn render_question(out: &mut String, view: &QuestionView<'_>) {
    let status = match view.indicator {
        Some(Indicator::Correct) => " ✅",
        Some(Indicator::Incorrect) => " ❌",
        Some(Indicator::Unanswered) => " ⏺",
        None => "",
    };
    let _ = writeln!(
        out,
        "Q{}. {} [{}]{}",
        view.index + 1,
        view.question.text,
        view.question.difficulty,
        status
    );
    for option in &view.options {
        let _ = writeln!(
            out,
            "{}{}. {}",
            option_prefix(option.mark),
            option.letter,
            option.text
        );
    }
    if let Some(explanation) = view.explanation {
        let _ = writeln!(out, "   Explanation: {}", explanation);
    }
}

/// 会话：浏览模式下显示概要和题目，答题模式下显示进度或结果
pub fn render_session(session: &QuizSession) -> String {
    let mut out = String::new();
    let quiz = session.quiz();

    if !session.in_quiz_mode() {
        out.push_str(&render_quiz_details(quiz));
    } else {
        let _ = writeln!(out, "{}", rule("="));
        let _ = writeln!(out, "🏆 Quiz Mode: {}", quiz.title);
        match session.state() {
            SessionState::Completed => {
                if let Some(score) = session.score() {
                    let _ = writeln!(out, "🎖 {}", score.summary_line());
                    if let Some(time) = score.formatted_time() {
                        let _ = writeln!(out, "⏱ {}", time);
                    }
                }
            }
            _ => {
                let _ = writeln!(
                    out,
                    "已答 {}/{}  ⏱ {}",
                    session.answers().len(),
                    quiz.question_count(),
                    format_elapsed(session.elapsed_secs())
                );
            }
        }
        let _ = writeln!(out, "{}", rule("="));
    }

    for section in session.section_views() {
        let _ = writeln!(out, "\n## {}", section.section);
        let _ = writeln!(out, "{}", rule("─"));
        for view in &section.questions {
            render_question(&mut out, view);
        }
    }

    match session.state() {
        SessionState::InProgress => {
            if let Some(err) = session.last_error() {
                let _ = writeln!(out, "\n❌ Failed to submit quiz: {}", err);
            }
            if session.can_submit() {
                let _ = writeln!(out, "\n所有题目已作答，输入 submit 提交");
            }
        }
        SessionState::Submitting => {
            let _ = writeln!(out, "\n⏳ Submitting...");
        }
        SessionState::Completed => {
            let _ = writeln!(out, "\n输入 retake 重新作答");
        }
        SessionState::Idle => {}
    }
    out
}

/// 历史记录列表
pub fn render_history(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return "📚 No History\nGenerate your first quiz!\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Quiz History ({} quizzes generated)", items.len());
    let _ = writeln!(out, "{}", rule("─"));
    for item in items {
        let count = item
            .question_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let date = item
            .date_generated
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "#{:<5} {:<40} {:>3} 题  {}",
            item.id,
            truncate_text(&item.title, 40),
            count,
            date
        );
    }
    out
}

/// 完整界面
pub fn render_app(state: &AppState) -> String {
    let mut out = String::new();
    let theme = match state.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let tab = match state.tab {
        Tab::Generate => "[Generate] History",
        Tab::History => "Generate [History]",
    };
    let _ = writeln!(out, "{}    theme: {}", tab, theme);

    if let Some(err) = &state.error {
        let _ = writeln!(out, "❌ {}", err);
    }

    if let Some(modal) = &state.modal {
        let _ = writeln!(out, "[弹窗] 输入 close 关闭");
        out.push_str(&render_session(modal));
        return out;
    }

    match state.tab {
        Tab::Generate => {
            if !state.url_input.is_empty() {
                let _ = writeln!(out, "URL: {}", state.url_input);
            }
            if let Some(preview) = &state.preview {
                out.push_str(&render_preview(preview));
            }
            if let Some(session) = &state.generated {
                out.push_str(&render_session(session));
            }
        }
        Tab::History => match &state.history {
            HistoryState::NotLoaded => {
                let _ = writeln!(out, "历史记录尚未加载，输入 history 加载");
            }
            HistoryState::Loaded(items) => out.push_str(&render_history(items)),
        },
    }
    out
}
