//! 控制台命令解析

use crate::error::InputError;
use crate::models::QuizId;
use crate::orchestrator::app_state::Tab;

/// 用户选择的答案：单个字母（保留大小写）或选项原文
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Letter(char),
    Text(String),
}

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(Tab),
    Url(String),
    Preview,
    Generate,
    History,
    Open(QuizId),
    Close,
    Take,
    /// 题号从 1 开始
    Answer { number: usize, choice: Choice },
    Submit,
    Retake,
    Exit,
    Theme,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
命令:
  url <链接>            设置文章链接
  preview               预览链接
  generate              生成测验
  tab generate|history  切换标签页
  history               加载历史记录
  open <id>             打开历史测验（弹窗）
  close                 关闭弹窗
  take                  开始答题
  answer <题号> <A-D|选项原文>
  submit                提交答案
  retake                重新作答
  exit                  退出答题模式
  theme                 切换主题
  show                  显示当前界面
  help                  显示帮助
  quit                  退出程序
";

fn bad(value: &str, reason: &str) -> InputError {
    InputError::BadArgument {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// 解析一行输入
///
/// 空行返回 `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_lowercase().as_str() {
        "url" => Command::Url(rest.to_string()),
        "preview" => Command::Preview,
        "generate" => Command::Generate,
        "history" => Command::History,
        "tab" => match rest.to_lowercase().as_str() {
            "generate" => Command::Tab(Tab::Generate),
            "history" => Command::Tab(Tab::History),
            _ => return Err(bad(rest, "expected 'generate' or 'history'")),
        },
        "open" => {
            if rest.is_empty() {
                return Err(bad(rest, "missing quiz id"));
            }
            match rest.parse::<QuizId>() {
                Ok(id) => Command::Open(id),
                Err(never) => match never {},
            }
        }
        "close" => Command::Close,
        "take" => Command::Take,
        "answer" => parse_answer(rest)?,
        "submit" => Command::Submit,
        "retake" => Command::Retake,
        "exit" => Command::Exit,
        "theme" => Command::Theme,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => return Err(bad(other, "unknown command, type 'help'")),
    };
    Ok(Some(command))
}

fn parse_answer(rest: &str) -> Result<Command, InputError> {
    let (number, choice) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad(rest, "usage: answer <number> <choice>"))?;
    let number: usize = number
        .parse()
        .map_err(|_| bad(number, "question number must be a positive integer"))?;
    if number == 0 {
        return Err(bad("0", "question numbers start at 1"));
    }

    let choice = choice.trim();
    let mut chars = choice.chars();
    let choice = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Choice::Letter(c),
        _ => Choice::Text(choice.to_string()),
    };
    Ok(Command::Answer { number, choice })
}
