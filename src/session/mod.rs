//! 会话层
//!
//! 定义"一次答题"的完整流程：状态机、章节分组、结果展示。
//! 不持有网络资源，提交请求以 `SessionEffect` 的形式交给服务层执行。

pub mod clock;
pub mod controller;
pub mod grouping;
pub mod view;

pub use clock::Clock;
pub use controller::{QuizSession, SessionEffect, SessionEvent, SessionState};
pub use grouping::{flatten_indices, group_by_section, IndexedQuestion, QuestionGroup};
pub use view::{Indicator, OptionMark, OptionView, QuestionView, SectionView};
