pub mod answer_set;
pub mod article;
pub mod quiz;
pub mod schema;
pub mod score;
pub mod timestamp;

pub use answer_set::AnswerSet;
pub use article::{HistoryItem, UrlPreview};
pub use quiz::{option_letter, Difficulty, KeyEntities, Question, Quiz, QuizId, DEFAULT_SECTION};
pub use schema::{decode, decode_rows, Validate};
pub use score::{format_elapsed, QuestionResult, QuizSubmission, ScoreResult};
