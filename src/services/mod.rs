pub mod quiz_service;

pub use quiz_service::{require_url, QuizService};
