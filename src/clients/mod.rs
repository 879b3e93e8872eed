pub mod quiz_api;
pub mod quiz_client;

pub use quiz_api::QuizApi;
pub use quiz_client::HttpQuizClient;
