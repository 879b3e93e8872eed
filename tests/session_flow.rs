//! 答题流程测试：使用内存中的 `QuizApi` 替身，不依赖后端

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio_test::{assert_err, assert_ok};

use wiki_quiz_client::error::{ApiError, AppError, InputError, SessionError};
use wiki_quiz_client::models::{
    AnswerSet, Difficulty, HistoryItem, KeyEntities, Question, Quiz, QuizId, QuizSubmission,
    ScoreResult, UrlPreview,
};
use wiki_quiz_client::orchestrator::{App, HistoryState};
use wiki_quiz_client::session::{Clock, Indicator, QuizSession, SessionEvent, SessionState};
use wiki_quiz_client::{AppResult, QuizApi, QuizService};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Preview(String),
    Generate(String),
    History,
    Detail(QuizId),
    Submit(QuizSubmission),
}

/// 记录调用并返回预设数据的测验服务
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    fail_submit: Mutex<bool>,
    fail_history: bool,
}

impl FakeApi {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn set_fail_submit(&self, fail: bool) {
        *self.fail_submit.lock().unwrap() = fail;
    }

    fn unavailable(endpoint: &str, message: &str) -> AppError {
        AppError::Api(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: 503,
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl QuizApi for FakeApi {
    async fn preview(&self, url: &str) -> AppResult<UrlPreview> {
        self.record(Call::Preview(url.to_string()));
        Ok(UrlPreview {
            url: url.to_string(),
            title: "Alan Turing".to_string(),
            summary: Some("Mathematician.".to_string()),
            is_valid: true,
            exists_in_db: true,
            cached_quiz_id: Some(QuizId::Int(7)),
            image_url: None,
            word_count: Some(1200),
        })
    }

    async fn generate(&self, url: &str) -> AppResult<Quiz> {
        self.record(Call::Generate(url.to_string()));
        Ok(turing_quiz())
    }

    async fn history(&self) -> AppResult<Vec<HistoryItem>> {
        self.record(Call::History);
        if self.fail_history {
            return Err(Self::unavailable("/history", "Failed to fetch quiz history"));
        }
        Ok(vec![HistoryItem {
            id: QuizId::Int(7),
            title: "Alan Turing".to_string(),
            url: "https://en.wikipedia.org/wiki/Alan_Turing".to_string(),
            question_count: Some(3),
            date_generated: None,
        }])
    }

    async fn detail(&self, quiz_id: &QuizId) -> AppResult<Quiz> {
        self.record(Call::Detail(quiz_id.clone()));
        Ok(turing_quiz())
    }

    async fn submit(&self, submission: &QuizSubmission) -> AppResult<ScoreResult> {
        self.record(Call::Submit(submission.clone()));
        if *self.fail_submit.lock().unwrap() {
            return Err(Self::unavailable("/submit_quiz", "Submission failed"));
        }
        // 评分服务的结论：只有第 2 题答错
        Ok(ScoreResult {
            quiz_id: Some(submission.quiz_id.clone()),
            total_questions: 3,
            correct_answers: 2,
            score_percentage: 66.67,
            results: vec![],
            time_taken: Some(submission.time_taken),
        })
    }
}

fn question(text: &str, options: [&str; 3], answer: &str, section: &str) -> Question {
    Question {
        text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
        difficulty: Difficulty::Medium,
        explanation: format!("About {}", text),
        section: Some(section.to_string()),
    }
}

fn turing_quiz() -> Quiz {
    Quiz {
        id: QuizId::Int(7),
        title: "Alan Turing".to_string(),
        url: "https://en.wikipedia.org/wiki/Alan_Turing".to_string(),
        summary: "English mathematician.".to_string(),
        key_entities: KeyEntities::default(),
        sections: vec!["Early life".to_string(), "Codebreaking".to_string()],
        related_topics: vec![],
        questions: vec![
            question(
                "Where was Turing born?",
                ["London", "Paris", "Berlin"],
                "London",
                "Early life",
            ),
            question(
                "Where did he work during the war?",
                ["Bletchley Park", "Harwell", "Cambridge"],
                "Bletchley Park",
                "Codebreaking",
            ),
            question(
                "Which school did he attend?",
                ["Sherborne", "Eton", "Harrow"],
                "Sherborne",
                "Early life",
            ),
        ],
        date_generated: None,
        is_cached: false,
    }
}

fn fixed_session() -> QuizSession {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    QuizSession::with_clock(turing_quiz(), Clock::fixed(start))
}

fn answer_all(session: &mut QuizSession) {
    for (index, option) in ["London", "Harwell", "Sherborne"].iter().enumerate() {
        assert_ok!(session.apply(SessionEvent::SelectAnswer {
            index,
            option: option.to_string(),
        }));
    }
}

#[tokio::test]
async fn submit_sends_all_answers_and_elapsed_seconds() {
    let api = Arc::new(FakeApi::default());
    let service = QuizService::new(api.clone());
    let mut session = fixed_session();

    assert_ok!(session.apply(SessionEvent::Start));
    answer_all(&mut session);
    session.clock_mut().advance(Duration::milliseconds(42_900));

    let score = assert_ok!(service.submit(&mut session).await);
    assert_eq!(score.correct_answers, 2);

    let expected: AnswerSet = [
        (0, "London".to_string()),
        (1, "Harwell".to_string()),
        (2, "Sherborne".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        api.calls(),
        vec![Call::Submit(QuizSubmission {
            quiz_id: QuizId::Int(7),
            answers: expected,
            time_taken: 42,
        })]
    );

    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.score().map(|s| s.summary_line()).as_deref(), Some("67% (2/3 correct)"));

    let indicators: Vec<(usize, Option<Indicator>)> = session
        .section_views()
        .iter()
        .flat_map(|section| section.questions.iter().map(|q| (q.index, q.indicator)))
        .collect();
    assert_eq!(
        indicators,
        vec![
            (0, Some(Indicator::Correct)),
            (2, Some(Indicator::Correct)),
            (1, Some(Indicator::Incorrect)),
        ]
    );
}

#[tokio::test]
async fn failed_submit_keeps_answers_for_retry() {
    let api = Arc::new(FakeApi::default());
    let service = QuizService::new(api.clone());
    let mut session = fixed_session();

    assert_ok!(session.apply(SessionEvent::Start));
    answer_all(&mut session);

    api.set_fail_submit(true);
    let err = assert_err!(service.submit(&mut session).await);
    assert_eq!(err.user_message(), "Submission failed");
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.answers().len(), 3);
    assert_eq!(session.last_error(), Some("Submission failed"));

    api.set_fail_submit(false);
    assert_ok!(service.submit(&mut session).await);
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.last_error(), None);
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn incomplete_submit_makes_no_request() {
    let api = Arc::new(FakeApi::default());
    let service = QuizService::new(api.clone());
    let mut session = fixed_session();

    assert_ok!(session.apply(SessionEvent::Start));
    assert_ok!(session.apply(SessionEvent::SelectAnswer {
        index: 0,
        option: "London".to_string(),
    }));

    let err = assert_err!(service.submit(&mut session).await);
    assert!(matches!(
        err,
        AppError::Session(SessionError::Incomplete {
            answered: 1,
            total: 3
        })
    ));
    assert_eq!(session.state(), SessionState::InProgress);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn blank_url_is_rejected_locally() {
    let api = Arc::new(FakeApi::default());
    let service = QuizService::new(api.clone());

    let err = assert_err!(service.preview("   ").await);
    assert!(matches!(err, AppError::Input(InputError::EmptyUrl)));
    assert_err!(service.generate("").await);
    assert!(api.calls().is_empty());

    let mut app = App::with_service(service);
    let outcome = app.handle_line("preview").await;
    assert!(outcome.output.contains("Please enter a URL"));
    assert_eq!(app.state().error.as_deref(), Some("Please enter a URL"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn history_failure_shows_empty_state() {
    let api = Arc::new(FakeApi {
        fail_history: true,
        ..FakeApi::default()
    });
    let mut app = App::with_service(QuizService::new(api.clone()));

    let outcome = app.handle_line("tab history").await;
    assert_eq!(app.state().history, HistoryState::Loaded(vec![]));
    assert!(outcome.output.contains("No History"));
    assert!(app.state().error.is_none());
    assert_eq!(api.calls(), vec![Call::History]);
}

#[tokio::test]
async fn retake_clears_answers_and_score() {
    let api = Arc::new(FakeApi::default());
    let service = QuizService::new(api);
    let mut session = fixed_session();

    assert_ok!(session.apply(SessionEvent::Start));
    answer_all(&mut session);
    assert_ok!(service.submit(&mut session).await);

    session.clock_mut().advance(Duration::seconds(300));
    assert_ok!(session.apply(SessionEvent::Retake));
    assert_eq!(session.state(), SessionState::InProgress);
    assert!(session.answers().is_empty());
    assert!(session.score().is_none());
    assert_eq!(session.elapsed_secs(), 0);
}

#[tokio::test]
async fn console_flow_from_generate_to_score() {
    let api = Arc::new(FakeApi::default());
    let mut app = App::with_service(QuizService::new(api.clone()));

    app.handle_line("url  https://en.wikipedia.org/wiki/Alan_Turing ").await;
    let outcome = app.handle_line("generate").await;
    assert!(outcome.output.contains("Alan Turing (ID 7)"));

    app.handle_line("take").await;
    app.handle_line("answer 1 a").await;
    app.handle_line("answer 2 b").await;

    let outcome = app.handle_line("submit").await;
    assert!(outcome.output.contains("❌"));
    assert!(!api
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Submit(_))));

    app.handle_line("answer 3 Sherborne").await;
    let outcome = app.handle_line("submit").await;
    assert!(outcome.output.contains("67% (2/3 correct)"));

    let session = app.state().generated.as_ref().unwrap();
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.answers().get(1), Some("Harwell"));

    let calls = api.calls();
    assert_eq!(
        calls.first(),
        Some(&Call::Generate(
            "https://en.wikipedia.org/wiki/Alan_Turing".to_string()
        ))
    );
    assert!(app.handle_line("quit").await.quit);
}

#[tokio::test]
async fn modal_opens_from_history() {
    let api = Arc::new(FakeApi::default());
    let mut app = App::with_service(QuizService::new(api.clone()));

    app.handle_line("history").await;
    let outcome = app.handle_line("open 7").await;
    assert!(outcome.output.contains("[弹窗]"));
    assert!(app.state().modal.is_some());
    assert!(api.calls().contains(&Call::Detail(QuizId::Int(7))));

    app.handle_line("close").await;
    assert!(app.state().modal.is_none());
}

#[tokio::test]
async fn blank_url_keeps_current_quiz_and_preview() {
    let api = Arc::new(FakeApi::default());
    let mut app = App::with_service(QuizService::new(api.clone()));

    app.handle_line("url https://en.wikipedia.org/wiki/Alan_Turing").await;
    app.handle_line("preview").await;
    app.handle_line("generate").await;
    app.handle_line("take").await;
    app.handle_line("answer 1 a").await;
    app.handle_line("preview").await;
    let calls_before = api.calls().len();

    app.handle_line("url").await;
    let outcome = app.handle_line("generate").await;
    assert!(outcome.output.contains("❌ Please enter a URL"));
    let outcome = app.handle_line("preview").await;
    assert!(outcome.output.contains("❌ Please enter a URL"));

    let session = app.state().generated.as_ref().unwrap();
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.answers().get(0), Some("London"));
    assert_eq!(
        app.state().preview.as_ref().map(|p| p.title.as_str()),
        Some("Alan Turing")
    );
    assert_eq!(app.state().error.as_deref(), Some("Please enter a URL"));
    assert_eq!(api.calls().len(), calls_before);
}
