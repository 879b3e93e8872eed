/// 测验服务 HTTP 客户端
///
/// 封装所有与后端 API 相关的调用逻辑
use crate::clients::quiz_api::QuizApi;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, ConfigError};
use crate::models::{
    decode, decode_rows, HistoryItem, Quiz, QuizId, QuizSubmission, ScoreResult, UrlPreview,
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 非成功响应时的消息来源
#[derive(Debug, Clone, Copy)]
enum FailureMessage {
    /// 优先使用响应体中的 `detail`，否则使用通用提示
    DetailOr(&'static str),
    /// 始终使用通用提示
    Generic(&'static str),
}

/// 测验服务客户端
pub struct HttpQuizClient {
    client: Client,
    base_url: Url,
}

impl HttpQuizClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: config.api_base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: config.api_base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            }
            .into());
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::network(base_url.as_str(), e))?;

        debug!("测验服务地址: {}", base_url);

        Ok(Self { client, base_url })
    }

    /// 拼接接口地址
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        on_failure: FailureMessage,
    ) -> AppResult<JsonValue> {
        let url = self.endpoint(segments);
        debug!("POST {}", url);

        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::network(url.path(), e))?;

        Self::read_json(url.path(), response, on_failure).await
    }

    async fn get_json(&self, segments: &[&str], on_failure: FailureMessage) -> AppResult<JsonValue> {
        let url = self.endpoint(segments);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::network(url.path(), e))?;

        Self::read_json(url.path(), response, on_failure).await
    }

    /// 读取响应体；非成功状态码转换为 `ApiError::Status`
    async fn read_json(
        endpoint: &str,
        response: Response,
        on_failure: FailureMessage,
    ) -> AppResult<JsonValue> {
        let status = response.status();

        if !status.is_success() {
            // 错误响应体可能不是 JSON，解析失败时使用通用提示
            let body: Option<JsonValue> = response.json().await.ok();
            let message = match on_failure {
                FailureMessage::DetailOr(fallback) => body
                    .as_ref()
                    .and_then(extract_detail)
                    .unwrap_or_else(|| fallback.to_string()),
                FailureMessage::Generic(fallback) => fallback.to_string(),
            };
            warn!("请求失败 ({}): HTTP {} - {}", endpoint, status.as_u16(), message);
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .json::<JsonValue>()
            .await
            .map_err(|e| AppError::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl QuizApi for HttpQuizClient {
    async fn preview(&self, url: &str) -> AppResult<UrlPreview> {
        info!("🔍 预览链接: {}", url);
        let value = self
            .post_json(
                &["preview_url"],
                &json!({ "url": url }),
                FailureMessage::DetailOr("Preview failed"),
            )
            .await?;
        decode("/preview_url", value)
    }

    async fn generate(&self, url: &str) -> AppResult<Quiz> {
        info!("📝 生成测验: {}", url);
        let value = self
            .post_json(
                &["generate_quiz"],
                &json!({ "url": url }),
                FailureMessage::DetailOr("Failed to generate quiz"),
            )
            .await?;
        let quiz: Quiz = decode("/generate_quiz", value)?;
        info!(
            "✓ 测验生成完成: {} ({} 题, 缓存: {})",
            quiz.title,
            quiz.question_count(),
            quiz.is_cached
        );
        Ok(quiz)
    }

    async fn history(&self) -> AppResult<Vec<HistoryItem>> {
        let value = self
            .get_json(
                &["history"],
                FailureMessage::Generic("Failed to fetch quiz history"),
            )
            .await?;
        decode_rows("/history", value)
    }

    async fn detail(&self, quiz_id: &QuizId) -> AppResult<Quiz> {
        let id = quiz_id.to_string();
        let value = self
            .get_json(
                &["quiz", id.as_str()],
                FailureMessage::Generic("Failed to fetch quiz details"),
            )
            .await?;
        decode("/quiz", value)
    }

    async fn submit(&self, submission: &QuizSubmission) -> AppResult<ScoreResult> {
        info!(
            "📤 提交测验 {}: {} 个答案, 用时 {} 秒",
            submission.quiz_id,
            submission.answers.len(),
            submission.time_taken
        );
        let value = self
            .post_json(
                &["submit_quiz"],
                submission,
                FailureMessage::Generic("Submission failed"),
            )
            .await?;
        decode("/submit_quiz", value)
    }
}

/// 从错误响应体中提取 `detail`
///
/// `detail` 可能是字符串，也可能是校验错误列表（每项带 `msg`）
fn extract_detail(body: &JsonValue) -> Option<String> {
    match body.get("detail")? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|v| v.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client_for(base: &str) -> HttpQuizClient {
        let config = Config {
            api_base_url: base.to_string(),
            ..Config::default()
        };
        HttpQuizClient::new(&config).unwrap()
    }

    #[test]
    fn endpoint_joins_segments() {
        let client = client_for("http://localhost:8000/api");
        assert_eq!(
            client.endpoint(&["history"]).as_str(),
            "http://localhost:8000/api/history"
        );
        let client = client_for("http://localhost:8000/api/");
        assert_eq!(
            client.endpoint(&["quiz", "12"]).as_str(),
            "http://localhost:8000/api/quiz/12"
        );
    }

    #[test]
    fn endpoint_escapes_opaque_ids() {
        let client = client_for("http://localhost:8000/api");
        assert_eq!(
            client.endpoint(&["quiz", "a/b"]).as_str(),
            "http://localhost:8000/api/quiz/a%2Fb"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        let err = HttpQuizClient::new(&config).err().unwrap();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn detail_string_and_list() {
        assert_eq!(
            extract_detail(&json!({"detail": "Invalid URL: Must be a Wikipedia article URL"})),
            Some("Invalid URL: Must be a Wikipedia article URL".to_string())
        );
        assert_eq!(
            extract_detail(&json!({"detail": [{"msg": "too short"}, {"msg": "bad host"}]})),
            Some("too short; bad host".to_string())
        );
        assert_eq!(extract_detail(&json!({"detail": ""})), None);
        assert_eq!(extract_detail(&json!({"error": "x"})), None);
    }

    /// 启动一个只返回固定响应的本地服务，返回 API 根地址
    async fn stub_server(
        status: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/api", addr)
    }

    /// 读完请求头和请求体，避免提前关闭连接
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + body_len {
                    return;
                }
            }
        }
    }

    fn submission() -> QuizSubmission {
        QuizSubmission {
            quiz_id: QuizId::Int(3),
            answers: [(0, "Paris".to_string())].into_iter().collect(),
            time_taken: 12,
        }
    }

    fn status_of(err: &AppError) -> Option<(u16, String)> {
        match err {
            AppError::Api(ApiError::Status {
                status, message, ..
            }) => Some((*status, message.clone())),
            _ => None,
        }
    }

    #[tokio::test]
    async fn preview_and_generate_surface_server_detail() {
        let base = stub_server(
            "400 Bad Request",
            "application/json",
            r#"{"detail":"Invalid URL: Must be a Wikipedia article URL"}"#,
        )
        .await;
        let client = client_for(&base);

        let err = client.preview("https://example.com").await.unwrap_err();
        assert_eq!(
            status_of(&err),
            Some((400, "Invalid URL: Must be a Wikipedia article URL".to_string()))
        );
        let err = client.generate("https://example.com").await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid URL: Must be a Wikipedia article URL"
        );
    }

    #[tokio::test]
    async fn history_detail_and_submit_ignore_server_detail() {
        let base = stub_server("400 Bad Request", "application/json", r#"{"detail":"x"}"#).await;
        let client = client_for(&base);

        let err = client.history().await.unwrap_err();
        assert_eq!(
            status_of(&err),
            Some((400, "Failed to fetch quiz history".to_string()))
        );
        let err = client.detail(&QuizId::Int(3)).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch quiz details");
        let err = client.submit(&submission()).await.unwrap_err();
        assert_eq!(err.user_message(), "Submission failed");
    }

    #[tokio::test]
    async fn plain_text_error_body_uses_fallback() {
        let base = stub_server(
            "500 Internal Server Error",
            "text/plain",
            "Internal Server Error",
        )
        .await;
        let client = client_for(&base);

        let url = "https://en.wikipedia.org/wiki/Paris";
        let err = client.preview(url).await.unwrap_err();
        assert_eq!(status_of(&err), Some((500, "Preview failed".to_string())));
        let err = client.generate(url).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to generate quiz");
    }

    #[tokio::test]
    async fn success_with_non_json_body_is_malformed() {
        let base = stub_server("200 OK", "text/html", "<html>maintenance</html>").await;
        let client = client_for(&base);

        let err = client.history().await.unwrap_err();
        match err {
            AppError::Api(ApiError::MalformedResponse { endpoint, .. }) => {
                assert_eq!(endpoint, "/api/history");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// 需要本地运行后端：cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_history_against_local_backend() {
        let _ = tracing_subscriber::fmt::try_init();

        let client = HttpQuizClient::new(&Config::from_env()).unwrap();
        let history = client.history().await;

        match history {
            Ok(items) => println!("✅ 历史记录: {} 条", items.len()),
            Err(e) => panic!("历史记录获取失败: {}", e),
        }
    }
}
