use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入错误（本地检测，不会发起网络请求）
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 答题会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// URL 为空
    #[error("Please enter a URL")]
    EmptyUrl,
    /// 命令参数无法解析
    #[error("无法解析参数 '{value}': {reason}")]
    BadArgument { value: String, reason: String },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接、DNS、传输等）
    #[error("网络请求失败 ({endpoint}): {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非成功状态码
    ///
    /// `message` 优先取响应体中的 `detail`，否则为该接口的通用提示
    #[error("{message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 响应体不符合约定的结构
    #[error("响应格式错误 ({endpoint}): {reason}")]
    MalformedResponse { endpoint: String, reason: String },
}

impl ApiError {
    /// 面向用户展示的消息
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network { source, .. } => {
                let msg = source.to_string();
                if msg.is_empty() {
                    "Network error occurred".to_string()
                } else {
                    msg
                }
            }
            other => other.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Network { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::MalformedResponse { endpoint, .. } => endpoint,
        }
    }
}

/// 答题会话错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 当前状态不允许该操作
    #[error("当前状态 {state} 不允许执行 {action}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    /// 题目索引超出范围
    #[error("题目索引 {index} 超出范围 [0, {total})")]
    QuestionOutOfRange { index: usize, total: usize },
    /// 选项不属于该题
    #[error("选项 '{option}' 不属于第 {index} 题")]
    InvalidOption { index: usize, option: String },
    /// 未答完所有题目
    #[error("尚未答完所有题目: 已答 {answered}/{total}")]
    Incomplete { answered: usize, total: usize },
    /// 没有可操作的测验
    #[error("当前没有打开的测验")]
    NoActiveQuiz,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// API 地址无效
    #[error("API地址无效 ({url}): {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::Network {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建响应格式错误
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Api(ApiError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        })
    }

    /// 面向用户展示的消息（不带分类前缀）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Input(e) => e.to_string(),
            AppError::Api(e) => e.user_message(),
            AppError::Session(e) => e.to_string(),
            AppError::Config(e) => e.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_shows_message_verbatim() {
        let err = AppError::Api(ApiError::Status {
            endpoint: "/preview_url".to_string(),
            status: 400,
            message: "Invalid URL: page does not exist".to_string(),
        });
        assert_eq!(err.user_message(), "Invalid URL: page does not exist");
        assert!(err.to_string().starts_with("API错误"));
    }

    #[test]
    fn input_error_message() {
        let err: AppError = InputError::EmptyUrl.into();
        assert_eq!(err.user_message(), "Please enter a URL");
    }

    #[test]
    fn malformed_keeps_endpoint() {
        let err = AppError::malformed("/history", "expected array");
        match err {
            AppError::Api(api) => {
                assert_eq!(api.endpoint(), "/history");
                assert!(api.user_message().contains("expected array"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
