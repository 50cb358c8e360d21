use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use super::classifier::ErrorInput;
use crate::error::{QaFlowError, Result};

/// 问答请求失败的原因
///
/// `Display` 文本携带分类器识别的标记。
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QaFailure {
    #[error("Failed to fetch: {0}")]
    Transport(String),
    #[error("HTTP error! status: {0}")]
    Http(u16),
    #[error("backend reported an error: {0}")]
    Backend(Value),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl QaFailure {
    pub fn to_error_input(&self) -> ErrorInput {
        match self {
            QaFailure::Transport(_) | QaFailure::Http(_) => ErrorInput::Text(self.to_string()),
            QaFailure::Backend(body) => ErrorInput::from(body),
            QaFailure::Malformed(_) => ErrorInput::Absent,
        }
    }
}

/// 问答后端
#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn ask(&self, question: &str) -> std::result::Result<String, QaFailure>;
}

pub type DynQaBackend = Arc<dyn QaBackend>;

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// HTTP 问答客户端
///
/// `POST {"query": ...}`，携带 `X-API-KEY`，期望返回 `{"response": ...}`。
#[derive(Clone)]
pub struct HttpQaClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpQaClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| QaFlowError::Other(e.into()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl QaBackend for HttpQaClient {
    #[instrument(skip(self, question), fields(endpoint = %self.endpoint))]
    async fn ask(&self, question: &str) -> std::result::Result<String, QaFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&QueryRequest { query: question })
            .send()
            .await
            .map_err(|e| QaFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QaFailure::Http(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| QaFailure::Malformed(e.to_string()))?;

        match body.get("response").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => {
                debug!(chars = text.chars().count(), "received answer");
                Ok(text.to_string())
            }
            Some(_) => Err(QaFailure::Malformed("empty `response`".into())),
            None if body.get("error").is_some() => Err(QaFailure::Backend(body)),
            None => Err(QaFailure::Malformed("missing `response`".into())),
        }
    }
}

/// 本地回显后端，用于未配置接口时演示问答循环
#[derive(Default, Clone)]
pub struct LocalEchoBackend;

#[async_trait]
impl QaBackend for LocalEchoBackend {
    async fn ask(&self, question: &str) -> std::result::Result<String, QaFailure> {
        Ok(format!("[Echo] {}", question))
    }
}
