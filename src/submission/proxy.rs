use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::payload::SubmissionPayload;
use crate::error::{QaFlowError, Result};

/// 中转提交结果
#[derive(Clone, Debug, PartialEq)]
pub enum ProxyOutcome {
    Success {
        data: Value,
    },
    Failure {
        status: Option<u16>,
        error: String,
    },
}

impl ProxyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProxyOutcome::Success { .. })
    }

    /// `{success, data}` / `{success, status, error}` 形式
    pub fn to_json(&self) -> Value {
        match self {
            ProxyOutcome::Success { data } => serde_json::json!({
                "success": true,
                "data": data,
            }),
            ProxyOutcome::Failure { status, error } => serde_json::json!({
                "success": false,
                "status": status,
                "error": error,
            }),
        }
    }
}

/// 工单提交接口
///
/// 实现不得向外抛出错误，失败统一归一化为 `ProxyOutcome::Failure`。
#[async_trait]
pub trait TicketSubmitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload, endpoint_tag: &str) -> ProxyOutcome;
}

pub type DynTicketSubmitter = Arc<dyn TicketSubmitter>;

/// 通过 HTTP 中转服务提交
#[derive(Clone)]
pub struct ProxySubmitter {
    client: reqwest::Client,
    base_url: String,
    function_name: String,
}

impl ProxySubmitter {
    pub fn new(base_url: impl Into<String>, function_name: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| QaFlowError::Other(e.into()))?;
        Ok(Self::with_client(client, base_url, function_name))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            function_name: function_name.into(),
        }
    }

    pub fn endpoint(&self, endpoint_tag: &str) -> String {
        format!("{}{}/{}", self.base_url, self.function_name, endpoint_tag)
    }
}

#[async_trait]
impl TicketSubmitter for ProxySubmitter {
    #[instrument(skip(self, payload), fields(request_type = payload.request_type_id))]
    async fn submit(&self, payload: &SubmissionPayload, endpoint_tag: &str) -> ProxyOutcome {
        let url = self.endpoint(endpoint_tag);

        let response = match self.client.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "proxy request failed");
                return ProxyOutcome::Failure {
                    status: None,
                    error: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "failed to read proxy response");
                return ProxyOutcome::Failure {
                    status: Some(status.as_u16()),
                    error: e.to_string(),
                };
            }
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "proxy returned an error");
            return ProxyOutcome::Failure {
                status: Some(status.as_u16()),
                error: body,
            };
        }

        info!(status = status.as_u16(), "submission accepted by proxy");
        let data = serde_json::from_str(&body).unwrap_or(Value::String(body));
        ProxyOutcome::Success { data }
    }
}

/// 本地提交器：只记录负载，不发送
pub struct LocalSubmitter;

#[async_trait]
impl TicketSubmitter for LocalSubmitter {
    async fn submit(&self, payload: &SubmissionPayload, endpoint_tag: &str) -> ProxyOutcome {
        info!(
            endpoint = endpoint_tag,
            fields = payload.request_field_values.len(),
            attachments = payload.attachments.as_ref().map_or(0, Vec::len),
            "submission kept locally"
        );
        ProxyOutcome::Success {
            data: serde_json::json!({ "local": true }),
        }
    }
}
