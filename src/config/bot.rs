use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::env::EnvConfig;
use crate::error::{QaFlowError, Result};
use crate::flow::{FlowConfig, MenuVariant};
use crate::qa::{DynQaBackend, HttpQaClient, LocalEchoBackend, ResponseStreamer};
use crate::submission::{DynTicketSubmitter, LocalSubmitter, ProxySubmitter};
use crate::widget::{resolve_theme, StyleMap, StyleSource, WidgetSettings};

pub const DEFAULT_QUERY_URL: &str = "https://access-ai.ccs.uky.edu/api/query";
pub const DEFAULT_WELCOME: &str = "Hello! What can I help you with?";
pub const DEFAULT_PROMPT: &str = "Questions should stand alone and not refer to previous ones.";

const API_KEY_ENV: &str = "QAFLOW_API_KEY";

fn default_query_url() -> String {
    DEFAULT_QUERY_URL.to_string()
}

fn default_welcome() -> String {
    DEFAULT_WELCOME.to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

/// 机器人配置
///
/// 启动时读取一次；JSON 文件中的值会被环境变量覆盖。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// 直接的 key，或 `${VAR}` 形式的环境变量引用
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_query_url")]
    pub query_url: String,
    #[serde(default)]
    pub proxy_base_url: Option<String>,
    #[serde(default)]
    pub proxy_function: Option<String>,
    #[serde(default = "default_welcome")]
    pub welcome: String,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub embedded: bool,
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub disabled: Option<bool>,
    #[serde(default)]
    pub variant: MenuVariant,
    /// 容器上定义的样式变量
    #[serde(default)]
    pub style: StyleMap,
    /// 父级上定义的样式变量
    #[serde(default)]
    pub parent_style: StyleMap,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            query_url: default_query_url(),
            proxy_base_url: None,
            proxy_function: None,
            welcome: default_welcome(),
            prompt: default_prompt(),
            embedded: false,
            is_logged_in: false,
            is_anonymous: None,
            disabled: None,
            variant: MenuVariant::default(),
            style: StyleMap::default(),
            parent_style: StyleMap::default(),
        }
    }
}

impl BotConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| QaFlowError::Config(format!("failed to parse bot config: {}", e)))
    }

    /// 读取 JSON 文件，再叠加环境变量
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            QaFlowError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)?.with_env();
        info!(path = %path.display(), "bot config loaded");
        Ok(config)
    }

    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    fn with_env(mut self) -> Self {
        if let Some(key) = EnvConfig::get_env_optional(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = EnvConfig::get_env_optional("QAFLOW_QUERY_URL") {
            self.query_url = url;
        }
        if let Some(base) = EnvConfig::get_env_optional("QAFLOW_PROXY_BASE_URL") {
            self.proxy_base_url = Some(base);
        }
        if let Some(function) = EnvConfig::get_env_optional("QAFLOW_PROXY_FUNCTION") {
            self.proxy_function = Some(function);
        }
        if let Some(welcome) = EnvConfig::get_env_optional("QAFLOW_WELCOME") {
            self.welcome = welcome;
        }
        self
    }

    /// 未显式设置时等于未登录
    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous.unwrap_or(!self.is_logged_in)
    }

    /// 未显式设置时匿名用户禁止输入
    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or_else(|| self.is_anonymous())
    }

    pub fn resolve_api_key(&self) -> Result<String> {
        EnvConfig::get_api_key(self.api_key.as_deref().unwrap_or_default(), API_KEY_ENV)
    }

    pub fn widget_settings(&self) -> WidgetSettings {
        let theme = resolve_theme(
            Some(&self.style as &dyn StyleSource),
            Some(&self.parent_style as &dyn StyleSource),
            self.embedded,
        );
        WidgetSettings::new(theme, &self.prompt, self.is_disabled())
    }

    pub fn qa_backend(&self, echo: bool) -> Result<DynQaBackend> {
        if echo {
            debug!("using local echo backend");
            return Ok(Arc::new(LocalEchoBackend));
        }
        let key = self.resolve_api_key()?;
        Ok(Arc::new(HttpQaClient::new(self.query_url.clone(), key)?))
    }

    /// 未配置中转地址时只在本地记录提交
    pub fn submitter(&self) -> Result<DynTicketSubmitter> {
        match (&self.proxy_base_url, &self.proxy_function) {
            (Some(base), Some(function)) => {
                Ok(Arc::new(ProxySubmitter::new(base.clone(), function.clone())?))
            }
            (None, None) => {
                debug!("proxy not configured, submissions stay local");
                Ok(Arc::new(LocalSubmitter))
            }
            _ => Err(QaFlowError::Config(
                "proxy base url and function name must be set together".to_string(),
            )),
        }
    }

    pub fn flow_config(&self, echo: bool) -> Result<FlowConfig> {
        let streamer = Arc::new(ResponseStreamer::new(self.qa_backend(echo)?));
        Ok(FlowConfig::new(streamer, self.submitter()?)
            .with_welcome(self.welcome.clone())
            .with_variant(self.variant))
    }
}
