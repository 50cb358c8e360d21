use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_WELCOME;
use crate::error::QaFlowError;
use crate::forms::FormStore;
use crate::qa::ResponseStreamer;
use crate::submission::DynTicketSubmitter;

/// 主菜单形态
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuVariant {
    /// 欢迎语后直接进入连续问答
    Minimal,
    /// 带问答、工单、开发工单、反馈入口的菜单
    #[default]
    Extended,
}

impl FromStr for MenuVariant {
    type Err = QaFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(MenuVariant::Minimal),
            "extended" => Ok(MenuVariant::Extended),
            other => Err(QaFlowError::Config(format!("unknown menu variant `{other}`"))),
        }
    }
}

impl fmt::Display for MenuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuVariant::Minimal => "minimal",
            MenuVariant::Extended => "extended",
        })
    }
}

/// 组装对话图所需的依赖
///
/// 表单与流式控制器属于单个会话，创建会话时经 [`FlowConfig::for_session`] 复制。
#[derive(Clone)]
pub struct FlowConfig {
    pub streamer: Arc<ResponseStreamer>,
    pub submitter: DynTicketSubmitter,
    pub welcome: String,
    pub ticket_form: FormStore,
    pub feedback_form: FormStore,
    pub variant: MenuVariant,
}

impl FlowConfig {
    pub fn new(streamer: Arc<ResponseStreamer>, submitter: DynTicketSubmitter) -> Self {
        Self {
            streamer,
            submitter,
            welcome: DEFAULT_WELCOME.to_string(),
            ticket_form: FormStore::new(),
            feedback_form: FormStore::new(),
            variant: MenuVariant::default(),
        }
    }

    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self
    }

    pub fn with_variant(mut self, variant: MenuVariant) -> Self {
        self.variant = variant;
        self
    }

    /// 为一个新会话复制配置
    ///
    /// 后端与提交器共用；表单和问答错误状态每个会话独立。
    pub fn for_session(&self) -> Self {
        Self {
            streamer: Arc::new(self.streamer.fresh()),
            submitter: Arc::clone(&self.submitter),
            welcome: self.welcome.clone(),
            ticket_form: FormStore::new(),
            feedback_form: FormStore::new(),
            variant: self.variant,
        }
    }

    /// 清空两个表单与问答错误标志
    pub fn reset_session_state(&self) {
        self.ticket_form.reset();
        self.feedback_form.reset();
        self.streamer.reset_error();
    }
}
