#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use qaflow::{
    ChatSession, DynQaBackend, FlowConfig, FormStore, MenuVariant, ProxyOutcome, QaBackend,
    QaFailure, RecordingSink, ResponseStreamer, SubmissionPayload, TicketSubmitter,
};

/// 记录每次提交，按脚本依次返回结果
#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    calls: Arc<Mutex<Vec<(SubmissionPayload, String)>>>,
    script: Arc<Mutex<VecDeque<ProxyOutcome>>>,
}

impl RecordingSubmitter {
    pub fn then(self, outcome: ProxyOutcome) -> Self {
        self.script.lock().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<(SubmissionPayload, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TicketSubmitter for RecordingSubmitter {
    async fn submit(&self, payload: &SubmissionPayload, endpoint_tag: &str) -> ProxyOutcome {
        self.calls
            .lock()
            .push((payload.clone(), endpoint_tag.to_string()));
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| ProxyOutcome::Success {
                data: json!({ "jsmResponse": { "issueKey": "ACC-1" } }),
            })
    }
}

/// 输入 `fail` 时失败，其余回显
pub struct ScriptedBackend;

#[async_trait]
impl QaBackend for ScriptedBackend {
    async fn ask(&self, question: &str) -> Result<String, QaFailure> {
        if question == "fail" {
            Err(QaFailure::Transport("connection refused".into()))
        } else {
            Ok(format!("answer to {question}"))
        }
    }
}

pub struct Harness {
    pub session: ChatSession,
    pub sink: RecordingSink,
    pub submitter: RecordingSubmitter,
    pub streamer: Arc<ResponseStreamer>,
    pub ticket_form: FormStore,
    pub feedback_form: FormStore,
}

impl Harness {
    pub fn new(backend: DynQaBackend, submitter: RecordingSubmitter, variant: MenuVariant) -> Self {
        Self::for_config(&Self::config(backend, submitter.clone(), variant), submitter)
    }

    pub fn config(
        backend: DynQaBackend,
        submitter: RecordingSubmitter,
        variant: MenuVariant,
    ) -> FlowConfig {
        FlowConfig::new(Arc::new(ResponseStreamer::new(backend)), Arc::new(submitter))
            .with_variant(variant)
    }

    /// 从共享配置创建一个会话，表单句柄取自会话自己的配置
    pub fn for_config(config: &FlowConfig, submitter: RecordingSubmitter) -> Self {
        let sink = RecordingSink::new();
        let session = ChatSession::from_config(config, Arc::new(sink.clone()))
            .expect("flow assembles");
        let streamer = Arc::clone(&session.config().streamer);
        let ticket_form = session.config().ticket_form.clone();
        let feedback_form = session.config().feedback_form.clone();
        Self {
            session,
            sink,
            submitter,
            streamer,
            ticket_form,
            feedback_form,
        }
    }

    pub fn extended(submitter: RecordingSubmitter) -> Self {
        Self::new(Arc::new(ScriptedBackend), submitter, MenuVariant::Extended)
    }

    /// 依次回答，返回最后的节点视图
    pub async fn answer_all(&mut self, inputs: &[&str]) -> qaflow::runtime::NodeView {
        let mut last = None;
        for input in inputs {
            last = Some(self.session.respond(input).await.expect("turn succeeds"));
        }
        last.expect("at least one input")
    }

    pub fn last_injected(&self) -> String {
        self.sink.injected().last().cloned().unwrap_or_default()
    }
}
