use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use super::sink::{DynMessageSink, Turn};
use crate::error::{QaFlowError, Result};
use crate::flow::{assemble, AttachedUi, FlowConfig, FlowGraph, FlowNode, NodeId, NodeMessage};
use crate::forms::{FileUploadSurface, UploadedFile};

/// 单轮内自动前进的最大跳数
pub const MAX_AUTO_ADVANCE: u32 = 16;

/// 当前节点的展示信息
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub node: NodeId,
    /// 非流式消息的文本；流式消息已经通过 sink 输出
    pub message: Option<String>,
    pub options: Vec<String>,
    pub input_locked: bool,
    pub file_upload: bool,
}

impl NodeView {
    fn of(node: &FlowNode, message: Option<String>) -> Self {
        Self {
            node: node.id,
            message,
            options: node.options.clone(),
            input_locked: node.input_locked,
            file_upload: node.attached_ui.is_some(),
        }
    }
}

/// 一个用户的对话会话
///
/// 每轮：执行当前节点的副作用，解析转换，然后用同一输入进入下一个节点。
/// 进入 `start` 时清空表单与问答错误标志。
pub struct ChatSession {
    graph: Arc<FlowGraph>,
    config: FlowConfig,
    sink: DynMessageSink,
    current: Option<NodeId>,
    upload: Option<FileUploadSurface>,
}

impl ChatSession {
    /// 图必须由同一个 `config` 组装，否则重置的表单与图里写入的不是同一份
    fn new(graph: FlowGraph, config: FlowConfig, sink: DynMessageSink) -> Self {
        let graph = Arc::new(graph);
        Self {
            graph,
            config,
            sink,
            current: None,
            upload: None,
        }
    }

    /// 按配置组装对话图并创建会话
    ///
    /// 每个会话拿到自己的表单与问答错误状态，同一配置创建的会话互不影响。
    pub fn from_config(config: &FlowConfig, sink: DynMessageSink) -> Result<Self> {
        let config = config.for_session();
        let graph = assemble(&config)?;
        Ok(Self::new(graph, config, sink))
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// 进入 `start` 并展示欢迎语
    pub async fn start(&mut self) -> Result<NodeView> {
        let turn = Turn::new(String::new(), Arc::clone(&self.sink));
        self.enter(self.graph.start(), &turn).await
    }

    /// 丢弃当前位置，从 `start` 重新开始
    pub async fn restart(&mut self) -> Result<NodeView> {
        debug!("session restarted");
        self.current = None;
        self.upload = None;
        self.start().await
    }

    #[instrument(skip(self), fields(node = ?self.current))]
    pub async fn respond(&mut self, input: &str) -> Result<NodeView> {
        let current = self.current.ok_or(QaFlowError::NotStarted)?;
        let turn = Turn::new(input, Arc::clone(&self.sink));
        let next = self.leave(current, &turn).await?;
        self.enter(next, &turn).await
    }

    /// 选择文件，交给当前节点的上传面板
    pub fn upload_files(&mut self, files: Vec<UploadedFile>) -> Result<()> {
        self.surface()?.select(files);
        Ok(())
    }

    /// 按位置移除已选择的文件
    pub fn remove_file(&mut self, index: usize) -> Result<()> {
        self.surface()?.remove(index)
    }

    pub fn uploaded_files(&self) -> &[UploadedFile] {
        self.upload
            .as_ref()
            .map(FileUploadSurface::files)
            .unwrap_or(&[])
    }

    fn surface(&mut self) -> Result<&mut FileUploadSurface> {
        let current = self.current;
        self.upload.as_mut().ok_or_else(|| {
            QaFlowError::NoUploadSurface(
                current.map_or_else(|| "<none>".to_string(), |id| id.to_string()),
            )
        })
    }

    /// 执行副作用并解析下一个节点
    async fn leave(&mut self, id: NodeId, turn: &Turn) -> Result<NodeId> {
        let graph = Arc::clone(&self.graph);
        let node = graph.get(id)?;

        if let Some(effect) = &node.side_effect {
            effect(turn.clone()).await;
        }

        let next = node.next.resolve(turn);
        if !node.next.targets().contains(&next) || !graph.contains(next) {
            return Err(QaFlowError::InvalidTransition {
                from: id.to_string(),
                to: next.to_string(),
            });
        }
        debug!(from = %id, to = %next, "transition");
        Ok(next)
    }

    async fn enter(&mut self, id: NodeId, turn: &Turn) -> Result<NodeView> {
        let graph = Arc::clone(&self.graph);
        let mut id = id;
        let mut hops = 0u32;

        loop {
            if id == graph.start() {
                self.config.reset_session_state();
            }

            let node = graph.get(id)?;
            let message = self.render(node, turn).await;
            self.current = Some(id);
            self.upload = match &node.attached_ui {
                Some(AttachedUi::FileUpload(binding)) => Some(FileUploadSurface::new(
                    binding.mode,
                    Arc::clone(&binding.on_upload),
                )),
                None => None,
            };

            if !node.auto_advance {
                return Ok(NodeView::of(node, message));
            }

            hops += 1;
            if hops > MAX_AUTO_ADVANCE {
                return Err(QaFlowError::MaxIterationsExceeded(MAX_AUTO_ADVANCE));
            }
            id = self.leave(id, turn).await?;
        }
    }

    async fn render(&self, node: &FlowNode, turn: &Turn) -> Option<String> {
        match &node.message {
            NodeMessage::Static(text) => {
                turn.inject(text).await;
                Some(text.clone())
            }
            NodeMessage::Computed(compute) => {
                let text = compute(turn);
                turn.inject(&text).await;
                Some(text)
            }
            NodeMessage::Streamed(stream) => {
                stream(turn.clone()).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowAssembler, Subgraph};
    use crate::qa::{LocalEchoBackend, ResponseStreamer};
    use crate::runtime::RecordingSink;
    use crate::submission::{ProxyOutcome, SubmissionPayload, TicketSubmitter};
    use async_trait::async_trait;

    struct NoopSubmitter;

    #[async_trait]
    impl TicketSubmitter for NoopSubmitter {
        async fn submit(&self, _: &SubmissionPayload, _: &str) -> ProxyOutcome {
            ProxyOutcome::Success {
                data: serde_json::Value::Null,
            }
        }
    }

    fn config() -> FlowConfig {
        FlowConfig::new(
            Arc::new(ResponseStreamer::new(Arc::new(LocalEchoBackend))),
            Arc::new(NoopSubmitter),
        )
    }

    #[tokio::test]
    async fn test_respond_before_start_fails() {
        let sink = RecordingSink::new();
        let mut session = ChatSession::from_config(&config(), Arc::new(sink)).unwrap();
        assert!(matches!(
            session.respond("hi").await,
            Err(QaFlowError::NotStarted)
        ));
    }

    #[tokio::test]
    async fn test_auto_advance_reaches_next_prompt() {
        let sink = RecordingSink::new();
        let mut session = ChatSession::from_config(&config(), Arc::new(sink.clone())).unwrap();
        session.start().await.unwrap();
        let view = session.respond("Open a Help Ticket").await.unwrap();
        assert_eq!(view.node, NodeId::AskName);
        let injected = sink.injected();
        assert_eq!(
            &injected[injected.len() - 2..],
            ["I'll help you create a help ticket.", "What is your name?"]
        );
    }

    #[tokio::test]
    async fn test_auto_advance_cycle_is_bounded() {
        let graph = FlowAssembler::new()
            .merge(
                Subgraph::new("spin")
                    .node(FlowNode::new(NodeId::Start, "hi").then(NodeId::Loop))
                    .node(
                        FlowNode::new(NodeId::Loop, "again")
                            .auto_advance()
                            .branch([NodeId::Loop, NodeId::Start], |_| NodeId::Loop),
                    ),
            )
            .build()
            .unwrap();
        let mut session = ChatSession::new(
            graph,
            config(),
            Arc::new(RecordingSink::new()),
        );
        session.start().await.unwrap();
        assert!(matches!(
            session.respond("go").await,
            Err(QaFlowError::MaxIterationsExceeded(MAX_AUTO_ADVANCE))
        ));
    }

    #[tokio::test]
    async fn test_upload_outside_upload_node_fails() {
        let mut session =
            ChatSession::from_config(&config(), Arc::new(RecordingSink::new())).unwrap();
        session.start().await.unwrap();
        assert!(matches!(
            session.upload_files(Vec::new()),
            Err(QaFlowError::NoUploadSurface(ref node)) if node == "start"
        ));
    }
}
