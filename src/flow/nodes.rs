use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::ids::NodeId;
use crate::forms::{UploadCallback, UploadMode};
use crate::runtime::Turn;

/// Flow 节点类型定义

/// 节点异步回调返回的 Future
pub type NodeFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// 根据本轮输入计算消息
pub type MessageFn = Arc<dyn Fn(&Turn) -> String + Send + Sync>;

/// 通过 sink 流式输出消息，返回已输出的最终文本
pub type StreamedMessageFn = Arc<dyn Fn(Turn) -> NodeFuture<Option<String>> + Send + Sync>;

/// 转换前执行的副作用（写入表单状态、提交等）
pub type SideEffect = Arc<dyn Fn(Turn) -> NodeFuture<()> + Send + Sync>;

/// 根据本轮输入选择下一个节点
pub type SelectorFn = Arc<dyn Fn(&Turn) -> NodeId + Send + Sync>;

/// 节点消息
#[derive(Clone)]
pub enum NodeMessage {
    Static(String),
    Computed(MessageFn),
    Streamed(StreamedMessageFn),
}

impl From<&str> for NodeMessage {
    fn from(text: &str) -> Self {
        NodeMessage::Static(text.to_string())
    }
}

impl From<String> for NodeMessage {
    fn from(text: String) -> Self {
        NodeMessage::Static(text)
    }
}

/// 下一个节点
///
/// 动态选择必须声明所有可能的目标，组装时据此校验。
#[derive(Clone)]
pub enum NextNode {
    Fixed(NodeId),
    Select {
        targets: Vec<NodeId>,
        select: SelectorFn,
    },
}

impl NextNode {
    pub fn targets(&self) -> Vec<NodeId> {
        match self {
            NextNode::Fixed(target) => vec![*target],
            NextNode::Select { targets, .. } => targets.clone(),
        }
    }

    pub fn resolve(&self, turn: &Turn) -> NodeId {
        match self {
            NextNode::Fixed(target) => *target,
            NextNode::Select { select, .. } => select(turn),
        }
    }
}

/// 上传面板与表单的绑定
#[derive(Clone)]
pub struct UploadBinding {
    pub mode: UploadMode,
    pub on_upload: UploadCallback,
}

/// 节点附带的外部组件，对核心不透明
#[derive(Clone)]
pub enum AttachedUi {
    FileUpload(UploadBinding),
}

/// Flow 节点
#[derive(Clone)]
pub struct FlowNode {
    pub id: NodeId,
    pub message: NodeMessage,
    pub options: Vec<String>,
    pub side_effect: Option<SideEffect>,
    pub attached_ui: Option<AttachedUi>,
    pub next: NextNode,
    /// 只允许选择选项，禁止自由输入（由宿主执行）
    pub input_locked: bool,
    /// 显示消息后立即进入下一个节点
    pub auto_advance: bool,
}

impl FlowNode {
    /// 新节点，默认回到 `start`
    pub fn new(id: NodeId, message: impl Into<NodeMessage>) -> Self {
        Self {
            id,
            message: message.into(),
            options: Vec::new(),
            side_effect: None,
            attached_ui: None,
            next: NextNode::Fixed(NodeId::Start),
            input_locked: false,
            auto_advance: false,
        }
    }

    pub fn computed<F>(id: NodeId, func: F) -> Self
    where
        F: Fn(&Turn) -> String + Send + Sync + 'static,
    {
        Self::new(id, NodeMessage::Computed(Arc::new(func)))
    }

    pub fn streamed<F, Fut>(id: NodeId, func: F) -> Self
    where
        F: Fn(Turn) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        Self::new(
            id,
            NodeMessage::Streamed(Arc::new(move |turn| -> NodeFuture<Option<String>> {
                Box::pin(func(turn))
            })),
        )
    }

    pub fn then(mut self, target: NodeId) -> Self {
        self.next = NextNode::Fixed(target);
        self
    }

    pub fn branch<F>(mut self, targets: impl IntoIterator<Item = NodeId>, select: F) -> Self
    where
        F: Fn(&Turn) -> NodeId + Send + Sync + 'static,
    {
        self.next = NextNode::Select {
            targets: targets.into_iter().collect(),
            select: Arc::new(select),
        };
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// 只允许选项回复
    pub fn locked(mut self) -> Self {
        self.input_locked = true;
        self
    }

    pub fn auto_advance(mut self) -> Self {
        self.auto_advance = true;
        self
    }

    pub fn attach(mut self, ui: AttachedUi) -> Self {
        self.attached_ui = Some(ui);
        self
    }

    /// 同步副作用
    pub fn on_input<F>(self, func: F) -> Self
    where
        F: Fn(&Turn) + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        self.on_input_async(move |turn| {
            let func = Arc::clone(&func);
            async move { func(&turn) }
        })
    }

    pub fn on_input_async<F, Fut>(mut self, func: F) -> Self
    where
        F: Fn(Turn) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.side_effect = Some(Arc::new(move |turn| -> NodeFuture<()> {
            Box::pin(func(turn))
        }));
        self
    }
}

impl fmt::Debug for NodeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeMessage::Static(text) => f.debug_tuple("Static").field(text).finish(),
            NodeMessage::Computed(_) => f.write_str("Computed"),
            NodeMessage::Streamed(_) => f.write_str("Streamed"),
        }
    }
}

impl fmt::Debug for NextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextNode::Fixed(target) => f.debug_tuple("Fixed").field(target).finish(),
            NextNode::Select { targets, .. } => {
                f.debug_struct("Select").field("targets", targets).finish()
            }
        }
    }
}

impl fmt::Debug for FlowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowNode")
            .field("id", &self.id)
            .field("message", &self.message)
            .field("options", &self.options)
            .field("has_side_effect", &self.side_effect.is_some())
            .field("has_attached_ui", &self.attached_ui.is_some())
            .field("next", &self.next)
            .field("input_locked", &self.input_locked)
            .field("auto_advance", &self.auto_advance)
            .finish()
    }
}
