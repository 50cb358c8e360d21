use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

/// 宿主组件提供的消息输出
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// 追加一条完整消息
    async fn inject_message(&self, text: &str);
    /// 用新的前缀替换正在流式输出的消息
    async fn stream_message(&self, partial: &str);
}

pub type DynMessageSink = Arc<dyn MessageSink>;

/// 单轮调用参数：用户输入与消息输出
#[derive(Clone)]
pub struct Turn {
    pub user_input: String,
    sink: DynMessageSink,
}

impl Turn {
    pub fn new(user_input: impl Into<String>, sink: DynMessageSink) -> Self {
        Self {
            user_input: user_input.into(),
            sink,
        }
    }

    pub fn input(&self) -> &str {
        &self.user_input
    }

    pub fn sink(&self) -> &dyn MessageSink {
        self.sink.as_ref()
    }

    pub async fn inject(&self, text: &str) {
        self.sink.inject_message(text).await;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Injected(String),
    Streamed(String),
}

/// 记录所有输出的内存实现
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn injected(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Injected(text) => Some(text.clone()),
                SinkEvent::Streamed(_) => None,
            })
            .collect()
    }

    pub fn streamed(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Streamed(text) => Some(text.clone()),
                SinkEvent::Injected(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn inject_message(&self, text: &str) {
        self.events.lock().push(SinkEvent::Injected(text.to_string()));
    }

    async fn stream_message(&self, partial: &str) {
        self.events.lock().push(SinkEvent::Streamed(partial.to_string()));
    }
}
