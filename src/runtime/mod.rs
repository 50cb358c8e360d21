// 运行时模块：会话驱动与消息输出

mod session;
mod sink;

pub use session::{ChatSession, NodeView, MAX_AUTO_ADVANCE};
pub use sink::{DynMessageSink, MessageSink, RecordingSink, SinkEvent, Turn};
