// 问答模块：后端客户端、流式输出与错误分类

pub mod classifier;
mod client;
mod streamer;

pub use classifier::{classify, ErrorInput};
pub use client::{DynQaBackend, HttpQaClient, LocalEchoBackend, QaBackend, QaFailure};
pub use streamer::{
    typing_prefixes, RequestToken, ResponseStreamer, StreamOutcome, STREAM_STEP_DELAY,
};
