use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::classifier::classify;
use super::client::{DynQaBackend, QaFailure};
use crate::runtime::Turn;

/// 每个前缀之间的固定间隔
pub const STREAM_STEP_DELAY: Duration = Duration::from_millis(2);

/// 单次请求的凭证
///
/// 转换解析器读取发起请求的那个凭证，而不是共享的会话标志。
#[derive(Clone, Debug)]
pub struct RequestToken {
    generation: u64,
    failed: Arc<AtomicBool>,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

/// 一次问答请求的结果
#[derive(Clone, Debug)]
pub struct StreamOutcome {
    pub token: RequestToken,
    pub answer: std::result::Result<String, QaFailure>,
}

impl StreamOutcome {
    pub fn is_error(&self) -> bool {
        self.answer.is_err()
    }
}

/// 把完整文本拆成逐字符递增的前缀
pub fn typing_prefixes(text: String) -> impl Stream<Item = String> + Send {
    futures::stream::unfold((text, 0usize), |(text, pos)| async move {
        let ch = text[pos..].chars().next()?;
        let end = pos + ch.len_utf8();
        let prefix = text[..end].to_string();
        Some((prefix, (text, end)))
    })
}

/// 问答流式输出控制器
///
/// 会话错误标志一旦置位就保持，直到调用方 `reset_error`；
/// 只有最新发起的请求可以置位它。
pub struct ResponseStreamer {
    backend: DynQaBackend,
    latest: AtomicU64,
    has_error: AtomicBool,
}

impl ResponseStreamer {
    pub fn new(backend: DynQaBackend) -> Self {
        Self {
            backend,
            latest: AtomicU64::new(0),
            has_error: AtomicBool::new(false),
        }
    }

    /// 共用同一后端、状态全新的控制器
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.backend))
    }

    pub fn begin(&self) -> RequestToken {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            generation,
            failed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.generation
    }

    pub fn has_error(&self) -> bool {
        self.has_error.load(Ordering::SeqCst)
    }

    pub fn reset_error(&self) {
        self.has_error.store(false, Ordering::SeqCst);
    }

    pub async fn fetch_and_stream(&self, turn: &Turn) -> StreamOutcome {
        let token = self.begin();
        debug!(generation = token.generation, "asking backend");

        match self.backend.ask(turn.input()).await {
            Ok(answer) => {
                let mut prefixes = Box::pin(typing_prefixes(answer.clone()));
                while let Some(prefix) = prefixes.next().await {
                    turn.sink().stream_message(&prefix).await;
                    sleep(STREAM_STEP_DELAY).await;
                }
                StreamOutcome {
                    token,
                    answer: Ok(answer),
                }
            }
            Err(failure) => {
                token.failed.store(true, Ordering::SeqCst);
                if self.is_current(&token) {
                    self.has_error.store(true, Ordering::SeqCst);
                } else {
                    debug!(generation = token.generation, "stale request failed, flag untouched");
                }
                warn!(error = %failure, "question could not be answered");
                turn.inject(classify(&failure.to_error_input())).await;
                StreamOutcome {
                    token,
                    answer: Err(failure),
                }
            }
        }
    }
}
