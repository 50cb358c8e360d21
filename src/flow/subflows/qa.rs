use std::sync::Arc;

use tracing::debug;

use super::{LastRequest, BACK_TO_MAIN_MENU};
use crate::flow::assembler::Subgraph;
use crate::flow::context::{FlowConfig, MenuVariant};
use crate::flow::ids::NodeId;
use crate::flow::nodes::FlowNode;
use crate::qa::ResponseStreamer;
use crate::runtime::Turn;

async fn answer(streamer: Arc<ResponseStreamer>, turn: Turn) -> Option<String> {
    streamer.fetch_and_stream(&turn).await.answer.ok()
}

/// 单轮问答：回答后提供返回主菜单
pub fn qa(config: &FlowConfig) -> Subgraph {
    let streamer = Arc::clone(&config.streamer);

    let go_ahead = FlowNode::new(NodeId::GoAheadAndAsk, "Great. Please type your question.")
        .then(NodeId::QaLoop);

    let qa_loop = FlowNode::streamed(NodeId::QaLoop, move |turn| {
        answer(Arc::clone(&streamer), turn)
    })
    .options([BACK_TO_MAIN_MENU])
    .locked()
    .then(NodeId::Start);

    Subgraph::new("qa").node(go_ahead).node(qa_loop)
}

/// 连续问答：`start` 欢迎后进入 `loop`
///
/// `loop` 一直回到自身，直到它自己发起的请求失败。扩展菜单下
/// `loop` 还提供返回主菜单的选项。
pub fn continuous_qa(config: &FlowConfig) -> Subgraph {
    let with_menu = config.variant == MenuVariant::Extended;
    let streamer = Arc::clone(&config.streamer);
    let last = LastRequest::default();
    let recorder = last.clone();

    let start = FlowNode::new(NodeId::Start, config.welcome.as_str()).then(NodeId::Loop);

    let mut looping = FlowNode::streamed(NodeId::Loop, move |turn| {
        let streamer = Arc::clone(&streamer);
        let recorder = recorder.clone();
        async move {
            let outcome = streamer.fetch_and_stream(&turn).await;
            recorder.record(outcome.token.clone());
            outcome.answer.ok()
        }
    })
    .branch([NodeId::Start, NodeId::Loop], move |turn| {
        if with_menu && turn.input().trim() == BACK_TO_MAIN_MENU {
            NodeId::Start
        } else if last.failed() {
            debug!("last question failed, returning to start");
            NodeId::Start
        } else {
            NodeId::Loop
        }
    });
    if with_menu {
        looping = looping.options([BACK_TO_MAIN_MENU]);
    }

    Subgraph::new("continuous_qa").node(start).node(looping)
}
