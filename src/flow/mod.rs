// Flow 模块 - 对话图定义与组装

pub mod assembler;
pub mod context;
pub mod graph;
pub mod ids;
pub mod nodes;
pub mod subflows;

// 重新导出核心类型
pub use assembler::{assemble, FlowAssembler, Subgraph};
pub use context::{FlowConfig, MenuVariant};
pub use graph::{FlowGraph, MessageSummary, NodeSummary};
pub use ids::NodeId;
pub use nodes::{
    AttachedUi, FlowNode, MessageFn, NextNode, NodeFuture, NodeMessage, SelectorFn, SideEffect,
    StreamedMessageFn, UploadBinding,
};
pub use subflows::BACK_TO_MAIN_MENU;
