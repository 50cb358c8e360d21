use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use super::ids::NodeId;
use super::nodes::{FlowNode, NodeMessage};
use crate::error::{QaFlowError, Result};

/// 组装完成的对话图，组装后只读
#[derive(Clone, Debug)]
pub struct FlowGraph {
    start: NodeId,
    nodes: HashMap<NodeId, FlowNode>,
}

impl FlowGraph {
    /// 构建并校验
    ///
    /// 每个转换目标都必须存在，且每个节点都能回到 `start`。
    pub fn new(nodes: HashMap<NodeId, FlowNode>) -> Result<Self> {
        let graph = Self {
            start: NodeId::Start,
            nodes,
        };
        graph.validate()?;
        Ok(graph)
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.nodes.get(&id)
    }

    pub fn get(&self, id: NodeId) -> Result<&FlowNode> {
        self.node(id)
            .ok_or_else(|| QaFlowError::UnknownNode(id.to_string()))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if !self.contains(self.start) {
            return Err(QaFlowError::MissingStart);
        }

        let mut inbound: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for node in self.nodes.values() {
            for target in node.next.targets() {
                if !self.contains(target) {
                    return Err(QaFlowError::InvalidTransition {
                        from: node.id.to_string(),
                        to: target.to_string(),
                    });
                }
                inbound.entry(target).or_default().push(node.id);
            }
        }

        // 从 start 反向遍历，得到所有能回到 start 的节点
        let mut reaches_start = HashSet::from([self.start]);
        let mut queue = VecDeque::from([self.start]);
        while let Some(id) = queue.pop_front() {
            for source in inbound.get(&id).into_iter().flatten() {
                if reaches_start.insert(*source) {
                    queue.push_back(*source);
                }
            }
        }

        match self.ids().into_iter().find(|id| !reaches_start.contains(id)) {
            Some(stuck) => Err(QaFlowError::StartUnreachable(stuck.to_string())),
            None => Ok(()),
        }
    }

    /// 用于展示的图结构摘要
    pub fn describe(&self) -> Vec<NodeSummary> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.node(id))
            .map(|node| NodeSummary {
                id: node.id,
                message: match &node.message {
                    NodeMessage::Static(text) => MessageSummary::Static(text.clone()),
                    NodeMessage::Computed(_) => MessageSummary::Computed,
                    NodeMessage::Streamed(_) => MessageSummary::Streamed,
                },
                options: node.options.clone(),
                targets: node.next.targets(),
                input_locked: node.input_locked,
                auto_advance: node.auto_advance,
                file_upload: node.attached_ui.is_some(),
                has_side_effect: node.side_effect.is_some(),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "text")]
pub enum MessageSummary {
    Static(String),
    Computed,
    Streamed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub message: MessageSummary,
    pub options: Vec<String>,
    pub targets: Vec<NodeId>,
    pub input_locked: bool,
    pub auto_advance: bool,
    pub file_upload: bool,
    pub has_side_effect: bool,
}
