use std::collections::HashMap;

use tracing::debug;

use super::context::{FlowConfig, MenuVariant};
use super::graph::FlowGraph;
use super::ids::NodeId;
use super::nodes::FlowNode;
use super::subflows;
use crate::error::{QaFlowError, Result};

/// 独立编写的子图
///
/// `overrides` 列出有意覆盖先前子图的共享入口节点。
#[derive(Clone, Debug)]
pub struct Subgraph {
    name: &'static str,
    nodes: Vec<FlowNode>,
    overrides: Vec<NodeId>,
}

impl Subgraph {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            nodes: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn node(mut self, node: FlowNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn overrides(mut self, id: NodeId) -> Self {
        self.overrides.push(id);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }
}

/// 按节点 id 合并子图
///
/// 未声明的 id 冲突在组装时直接失败。
#[derive(Default)]
pub struct FlowAssembler {
    subgraphs: Vec<Subgraph>,
}

impl FlowAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(mut self, subgraph: Subgraph) -> Self {
        self.subgraphs.push(subgraph);
        self
    }

    pub fn build(self) -> Result<FlowGraph> {
        let mut nodes: HashMap<NodeId, FlowNode> = HashMap::new();
        let mut owners: HashMap<NodeId, &'static str> = HashMap::new();

        for subgraph in self.subgraphs {
            let mut seen = Vec::with_capacity(subgraph.nodes.len());
            for node in subgraph.nodes {
                let id = node.id;
                if seen.contains(&id) {
                    return Err(QaFlowError::NodeCollision {
                        node: id.to_string(),
                        existing: subgraph.name.to_string(),
                        incoming: subgraph.name.to_string(),
                    });
                }
                seen.push(id);

                if let Some(existing) = owners.get(&id) {
                    if !subgraph.overrides.contains(&id) {
                        return Err(QaFlowError::NodeCollision {
                            node: id.to_string(),
                            existing: existing.to_string(),
                            incoming: subgraph.name.to_string(),
                        });
                    }
                    debug!(node = %id, from = existing, to = subgraph.name, "node overridden");
                }
                owners.insert(id, subgraph.name);
                nodes.insert(id, node);
            }
        }

        FlowGraph::new(nodes)
    }
}

/// 由共享依赖组装完整对话图
///
/// 相同输入总是得到相同的图，依赖变化时可随时重新组装。
pub fn assemble(config: &FlowConfig) -> Result<FlowGraph> {
    let assembler = FlowAssembler::new().merge(subflows::continuous_qa(config));

    let assembler = match config.variant {
        MenuVariant::Minimal => assembler,
        MenuVariant::Extended => assembler
            .merge(subflows::qa(config))
            .merge(subflows::ticket(config))
            .merge(subflows::dev_ticket(config))
            .merge(subflows::feedback(config))
            .merge(subflows::main_menu(config)),
    };

    let graph = assembler.build()?;
    debug!(nodes = graph.len(), variant = ?config.variant, "flow assembled");
    Ok(graph)
}
