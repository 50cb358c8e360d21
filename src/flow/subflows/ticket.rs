use super::BACK_TO_MAIN_MENU;
use crate::flow::assembler::Subgraph;
use crate::flow::context::FlowConfig;
use crate::flow::ids::NodeId;
use crate::flow::nodes::FlowNode;
use crate::forms::{fields, FormState};

pub fn ticket_summary(form: &FormState) -> String {
    format!(
        "Thank you, I have submitted your help ticket with the following information:\nName: {}\nFavorite Color: {}",
        form.text_or(fields::NAME, ""),
        form.text_or(fields::COLOR, ""),
    )
}

/// 简单工单：只收集并回显，不调用后端
pub fn ticket(config: &FlowConfig) -> Subgraph {
    let name_store = config.ticket_form.clone();
    let color_store = config.ticket_form.clone();
    let summary_store = config.ticket_form.clone();

    Subgraph::new("ticket")
        .node(
            FlowNode::new(NodeId::HelpTicket, "I'll help you create a help ticket.")
                .auto_advance()
                .then(NodeId::AskName),
        )
        .node(
            FlowNode::new(NodeId::AskName, "What is your name?")
                .on_input(move |turn| {
                    name_store.set(fields::NAME, turn.input());
                })
                .then(NodeId::AskColor),
        )
        .node(
            FlowNode::new(NodeId::AskColor, "What is your favorite color?")
                .on_input(move |turn| {
                    color_store.set(fields::COLOR, turn.input());
                })
                .then(NodeId::SubmitTicket),
        )
        .node(
            FlowNode::computed(NodeId::SubmitTicket, move |_| {
                ticket_summary(&summary_store.current())
            })
            .options([BACK_TO_MAIN_MENU])
            .locked()
            .then(NodeId::Start),
        )
}
