use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    is_yes, submit_form, upload_into, SubmitMessages, BACK_TO_MAIN_MENU, CONTINUE, NO, YES,
};
use crate::flow::assembler::Subgraph;
use crate::flow::context::FlowConfig;
use crate::flow::ids::NodeId;
use crate::flow::nodes::FlowNode;
use crate::forms::{fields, FormState, FormStore};
use crate::submission::{fields as desk, TicketType, DEV_TICKET_ENDPOINT};

pub const DEV_TICKET_KINDS: [&str; 3] = ["Bug Report", "Feature Request", "Other Development Issue"];
pub const SUBMIT_TICKET: &str = "Submit Ticket";

const NOT_PROVIDED: &str = "Not provided";

fn is_ticket_kind(input: &str) -> bool {
    DEV_TICKET_KINDS.iter().any(|kind| *kind == input)
}

const DEV_SUBMIT: SubmitMessages = SubmitMessages {
    kind: "ticket",
    tag: TicketType::Dev.tag(),
    endpoint: DEV_TICKET_ENDPOINT,
};

/// 提交前展示的汇总
pub fn grand_summary(form: &FormState) -> String {
    let files = form.files(fields::UPLOADED_FILES);
    let attachments = if files.is_empty() {
        String::new()
    } else {
        format!("\nAttachments: {} file(s) attached", files.len())
    };
    format!(
        "Thank you for providing your issue details. Here's a summary:\n\n\
         Email: {}\nACCESS ID: {}\nSummary: {}\nDescription: {}{}\n\n\
         Would you like to submit this ticket?",
        form.text_or(fields::EMAIL, NOT_PROVIDED),
        form.text_or(fields::ACCESS_ID, NOT_PROVIDED),
        form.text_or(fields::SUMMARY, NOT_PROVIDED),
        form.text_or(fields::DESCRIPTION, NOT_PROVIDED),
        attachments,
    )
}

/// 开发工单的服务台字段
fn dev_form_data(form: &FormState) -> BTreeMap<String, String> {
    desk::DEV_TICKET
        .iter()
        .map(|field| {
            (
                field.service_desk_key.to_string(),
                form.text_or(field.flow_key, "").to_string(),
            )
        })
        .collect()
}

/// 记录一个文本回答并前进到 `next`
fn ask(store: &FormStore, id: NodeId, prompt: &str, key: &'static str, next: NodeId) -> FlowNode {
    let store = store.clone();
    FlowNode::new(id, prompt)
        .on_input(move |turn| {
            store.set(key, turn.input());
        })
        .then(next)
}

pub fn dev_ticket(config: &FlowConfig) -> Subgraph {
    let form = &config.ticket_form;

    let kind_store = form.clone();
    let kind = FlowNode::new(
        NodeId::DevTicket,
        "What type of development ticket would you like to create?",
    )
    .options(DEV_TICKET_KINDS)
    .locked()
    .on_input(move |turn| {
        if is_ticket_kind(turn.input()) {
            kind_store.set(fields::TICKET_TYPE, turn.input());
        }
    })
    .branch([NodeId::DevTicketEmail, NodeId::DevTicket], |turn| {
        if is_ticket_kind(turn.input()) {
            NodeId::DevTicketEmail
        } else {
            NodeId::DevTicket
        }
    });

    let attach_store = form.clone();
    let attachment = FlowNode::new(NodeId::DevTicketAttachment, "Would you like to attach a file?")
        .options([YES, NO])
        .locked()
        .on_input(move |turn| {
            attach_store.set(fields::WANTS_ATTACHMENT, is_yes(turn.input()));
        })
        .branch(
            [NodeId::DevTicketUpload, NodeId::DevTicketGrandSummary],
            |turn| {
                if is_yes(turn.input()) {
                    NodeId::DevTicketUpload
                } else {
                    NodeId::DevTicketGrandSummary
                }
            },
        );

    let confirm_store = form.clone();
    let upload = FlowNode::new(NodeId::DevTicketUpload, "Please upload your file.")
        .attach(upload_into(form))
        .options([CONTINUE])
        .locked()
        .on_input(move |_| {
            confirm_store.set(fields::UPLOAD_CONFIRMED, true);
        })
        .then(NodeId::DevTicketGrandSummary);

    let summary_store = form.clone();
    let submit_store = form.clone();
    let retry_store = form.clone();
    let submitter = Arc::clone(&config.submitter);
    let summary = FlowNode::computed(NodeId::DevTicketGrandSummary, move |_| {
        grand_summary(&summary_store.current())
    })
    .options([SUBMIT_TICKET, BACK_TO_MAIN_MENU])
    .locked()
    .on_input_async(move |turn| {
        let store = submit_store.clone();
        let submitter = Arc::clone(&submitter);
        async move {
            if turn.input() != SUBMIT_TICKET {
                return;
            }
            let current = store.current();
            let files = if current.flag(fields::WANTS_ATTACHMENT) {
                current.files(fields::UPLOADED_FILES).to_vec()
            } else {
                Vec::new()
            };
            submit_form(
                &turn,
                &submitter,
                &store,
                dev_form_data(&current),
                &files,
                &DEV_SUBMIT,
            )
            .await;
        }
    })
    .branch([NodeId::DevTicketGrandSummary, NodeId::Start], move |turn| {
        if turn.input() == SUBMIT_TICKET && retry_store.current().flag(fields::SUBMISSION_FAILED) {
            NodeId::DevTicketGrandSummary
        } else {
            NodeId::Start
        }
    });

    Subgraph::new("dev_ticket")
        .node(kind)
        .node(ask(
            form,
            NodeId::DevTicketEmail,
            "What is your email?",
            fields::EMAIL,
            NodeId::DevTicketAccessId,
        ))
        .node(ask(
            form,
            NodeId::DevTicketAccessId,
            "What is your ACCESS ID?",
            fields::ACCESS_ID,
            NodeId::DevTicketSummary,
        ))
        .node(ask(
            form,
            NodeId::DevTicketSummary,
            "Please provide a summary of your issue.",
            fields::SUMMARY,
            NodeId::DevTicketDescription,
        ))
        .node(ask(
            form,
            NodeId::DevTicketDescription,
            "Please describe your issue in detail.",
            fields::DESCRIPTION,
            NodeId::DevTicketAttachment,
        ))
        .node(attachment)
        .node(upload)
        .node(summary)
}
