use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    is_yes, submit_form, upload_into, SubmitMessages, BACK_TO_MAIN_MENU, CONTINUE, NO, YES,
};
use crate::flow::assembler::Subgraph;
use crate::flow::context::FlowConfig;
use crate::flow::ids::NodeId;
use crate::flow::nodes::FlowNode;
use crate::forms::{fields, FormState};
use crate::submission::{fields as desk, split_contact, TicketType, FEEDBACK_ENDPOINT};

pub const SUBMIT_FEEDBACK: &str = "Submit Feedback";
pub const FEEDBACK_SUMMARY: &str = "Feedback from ACCESS Help";

const FEEDBACK_SUBMIT: SubmitMessages = SubmitMessages {
    kind: "feedback",
    tag: TicketType::Support.tag(),
    endpoint: FEEDBACK_ENDPOINT,
};

/// 反馈的服务台字段，联系方式为空时不发送
pub(crate) fn feedback_form_data(form: &FormState) -> BTreeMap<String, String> {
    let mut data = BTreeMap::from([
        (desk::SUMMARY.service_desk_key.to_string(), FEEDBACK_SUMMARY.to_string()),
        (
            desk::DESCRIPTION.service_desk_key.to_string(),
            form.text_or(fields::FEEDBACK, "").to_string(),
        ),
    ]);

    if form.flag(fields::WANTS_CONTACT) {
        let contact = split_contact(form.text_or(fields::CONTACT, ""));
        if let Some(email) = contact.email {
            data.insert(desk::FEEDBACK_EMAIL.service_desk_key.to_string(), email);
        }
        if !contact.name.is_empty() {
            data.insert(desk::NAME.service_desk_key.to_string(), contact.name);
        }
    }
    data
}

pub fn feedback(config: &FlowConfig) -> Subgraph {
    let form = &config.feedback_form;

    let text_store = form.clone();
    let tell_us_more = FlowNode::new(
        NodeId::FeedbackPleaseTellUsMore,
        "Please provide your detailed feedback.",
    )
    .on_input(move |turn| {
        text_store.set(fields::FEEDBACK, turn.input());
    })
    .then(NodeId::FeedbackUpload);

    let upload_store = form.clone();
    let upload = FlowNode::new(
        NodeId::FeedbackUpload,
        "Would you like to upload a screenshot or file to help us better understand your feedback?",
    )
    .options([YES, NO])
    .locked()
    .on_input(move |turn| {
        upload_store.set(fields::WANTS_ATTACHMENT, is_yes(turn.input()));
    })
    .branch([NodeId::FeedbackUploadYes, NodeId::FeedbackContact], |turn| {
        if is_yes(turn.input()) {
            NodeId::FeedbackUploadYes
        } else {
            NodeId::FeedbackContact
        }
    });

    let confirm_store = form.clone();
    let upload_yes = FlowNode::new(
        NodeId::FeedbackUploadYes,
        "Please upload a screenshot or file to help us better understand your feedback.",
    )
    .attach(upload_into(form))
    .options([CONTINUE])
    .locked()
    .on_input(move |_| {
        confirm_store.set(fields::UPLOAD_CONFIRMED, true);
    })
    .then(NodeId::FeedbackContact);

    let contact_store = form.clone();
    let contact = FlowNode::new(
        NodeId::FeedbackContact,
        "Would you like to provide your name and email address for follow up?",
    )
    .options([YES, NO])
    .locked()
    .on_input(move |turn| {
        contact_store.set(fields::WANTS_CONTACT, is_yes(turn.input()));
    })
    .branch([NodeId::FeedbackContactYes, NodeId::FeedbackSummary], |turn| {
        if is_yes(turn.input()) {
            NodeId::FeedbackContactYes
        } else {
            NodeId::FeedbackSummary
        }
    });

    let details_store = form.clone();
    let contact_yes = FlowNode::new(
        NodeId::FeedbackContactYes,
        "Please provide your name and email address.",
    )
    .on_input(move |turn| {
        details_store.set(fields::CONTACT, turn.input());
    })
    .then(NodeId::FeedbackSummary);

    let submit_store = form.clone();
    let retry_store = form.clone();
    let submitter = Arc::clone(&config.submitter);
    let summary = FlowNode::new(NodeId::FeedbackSummary, "Thank you for sharing your feedback!")
        .options([SUBMIT_FEEDBACK, BACK_TO_MAIN_MENU])
        .locked()
        .on_input_async(move |turn| {
            let store = submit_store.clone();
            let submitter = Arc::clone(&submitter);
            async move {
                if turn.input() != SUBMIT_FEEDBACK {
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
                    feedback_form_data(&current),
                    &files,
                    &FEEDBACK_SUBMIT,
                )
                .await;
            }
        })
        .branch([NodeId::FeedbackSummary, NodeId::Start], move |turn| {
            if turn.input() == SUBMIT_FEEDBACK
                && retry_store.current().flag(fields::SUBMISSION_FAILED)
            {
                NodeId::FeedbackSummary
            } else {
                NodeId::Start
            }
        });

    Subgraph::new("feedback")
        .node(
            FlowNode::new(NodeId::Feedback, "We appreciate your feedback about ACCESS.")
                .auto_advance()
                .then(NodeId::FeedbackPleaseTellUsMore),
        )
        .node(tell_us_more)
        .node(upload)
        .node(upload_yes)
        .node(contact)
        .node(contact_yes)
        .node(summary)
}
