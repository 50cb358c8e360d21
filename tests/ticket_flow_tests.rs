mod common;

use std::sync::Arc;

use serde_json::json;

use common::{Harness, RecordingSubmitter, ScriptedBackend};
use qaflow::flow::subflows::{
    MENU_DEV_TICKET, MENU_FEEDBACK, MENU_HELP_TICKET, SUBMIT_FEEDBACK, SUBMIT_TICKET,
};
use qaflow::flow::BACK_TO_MAIN_MENU;
use qaflow::forms::fields;
use qaflow::{MenuVariant, NodeId, ProxyOutcome, QaFlowError, UploadedFile};

const DEV_ANSWERS: [&str; 6] = ["Bug Report", "a@b.com", "X123", "S", "D", "No"];

#[tokio::test]
async fn test_dev_ticket_submits_four_fields_without_attachments() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();

    let view = harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    assert_eq!(view.node, NodeId::DevTicket);
    assert!(view.input_locked);

    let view = harness.answer_all(&DEV_ANSWERS).await;
    assert_eq!(view.node, NodeId::DevTicketGrandSummary);
    let summary = view.message.unwrap();
    assert!(summary.contains("Email: a@b.com\nACCESS ID: X123\nSummary: S\nDescription: D\n\n"));
    assert!(!summary.contains("Attachments"));

    let view = harness.session.respond(SUBMIT_TICKET).await.unwrap();
    assert_eq!(view.node, NodeId::Start);

    let calls = harness.submitter.calls();
    assert_eq!(calls.len(), 1);
    let (payload, endpoint) = &calls[0];
    assert_eq!(endpoint, "dev-create-support-ticket");

    let body = serde_json::to_value(payload).unwrap();
    assert_eq!(
        body["requestFieldValues"],
        json!({
            "summary": "S",
            "description": "D",
            "customfield_10124": "a@b.com",
            "customfield_10091": "X123",
        })
    );
    assert!(body.get("attachments").is_none());
    assert_eq!(body["serviceDeskId"], 1);

    let injected = harness.sink.injected();
    assert!(injected
        .iter()
        .any(|text| text.contains("submitted successfully") && text.contains("ACC-1")));
    assert!(harness.ticket_form.current().is_empty());
}

#[tokio::test]
async fn test_unknown_ticket_kind_asks_again() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();

    let view = harness.session.respond("Something else").await.unwrap();
    assert_eq!(view.node, NodeId::DevTicket);
    assert!(harness.ticket_form.current().text(fields::TICKET_TYPE).is_none());
}

#[tokio::test]
async fn test_failed_submission_is_surfaced_and_can_be_retried() {
    let submitter = RecordingSubmitter::default().then(ProxyOutcome::Failure {
        status: Some(502),
        error: "bad gateway".into(),
    });
    let mut harness = Harness::extended(submitter);
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    harness.answer_all(&DEV_ANSWERS).await;

    let view = harness.session.respond(SUBMIT_TICKET).await.unwrap();
    assert_eq!(view.node, NodeId::DevTicketGrandSummary);
    assert!(harness
        .sink
        .injected()
        .iter()
        .any(|text| text.contains("could not be submitted")));
    assert_eq!(
        harness.ticket_form.current().text(fields::EMAIL),
        Some("a@b.com")
    );

    let view = harness.session.respond(SUBMIT_TICKET).await.unwrap();
    assert_eq!(view.node, NodeId::Start);
    assert_eq!(harness.submitter.calls().len(), 2);
}

#[tokio::test]
async fn test_attachment_is_base64_encoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    tokio::fs::write(&path, b"hello").await.unwrap();

    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    let view = harness
        .answer_all(&["Feature Request", "a@b.com", "X123", "S", "D", "Yes"])
        .await;
    assert_eq!(view.node, NodeId::DevTicketUpload);
    assert!(view.file_upload);

    let file = UploadedFile::from_disk(&path).await.unwrap();
    harness.session.upload_files(vec![file]).unwrap();
    let view = harness.session.respond("Continue").await.unwrap();
    assert!(view
        .message
        .unwrap()
        .contains("Attachments: 1 file(s) attached"));

    harness.session.respond(SUBMIT_TICKET).await.unwrap();
    let calls = harness.submitter.calls();
    let body = serde_json::to_value(&calls[0].0).unwrap();
    assert_eq!(
        body["attachments"],
        json!([{
            "fileName": "shot.png",
            "contentType": "image/png",
            "size": 5,
            "fileData": "aGVsbG8=",
        }])
    );
}

#[tokio::test]
async fn test_unreadable_file_fails_before_any_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.txt");
    tokio::fs::write(&path, b"soon deleted").await.unwrap();

    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    harness
        .answer_all(&["Bug Report", "a@b.com", "X123", "S", "D", "Yes"])
        .await;
    let file = UploadedFile::from_disk(&path).await.unwrap();
    harness.session.upload_files(vec![file]).unwrap();
    harness.session.respond("Continue").await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    let view = harness.session.respond(SUBMIT_TICKET).await.unwrap();
    assert_eq!(view.node, NodeId::DevTicketGrandSummary);
    assert!(harness.submitter.calls().is_empty());
    assert!(harness
        .sink
        .injected()
        .iter()
        .any(|text| text.contains("failed to read file `gone.txt`")));
}

#[tokio::test]
async fn test_removing_upload_updates_form() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    harness
        .answer_all(&["Bug Report", "a@b.com", "X123", "S", "D", "Yes"])
        .await;

    harness
        .session
        .upload_files(vec![
            UploadedFile::from_bytes("a.png", "image/png", vec![0u8; 10]),
            UploadedFile::from_bytes("b.png", "image/png", vec![0u8; 20]),
        ])
        .unwrap();
    harness.session.remove_file(0).unwrap();

    let names: Vec<_> = harness
        .session
        .uploaded_files()
        .iter()
        .map(|file| (file.name.clone(), file.size))
        .collect();
    assert_eq!(names, vec![("b.png".to_string(), 20)]);

    let form = harness.ticket_form.current();
    let stored = form.files(fields::UPLOADED_FILES);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "b.png");

    assert!(matches!(
        harness.session.remove_file(5),
        Err(QaFlowError::FileIndex(5))
    ));
}

#[tokio::test]
async fn test_back_to_menu_discards_answers() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    harness.answer_all(&DEV_ANSWERS).await;
    assert!(!harness.ticket_form.current().is_empty());

    let view = harness.session.respond(BACK_TO_MAIN_MENU).await.unwrap();
    assert_eq!(view.node, NodeId::Start);
    assert!(harness.submitter.calls().is_empty());
    assert!(harness.ticket_form.current().is_empty());

    // 新一轮的汇总里不会出现上一轮的回答
    harness.session.respond(MENU_DEV_TICKET).await.unwrap();
    let view = harness
        .answer_all(&["Bug Report", "new@b.com", "Y9", "S2", "D2", "No"])
        .await;
    let summary = view.message.unwrap();
    assert!(summary.contains("Email: new@b.com"));
    assert!(!summary.contains("a@b.com"));
}

#[tokio::test]
async fn test_restart_clears_forms() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_FEEDBACK).await.unwrap();
    harness.session.respond("The docs are great").await.unwrap();
    assert!(!harness.feedback_form.current().is_empty());

    let view = harness.session.restart().await.unwrap();
    assert_eq!(view.node, NodeId::Start);
    assert!(harness.feedback_form.current().is_empty());
    assert!(harness.ticket_form.current().is_empty());
}

#[tokio::test]
async fn test_simple_ticket_echoes_answers() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    let view = harness.session.respond(MENU_HELP_TICKET).await.unwrap();
    assert_eq!(view.node, NodeId::AskName);

    let view = harness.answer_all(&["Grace", "blue"]).await;
    assert_eq!(view.node, NodeId::SubmitTicket);
    assert_eq!(
        view.message.as_deref(),
        Some("Thank you, I have submitted your help ticket with the following information:\nName: Grace\nFavorite Color: blue")
    );
    assert!(harness.submitter.calls().is_empty());

    let view = harness.session.respond(BACK_TO_MAIN_MENU).await.unwrap();
    assert_eq!(view.node, NodeId::Start);
}

#[tokio::test]
async fn test_feedback_with_contact_goes_to_support_endpoint() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();

    let view = harness.session.respond(MENU_FEEDBACK).await.unwrap();
    assert_eq!(view.node, NodeId::FeedbackPleaseTellUsMore);

    let view = harness
        .answer_all(&["Search is slow", "No", "Yes", "Ada Lovelace ada@example.org"])
        .await;
    assert_eq!(view.node, NodeId::FeedbackSummary);
    assert_eq!(
        view.message.as_deref(),
        Some("Thank you for sharing your feedback!")
    );

    let view = harness.session.respond(SUBMIT_FEEDBACK).await.unwrap();
    assert_eq!(view.node, NodeId::Start);

    let calls = harness.submitter.calls();
    assert_eq!(calls.len(), 1);
    let (payload, endpoint) = &calls[0];
    assert_eq!(endpoint, "create-support-ticket");
    assert_eq!(payload.service_desk_id, 2);
    assert_eq!(payload.request_type_id, 17);
    assert_eq!(
        serde_json::to_value(&payload.request_field_values).unwrap(),
        json!({
            "summary": "Feedback from ACCESS Help",
            "description": "Search is slow",
            "customfield_10103": "ada@example.org",
            "customfield_10108": "Ada Lovelace",
        })
    );
    assert!(payload.attachments.is_none());
}

#[tokio::test]
async fn test_feedback_without_contact_omits_contact_fields() {
    let mut harness = Harness::extended(RecordingSubmitter::default());
    harness.session.start().await.unwrap();
    harness.session.respond(MENU_FEEDBACK).await.unwrap();
    harness
        .answer_all(&["Nice bot", "No", "No", SUBMIT_FEEDBACK])
        .await;

    let calls = harness.submitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.request_field_values.len(), 2);
}

#[tokio::test]
async fn test_sessions_from_one_config_keep_separate_forms() {
    let submitter = RecordingSubmitter::default();
    let config = Harness::config(
        Arc::new(ScriptedBackend),
        submitter.clone(),
        MenuVariant::Extended,
    );
    let mut alice = Harness::for_config(&config, submitter.clone());
    let mut bob = Harness::for_config(&config, submitter);

    alice.session.start().await.unwrap();
    alice.session.respond(MENU_DEV_TICKET).await.unwrap();
    alice
        .answer_all(&["Bug Report", "a@b.com", "X123", "S", "D"])
        .await;

    bob.session.start().await.unwrap();
    bob.session.respond(MENU_DEV_TICKET).await.unwrap();
    bob.answer_all(&["Bug Report", "bob@x.org", "B1", "S2", "D2"])
        .await;

    let view = alice.session.respond("No").await.unwrap();
    let summary = view.message.unwrap();
    assert!(summary.contains("Email: a@b.com\nACCESS ID: X123\nSummary: S\nDescription: D"));
    assert!(!summary.contains("bob@x.org"));

    // 一个会话回到菜单不会清掉另一个会话正在填写的表单
    alice.session.respond(BACK_TO_MAIN_MENU).await.unwrap();
    assert!(alice.ticket_form.current().is_empty());
    assert_eq!(bob.ticket_form.current().text(fields::EMAIL), Some("bob@x.org"));
    assert!(config.ticket_form.current().is_empty());

    let view = bob.session.respond("No").await.unwrap();
    assert!(view.message.unwrap().contains("Email: bob@x.org"));
}
