// 各业务子图：主菜单、问答、工单、开发工单、反馈

mod dev_ticket;
mod feedback;
mod main_menu;
mod qa;
mod ticket;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{error, info};

pub use dev_ticket::{dev_ticket, grand_summary, DEV_TICKET_KINDS, SUBMIT_TICKET};
pub use feedback::{feedback, FEEDBACK_SUMMARY, SUBMIT_FEEDBACK};
pub use main_menu::{
    main_menu, MENU_ASK, MENU_DEV_TICKET, MENU_FEEDBACK, MENU_HELP_TICKET,
};
pub use qa::{continuous_qa, qa};
pub use ticket::{ticket, ticket_summary};

use super::nodes::{AttachedUi, UploadBinding};
use crate::forms::{fields, FormStore, UploadMode, UploadedFile};
use crate::qa::RequestToken;
use crate::runtime::Turn;
use crate::submission::{build_submission, DynTicketSubmitter, ProxyOutcome};

pub const BACK_TO_MAIN_MENU: &str = "Back to Main Menu";
pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const CONTINUE: &str = "Continue";

pub(crate) fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(YES)
}

/// 把上传面板绑定到表单的文件字段
pub(crate) fn upload_into(store: &FormStore) -> AttachedUi {
    let store = store.clone();
    AttachedUi::FileUpload(UploadBinding {
        mode: UploadMode::Replace,
        on_upload: Arc::new(move |files: Vec<UploadedFile>| {
            store.set(fields::UPLOADED_FILES, files);
        }),
    })
}

/// 节点自己发起的最近一次问答请求
///
/// 只保留更新的凭证，过期请求的结果不会覆盖它。
#[derive(Clone, Default)]
pub(crate) struct LastRequest {
    token: Arc<Mutex<Option<RequestToken>>>,
}

impl LastRequest {
    pub(crate) fn record(&self, token: RequestToken) {
        let mut guard = self.token.lock();
        let newer = guard
            .as_ref()
            .map_or(true, |held| token.generation() > held.generation());
        if newer {
            *guard = Some(token);
        }
    }

    pub(crate) fn failed(&self) -> bool {
        self.token.lock().as_ref().is_some_and(RequestToken::failed)
    }
}

/// 提交时用到的文本
pub(crate) struct SubmitMessages {
    pub(crate) kind: &'static str,
    pub(crate) tag: &'static str,
    pub(crate) endpoint: &'static str,
}

/// 构建并提交，把结果写进聊天和表单
///
/// 结果通过 `SUBMISSION_FAILED` 字段交给转换解析器，失败时可以重试。
pub(crate) async fn submit_form(
    turn: &Turn,
    submitter: &DynTicketSubmitter,
    store: &FormStore,
    form_data: BTreeMap<String, String>,
    files: &[UploadedFile],
    messages: &SubmitMessages,
) {
    let payload = match build_submission(form_data, messages.tag, files).await {
        Ok(payload) => payload,
        Err(err) => {
            crate::log_error!(err, kind = messages.kind);
            turn.inject(&format!(
                "Sorry, your {} could not be submitted: {}. Please try again.",
                messages.kind, err
            ))
            .await;
            store.set(fields::SUBMISSION_FAILED, true);
            return;
        }
    };

    match submitter.submit(&payload, messages.endpoint).await {
        ProxyOutcome::Success { data } => {
            info!(kind = messages.kind, "submission accepted");
            let text = match issue_key(&data) {
                Some(key) => format!(
                    "Your {} has been submitted successfully. Reference: {}",
                    messages.kind, key
                ),
                None => format!("Your {} has been submitted successfully.", messages.kind),
            };
            turn.inject(&text).await;
            store.set(fields::SUBMISSION_FAILED, false);
        }
        ProxyOutcome::Failure { status, error: reason } => {
            error!(kind = messages.kind, ?status, error = %reason, "submission rejected");
            turn.inject(&format!(
                "Sorry, your {} could not be submitted. Please try again.",
                messages.kind
            ))
            .await;
            store.set(fields::SUBMISSION_FAILED, true);
        }
    }
}

/// 服务台响应中的工单编号
fn issue_key(data: &Value) -> Option<&str> {
    data.pointer("/jsmResponse/issueKey")
        .or_else(|| data.get("issueKey"))
        .and_then(Value::as_str)
}
