use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QaFlowError, Result};
use crate::forms::UploadedFile;

/// 工单类型标签（封闭枚举）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketType {
    Support,
    LoginAccess,
    LoginProvider,
    Dev,
}

impl TicketType {
    /// 未识别的标签回退到 `support`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "support" => TicketType::Support,
            "loginAccess" => TicketType::LoginAccess,
            "loginProvider" => TicketType::LoginProvider,
            "dev" => TicketType::Dev,
            other => {
                debug!(tag = other, "unknown ticket type tag, using support");
                TicketType::Support
            }
        }
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            TicketType::Support => "support",
            TicketType::LoginAccess => "loginAccess",
            TicketType::LoginProvider => "loginProvider",
            TicketType::Dev => "dev",
        }
    }

    pub const fn service_desk_id(&self) -> u32 {
        match self {
            TicketType::Dev => 1,
            _ => 2,
        }
    }

    pub const fn request_type_id(&self) -> u32 {
        match self {
            TicketType::Support => 17,
            TicketType::LoginAccess => 30,
            TicketType::LoginProvider => 31,
            TicketType::Dev => 10,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 附件（内容为 base64）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub file_data: String,
}

/// 发往工单系统的提交数据
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub service_desk_id: u32,
    pub request_type_id: u32,
    pub request_field_values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// 由表单数据构建提交数据
///
/// 任一文件读取失败都会使整个构建失败。
pub async fn build_submission(
    form_data: BTreeMap<String, String>,
    ticket_tag: &str,
    uploaded_files: &[UploadedFile],
) -> Result<SubmissionPayload> {
    let ticket_type = TicketType::from_tag(ticket_tag);

    let attachments = if uploaded_files.is_empty() {
        None
    } else {
        let mut encoded = Vec::with_capacity(uploaded_files.len());
        for file in uploaded_files {
            encoded.push(encode_attachment(file).await?);
        }
        Some(encoded)
    };

    Ok(SubmissionPayload {
        service_desk_id: ticket_type.service_desk_id(),
        request_type_id: ticket_type.request_type_id(),
        request_field_values: form_data,
        attachments,
    })
}

async fn encode_attachment(file: &UploadedFile) -> Result<Attachment> {
    let bytes = file.read().await.map_err(|source| QaFlowError::FileRead {
        name: file.name.clone(),
        source,
    })?;
    Ok(Attachment {
        file_name: file.name.clone(),
        content_type: file.content_type.clone(),
        size: file.size,
        file_data: STANDARD.encode(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("summary".to_string(), "S".to_string()),
            ("description".to_string(), "D".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_dev_tag_uses_dev_ids() {
        let payload = build_submission(form(), "dev", &[]).await.unwrap();
        assert_eq!(payload.service_desk_id, TicketType::Dev.service_desk_id());
        assert_eq!(payload.request_type_id, TicketType::Dev.request_type_id());
        assert!(payload.attachments.is_none());
    }

    #[tokio::test]
    async fn test_unknown_tag_falls_back_to_support() {
        let payload = build_submission(form(), "unknownTag", &[]).await.unwrap();
        assert_eq!(payload.service_desk_id, 2);
        assert_eq!(payload.request_type_id, 17);
    }

    #[tokio::test]
    async fn test_files_are_base64_encoded() {
        let file = UploadedFile::from_bytes("hello.txt", "text/plain", "hello");
        let payload = build_submission(form(), "support", &[file]).await.unwrap();
        let attachments = payload.attachments.unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_name, "hello.txt");
        assert_eq!(attachments[0].size, 5);
        assert_eq!(attachments[0].file_data, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_read_failure_fails_whole_build() {
        let good = UploadedFile::from_bytes("ok.txt", "text/plain", "ok");
        let missing =
            UploadedFile::from_path("gone.png", "image/png", 4, "/nonexistent/qaflow/gone.png");
        let err = build_submission(form(), "dev", &[good, missing])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to read file `gone.png`");
    }

    #[test]
    fn test_payload_serializes_camel_case_without_attachments() {
        let payload = SubmissionPayload {
            service_desk_id: 2,
            request_type_id: 30,
            request_field_values: form(),
            attachments: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["serviceDeskId"], 2);
        assert_eq!(value["requestTypeId"], 30);
        assert_eq!(value["requestFieldValues"]["summary"], "S");
        assert!(value.get("attachments").is_none());
    }
}
