// 工单提交模块：提交数据构建与中转发送

pub mod contact;
pub mod fields;
mod payload;
mod proxy;
pub mod service_desk;

pub use contact::{split_contact, ContactInfo};
pub use fields::FieldDefinition;
pub use payload::{build_submission, Attachment, SubmissionPayload, TicketType};
pub use proxy::{
    DynTicketSubmitter, LocalSubmitter, ProxyOutcome, ProxySubmitter, TicketSubmitter,
};

/// 开发工单的中转端点标签
pub const DEV_TICKET_ENDPOINT: &str = "dev-create-support-ticket";
/// 反馈的中转端点标签
pub const FEEDBACK_ENDPOINT: &str = "create-support-ticket";
