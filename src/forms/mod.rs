// 表单状态模块

mod state;
mod upload;

pub use state::{FieldValue, FormState, FormStore};
pub use upload::{
    guess_content_type, FileSource, FileUploadSurface, UploadCallback, UploadMode, UploadedFile,
};

/// 流程中使用的表单字段名
pub mod fields {
    pub const NAME: &str = "name";
    pub const COLOR: &str = "color";
    pub const TICKET_TYPE: &str = "ticketType";
    pub const EMAIL: &str = "email";
    pub const ACCESS_ID: &str = "accessId";
    pub const SUMMARY: &str = "summary";
    pub const DESCRIPTION: &str = "description";
    pub const WANTS_ATTACHMENT: &str = "wantsAttachment";
    pub const UPLOAD_CONFIRMED: &str = "uploadConfirmed";
    pub const UPLOADED_FILES: &str = "uploadedFiles";
    pub const FEEDBACK: &str = "feedback";
    pub const WANTS_CONTACT: &str = "wantsContact";
    pub const CONTACT: &str = "contact";
    pub const SUBMISSION_FAILED: &str = "submissionFailed";
}
