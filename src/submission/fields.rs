use crate::forms::fields;

/// 流程字段与工单系统字段的映射
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDefinition {
    pub flow_key: &'static str,
    pub service_desk_key: &'static str,
    pub label: &'static str,
    pub required: bool,
}

pub const EMAIL: FieldDefinition = FieldDefinition {
    flow_key: fields::EMAIL,
    service_desk_key: "customfield_10124",
    label: "Email",
    required: true,
};

pub const NAME: FieldDefinition = FieldDefinition {
    flow_key: fields::NAME,
    service_desk_key: "customfield_10108",
    label: "Name",
    required: true,
};

pub const ACCESS_ID: FieldDefinition = FieldDefinition {
    flow_key: fields::ACCESS_ID,
    service_desk_key: "customfield_10091",
    label: "ACCESS ID",
    required: true,
};

pub const SUMMARY: FieldDefinition = FieldDefinition {
    flow_key: fields::SUMMARY,
    service_desk_key: "summary",
    label: "Summary",
    required: true,
};

pub const DESCRIPTION: FieldDefinition = FieldDefinition {
    flow_key: fields::DESCRIPTION,
    service_desk_key: "description",
    label: "Description",
    required: true,
};

/// 反馈表单里的联系邮箱使用单独的字段
pub const FEEDBACK_EMAIL: FieldDefinition = FieldDefinition {
    flow_key: fields::CONTACT,
    service_desk_key: "customfield_10103",
    label: "Email",
    required: false,
};

pub const DEV_TICKET: [FieldDefinition; 4] = [SUMMARY, DESCRIPTION, EMAIL, ACCESS_ID];
