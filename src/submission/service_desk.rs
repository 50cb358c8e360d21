use std::collections::BTreeMap;

use reqwest::Url;

use super::payload::TicketType;
use crate::error::{QaFlowError, Result};

pub const SERVICE_DESK_BASE_URL: &str = "https://access-ci.atlassian.net/servicedesk/customer";

fn portal_segment(ticket_type: TicketType) -> &'static str {
    match ticket_type {
        TicketType::LoginAccess => "/portal/2/create/30",
        TicketType::LoginProvider => "/portal/2/create/31",
        _ => "/portal/2/group/3/create/17",
    }
}

/// 构建预填表单的服务台链接
///
/// 反馈提交改走 API 后不再使用，仅保留给仍需打开网页表单的宿主。
#[deprecated(note = "feedback is submitted through the proxy; use `build_submission`")]
pub fn build_service_desk_url(
    form_data: &BTreeMap<String, String>,
    ticket_tag: &str,
) -> Result<String> {
    let ticket_type = TicketType::from_tag(ticket_tag);
    let mut url = Url::parse(&format!(
        "{SERVICE_DESK_BASE_URL}{}",
        portal_segment(ticket_type)
    ))
    .map_err(|e| QaFlowError::Config(e.to_string()))?;

    let mut pairs = form_data.iter().filter(|(_, v)| !v.is_empty()).peekable();
    // 没有字段时不能留下空的 `?`
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url.to_string())
}
