use serde_json::Value;

/// 传输失败标记
pub const TRANSPORT_MARKER: &str = "Failed to fetch";
/// HTTP 失败标记
pub const HTTP_MARKER: &str = "HTTP error";

pub const CONNECTIVITY_MESSAGE: &str = "I'm having trouble connecting to the server.";
pub const REPHRASE_MESSAGE: &str =
    "I received an unexpected response. Please try rephrasing your question.";
pub const UNREACHABLE_MESSAGE: &str = "I can't reach the server right now.";
pub const SERVER_ERROR_MESSAGE: &str = "The server returned an error.";
pub const UNEXPECTED_MESSAGE: &str = "I encountered an unexpected error.";

/// 待分类的失败或异常响应
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorInput {
    /// 带 `error` 字段的结果对象
    Flagged { error: bool },
    Text(String),
    /// 非字符串的其他值
    Absent,
}

impl From<&Value> for ErrorInput {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(map) => ErrorInput::Flagged {
                error: map.get("error").map(is_truthy).unwrap_or(false),
            },
            Value::String(text) => ErrorInput::Text(text.clone()),
            _ => ErrorInput::Absent,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 把失败映射成面向用户的固定提示
pub fn classify(input: &ErrorInput) -> &'static str {
    match input {
        ErrorInput::Flagged { error: true } => CONNECTIVITY_MESSAGE,
        ErrorInput::Flagged { error: false } | ErrorInput::Absent => REPHRASE_MESSAGE,
        ErrorInput::Text(text) if text.is_empty() => REPHRASE_MESSAGE,
        ErrorInput::Text(text) if text.contains(TRANSPORT_MARKER) => UNREACHABLE_MESSAGE,
        ErrorInput::Text(text) if text.contains(HTTP_MARKER) => SERVER_ERROR_MESSAGE,
        ErrorInput::Text(_) => UNEXPECTED_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flagged_result() {
        assert_eq!(
            classify(&ErrorInput::from(&json!({"error": true}))),
            CONNECTIVITY_MESSAGE
        );
        assert_eq!(
            classify(&ErrorInput::from(&json!({"error": "timeout"}))),
            CONNECTIVITY_MESSAGE
        );
    }

    #[test]
    fn test_non_string_or_empty() {
        assert_eq!(classify(&ErrorInput::Absent), REPHRASE_MESSAGE);
        assert_eq!(classify(&ErrorInput::from(&json!(42))), REPHRASE_MESSAGE);
        assert_eq!(classify(&ErrorInput::from(&json!({"error": 0}))), REPHRASE_MESSAGE);
        assert_eq!(classify(&ErrorInput::Text(String::new())), REPHRASE_MESSAGE);
    }

    #[test]
    fn test_transport_marker() {
        let input = ErrorInput::Text("TypeError: Failed to fetch".into());
        assert_eq!(classify(&input), UNREACHABLE_MESSAGE);
    }

    #[test]
    fn test_http_marker() {
        let input = ErrorInput::Text("HTTP error! status: 502".into());
        assert_eq!(classify(&input), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_other_text() {
        let input = ErrorInput::Text("something odd".into());
        assert_eq!(classify(&input), UNEXPECTED_MESSAGE);
    }
}
