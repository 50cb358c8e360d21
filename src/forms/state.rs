use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::upload::UploadedFile;

/// 表单字段值
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Files(Vec<UploadedFile>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[UploadedFile]> {
        match self {
            FieldValue::Files(files) => Some(files),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<UploadedFile>> for FieldValue {
    fn from(value: Vec<UploadedFile>) -> Self {
        FieldValue::Files(value)
    }
}

/// 表单状态：按字段名累积的部分回答
///
/// `merge` 只覆盖传入的字段，其余字段保持不变。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    fields: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// 右偏合并：`partial` 中的字段覆盖当前值
    pub fn merge(&self, partial: FormState) -> FormState {
        let mut fields = self.fields.clone();
        fields.extend(partial.fields);
        FormState { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// 文本字段，缺失或为空时返回 `fallback`
    pub fn text_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        match self.text(key) {
            Some(text) if !text.is_empty() => text,
            _ => fallback,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_flag).unwrap_or(false)
    }

    pub fn files(&self, key: &str) -> &[UploadedFile] {
        self.get(key).and_then(FieldValue::as_files).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormState
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// 共享表单存储
///
/// 流程节点通过克隆的句柄读写同一份状态。
#[derive(Clone, Default)]
pub struct FormStore {
    inner: Arc<RwLock<FormState>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> FormState {
        self.inner.read().clone()
    }

    pub fn merge(&self, partial: FormState) -> FormState {
        let mut guard = self.inner.write();
        let next = guard.merge(partial);
        *guard = next.clone();
        next
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> FormState {
        self.merge(FormState::new().with(key, value))
    }

    pub fn reset(&self) {
        *self.inner.write() = FormState::default();
    }
}
