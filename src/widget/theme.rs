use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const PRIMARY_COLOR_VAR: &str = "--primary-color";
pub const SECONDARY_COLOR_VAR: &str = "--secondary-color";
pub const FONT_FAMILY_VAR: &str = "--font-family";

pub const DEFAULT_PRIMARY_COLOR: &str = "#1a5b6e";
pub const DEFAULT_SECONDARY_COLOR: &str = "#107180";
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

/// 宿主提供的样式变量来源
pub trait StyleSource {
    /// 读取一个样式变量，未定义时返回 `None`
    fn property(&self, name: &str) -> Option<String>;
}

/// 内存中的样式变量表
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(HashMap<String, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl StyleSource for StyleMap {
    fn property(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// 解析后的主题
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub embedded: bool,
}

impl Default for ThemeColors {
    fn default() -> Self {
        resolve_theme(None, None, false)
    }
}

/// 先查容器，再查父级，都没有时使用固定默认值
///
/// 空白值视为未定义。
pub fn resolve_theme(
    container: Option<&dyn StyleSource>,
    parent: Option<&dyn StyleSource>,
    embedded: bool,
) -> ThemeColors {
    let lookup = |name: &str, fallback: &str| -> String {
        [container, parent]
            .into_iter()
            .flatten()
            .filter_map(|source| source.property(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };

    ThemeColors {
        primary_color: lookup(PRIMARY_COLOR_VAR, DEFAULT_PRIMARY_COLOR),
        secondary_color: lookup(SECONDARY_COLOR_VAR, DEFAULT_SECONDARY_COLOR),
        font_family: lookup(FONT_FAMILY_VAR, DEFAULT_FONT_FAMILY),
        embedded,
    }
}
