// 宿主组件相关：主题解析与组件设置

mod settings;
mod theme;

pub use settings::{
    BotBubble, ChatButton, ChatInput, Footer, FooterLink, Header, Toggle, Tooltip, WidgetSettings,
    ABOUT_TOOL_URL, AVATAR_URL, DISABLED_PLACEHOLDER, FEEDBACK_URL, HEADER_TITLE, TOOLTIP_TEXT,
};
pub use theme::{
    resolve_theme, StyleMap, StyleSource, ThemeColors, DEFAULT_FONT_FAMILY,
    DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR, FONT_FAMILY_VAR, PRIMARY_COLOR_VAR,
    SECONDARY_COLOR_VAR,
};
