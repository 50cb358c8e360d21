use serde::Serialize;

use super::theme::ThemeColors;

pub const HEADER_TITLE: &str = "ACCESS Q&A Bot";
pub const AVATAR_URL: &str =
    "https://support.access-ci.org/themes/contrib/asp-theme/images/icons/ACCESS-arrrow.svg";
pub const ABOUT_TOOL_URL: &str = "https://support.access-ci.org/tools/access-qa-tool";
pub const FEEDBACK_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSeWnE1r738GU1u_ri3TRpw9dItn6JNPi7-FH7QFB9bAHSVN0w/viewform";
pub const ABOUT_TOOL_TEXT: &str = "about this tool";
pub const FEEDBACK_TEXT: &str = "give us feedback";
pub const DISABLED_PLACEHOLDER: &str = "Please log in to ask questions.";
pub const TOOLTIP_TEXT: &str = "Ask me about ACCESS! 😊";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Header {
    pub title: String,
    pub avatar: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub enabled_placeholder_text: String,
    pub disabled_placeholder_text: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotBubble {
    pub sim_stream: bool,
    pub dangerously_set_inner_html: bool,
}

/// 开关类设置
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub disabled: bool,
}

impl Toggle {
    pub const OFF: Toggle = Toggle { disabled: true };
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    pub text: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Footer {
    pub links: Vec<FooterLink>,
}

impl Footer {
    /// "Find out more about this tool or give us feedback."
    pub fn text(&self) -> String {
        let links: Vec<&str> = self.links.iter().map(|link| link.text.as_str()).collect();
        format!("Find out more {}.", links.join(" or "))
    }
}

/// 交给宿主组件的完整设置
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    pub general: ThemeColors,
    pub header: Header,
    pub chat_input: ChatInput,
    pub chat_history: Toggle,
    pub bot_bubble: BotBubble,
    pub chat_button: ChatButton,
    pub tooltip: Tooltip,
    pub audio: Toggle,
    pub emoji: Toggle,
    pub file_attachment: Toggle,
    pub notification: Toggle,
    pub footer: Footer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatButton {
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub text: String,
}

impl WidgetSettings {
    /// 组合主题、提示语与输入禁用状态
    pub fn new(theme: ThemeColors, prompt: &str, disabled: bool) -> Self {
        Self {
            general: theme,
            header: Header {
                title: HEADER_TITLE.to_string(),
                avatar: AVATAR_URL.to_string(),
            },
            chat_input: ChatInput {
                enabled_placeholder_text: prompt.to_string(),
                disabled_placeholder_text: DISABLED_PLACEHOLDER.to_string(),
                disabled,
            },
            chat_history: Toggle::OFF,
            bot_bubble: BotBubble {
                sim_stream: true,
                dangerously_set_inner_html: true,
            },
            chat_button: ChatButton {
                icon: AVATAR_URL.to_string(),
            },
            tooltip: Tooltip {
                text: TOOLTIP_TEXT.to_string(),
            },
            audio: Toggle::OFF,
            emoji: Toggle::OFF,
            file_attachment: Toggle::OFF,
            notification: Toggle::OFF,
            footer: Footer {
                links: vec![
                    FooterLink {
                        text: ABOUT_TOOL_TEXT.to_string(),
                        href: ABOUT_TOOL_URL.to_string(),
                    },
                    FooterLink {
                        text: FEEDBACK_TEXT.to_string(),
                        href: FEEDBACK_URL.to_string(),
                    },
                ],
            },
        }
    }
}
