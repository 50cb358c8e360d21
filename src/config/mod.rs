// 配置模块：环境变量与机器人配置

mod bot;
mod env;

pub use bot::{BotConfig, DEFAULT_PROMPT, DEFAULT_QUERY_URL, DEFAULT_WELCOME};
pub use env::EnvConfig;
