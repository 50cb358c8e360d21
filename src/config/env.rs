use crate::error::{QaFlowError, Result};
use std::env;

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 获取 API Key
    ///
    /// 优先级：
    /// 1. 直接传入的 api_key（不以 ${} 包裹）
    /// 2. `${VAR_NAME}` 指向的环境变量
    /// 3. 为空时读取 `default_env_var`
    pub fn get_api_key(api_key: &str, default_env_var: &str) -> Result<String> {
        if let Some(name) = api_key
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Self::get_env(name)
        } else if api_key.is_empty() {
            Self::get_env(default_env_var)
        } else {
            Ok(api_key.to_string())
        }
    }

    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            QaFlowError::Config(format!(
                "environment variable '{}' is not set",
                key
            ))
        })
    }

    /// 获取可选的环境变量，空值视为未设置
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.trim().is_empty())
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var("QAFLOW_DEBUG").is_ok()
    }
}
