use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 日志配置
pub struct LoggingConfig;

impl LoggingConfig {
    /// 初始化日志系统
    ///
    /// 支持通过环境变量配置：
    /// - RUST_LOG: 设置日志级别（error, warn, info, debug, trace）
    /// - QAFLOW_DEBUG: 启用详细调试输出
    ///
    /// 日志写到 stderr，不会和对话输出混在一起。
    ///
    /// 使用示例：
    /// ```no_run
    /// use qaflow::utils::LoggingConfig;
    ///
    /// fn main() {
    ///     LoggingConfig::init();
    /// }
    /// ```
    pub fn init() {
        let is_debug = Self::is_debug();
        Self::install(Self::default_filter(is_debug), is_debug);

        if is_debug {
            tracing::debug!("调试模式已启用");
        }
    }

    /// 初始化日志系统（带自定义过滤器）
    pub fn init_with_filter(filter: &str) {
        Self::install(EnvFilter::new(filter), Self::is_debug());
    }

    fn default_filter(is_debug: bool) -> EnvFilter {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) if is_debug => EnvFilter::new("qaflow=debug,warn"),
            Err(_) => EnvFilter::new("qaflow=info,warn"),
        }
    }

    fn install(filter: EnvFilter, is_debug: bool) {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(is_debug)
            .with_file(is_debug)
            .with_line_number(is_debug)
            .with_thread_ids(is_debug);

        // 重复初始化时保留已有的订阅者
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();
    }

    /// 检查是否启用调试模式
    pub fn is_debug() -> bool {
        env::var("QAFLOW_DEBUG").is_ok()
    }
}

/// 便捷宏：记录带上下文的错误
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {
        tracing::error!(error = %$err, "operation failed")
    };
    ($err:expr, $($key:tt = $value:expr),+) => {
        tracing::error!(error = %$err, $($key = $value),+, "operation failed")
    };
}

/// 便捷宏：记录带上下文的警告
#[macro_export]
macro_rules! log_warn {
    ($msg:expr) => {
        tracing::warn!($msg)
    };
    ($msg:expr, $($key:tt = $value:expr),+) => {
        tracing::warn!($($key = $value),+, $msg)
    };
}
