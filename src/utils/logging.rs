//! 日志工具模块
//!
//! 初始化 tracing 订阅器；RUST_LOG 优先，否则按 verbose 开关
//! 选择默认级别。

use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// # 参数
/// - `verbose`: 是否启用详细日志（debug 级别）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
