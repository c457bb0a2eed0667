//! 应用程序错误类型
//!
//! 按关注点分组：API 调用、配置、业务逻辑。"需要加入频道/群组"的
//! 策略信号和服务端拒绝不走这里——它们是
//! [`crate::models::api::ApiReply`] 的正常变体，不是故障。
//! 任何错误都不会破坏会话：失败的远程调用从不修改本地答案数据。

use thiserror::Error;

/// 应用程序错误
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
}

/// API 调用错误（传输层/解析层）
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 响应 JSON 解析失败
    #[error("响应解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 尚未选择测试就触发了提交
    #[error("尚未选择测试")]
    NoTestSelected,
    /// Rasch 测试 baseline 未完成，普通用户不能开始
    #[error("测试 {test_id} 的 baseline 尚未完成，暂不可用")]
    TestNotReady { test_id: i64 },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
