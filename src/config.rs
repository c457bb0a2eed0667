//! 程序配置
//!
//! 默认值 → 环境变量覆盖；也可以从 TOML 文件加载（字段全部可选，
//! 缺失的按默认值补齐）。

use std::path::Path;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// Mini App 后端基础地址
    pub api_base_url: String,
    /// 鉴权头内容（宿主下发的 initData，原样附到每个请求）
    pub init_data: String,
    /// UI 模式: "user" 或 "admin"
    pub mode: String,
    /// 固定测试 ID（跳过分类浏览，直接打开该测试）
    pub fixed_test_id: Option<i64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            init_data: String::new(),
            mode: "user".to_string(),
            fixed_test_id: None,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件形态（所有字段可选）
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    init_data: Option<String>,
    mode: Option<String>,
    fixed_test_id: Option<i64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 从环境变量加载配置（缺失的用默认值）
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("MINIAPP_API_BASE_URL").unwrap_or(default.api_base_url),
            init_data: std::env::var("MINIAPP_INIT_DATA").unwrap_or(default.init_data),
            mode: std::env::var("MINIAPP_MODE").unwrap_or(default.mode),
            fixed_test_id: std::env::var("MINIAPP_TEST_ID").ok().and_then(|v| v.parse().ok()),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置
    ///
    /// # 参数
    /// - `path`: 配置文件路径
    ///
    /// # 返回
    /// 返回加载后的配置，缺失字段按默认值补齐
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source: e,
        })?;

        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            init_data: file.init_data.unwrap_or(default.init_data),
            mode: file.mode.unwrap_or(default.mode),
            fixed_test_id: file.fixed_test_id,
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }
}
