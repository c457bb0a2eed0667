//! 服务端接口的类型化响应模式
//!
//! 每个接口都有对应的响应结构体，所有字段在边界处校验/兜底，
//! 内部组件不会接触到畸形数据。缺失的可选字段按默认值处理。

use serde::Deserialize;

use crate::models::test::{Category, Test};

/// "需要加入频道/群组"策略信号（HTTP 403 + join_required）
///
/// 这不是错误，而是要求用户先完成外部动作的策略中断。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GateSignal {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub channel_url: String,
    #[serde(default)]
    pub group_url: String,
}

/// API 调用的统一边界结果
///
/// - `Ok`: 正常载荷
/// - `Gate`: 策略信号，需交给 [`crate::services::gate::GateController`]
/// - `Rejected`: 服务端拒绝，附带可读消息，本地状态不受影响
#[derive(Debug)]
pub enum ApiReply<T> {
    Ok(T),
    Gate(GateSignal),
    Rejected(String),
}

/// `GET /api/categories` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesBody {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// `GET /api/tests` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct TestsBody {
    #[serde(default)]
    pub tests: Vec<Test>,
}

/// `GET /api/test` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct TestBody {
    pub test: Test,
}

/// `GET /api/me` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct MeBody {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// 判分结果中的深链动作
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deeplinks {
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub certificate: Option<String>,
}

/// 判分结果明细
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResult {
    pub raw_correct: u32,
    pub total: u32,
    #[serde(default)]
    pub score: f64,
    pub score_text: String,
    /// 可选的附加指标（如 SAT 分数、等级）
    #[serde(default)]
    pub extra_label: Option<String>,
    #[serde(default)]
    pub extra_value: Option<String>,
}

/// `POST /api/submit` 成功响应
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreReport {
    pub result: ScoreResult,
    #[serde(default)]
    pub deeplinks: Deeplinks,
    #[serde(default)]
    pub certificate_id: u64,
}

impl ScoreReport {
    /// "答对数 / 总数" 显示文本
    pub fn correct_text(&self) -> String {
        format!("{} / {}", self.result.raw_correct, self.result.total)
    }
}

/// baseline 状态响应（`baseline_status` 与 `baseline_submit` 共用）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaselineStatusBody {
    /// 已录入的 slot 编号集合（1..=10）
    #[serde(default)]
    pub done: Vec<u8>,
    #[serde(default)]
    pub have: u8,
    #[serde(default)]
    pub need: u8,
}

/// 简单确认响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckBody {
    #[serde(default)]
    pub ok: bool,
}
