//! Mini App 测试答题引擎
//!
//! 嵌入聊天宿主的测验小程序客户端引擎：答案收集状态机、
//! Rasch baseline 标定、订阅门控、提交协调。
//!
//! # 架构
//!
//! 分层架构，自底向上：
//! - **模型层** ([`models`]): 答案、测试、线上协议的纯数据类型
//! - **客户端层** ([`clients`]): HTTP 传输与响应分类
//! - **能力层** ([`services`]): 答案存储、导航、角色、门控
//! - **流程层** ([`workflow`]): 会话、标定、提交协调
//! - **编排层** ([`app`]): 启动序列与状态路由

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use app::App;
pub use clients::ApiClient;
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, BusinessError, ConfigError};
pub use models::answer::{normalize, renormalize, Answer, RawAnswer, CHOICE_LETTERS};
pub use models::api::{ApiReply, GateSignal, ScoreReport, ScoreResult};
pub use models::test::{Category, Role, Test, UiMode};
pub use services::answer_store::{AnswerStore, Progress};
pub use services::gate::{GateController, GateState};
pub use services::navigator::Navigator;
pub use services::role::RoleContext;
pub use workflow::{
    BaselineReadiness, CalibrationMode, CalibrationWorkflow, EditCommand, NavCommand,
    SessionCommand, SolveSession, SubmissionCoordinator, SubmitOutcome, BASELINE_SLOT_COUNT,
};
