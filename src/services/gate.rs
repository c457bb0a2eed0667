//! 订阅门控 - 业务能力层
//!
//! 任何列表/提交调用都可能返回"需要加入频道/群组"的策略信号。
//! 收到信号后正常内容被挂起，改为展示门控视图；只有用户手动
//! 触发的复查成功后才恢复。没有重试上限，也没有退避。

use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::api::{ApiReply, GateSignal};
use crate::models::test::Category;

/// 门控状态
#[derive(Debug, Clone, Default)]
pub struct GateState {
    /// 是否处于门控中
    pub required: bool,
    /// 服务端下发的提示文案
    pub message: String,
    /// 频道加入链接
    pub channel_url: String,
    /// 群组加入链接
    pub group_url: String,
}

/// 订阅门控控制器
#[derive(Debug, Default)]
pub struct GateController {
    state: GateState,
}

impl GateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前门控状态
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// 是否处于门控中
    pub fn is_required(&self) -> bool {
        self.state.required
    }

    /// 进入门控（收到策略信号时调用）
    pub fn engage(&mut self, signal: &GateSignal) {
        warn!("🔒 需要加入频道/群组: {}", signal.message);
        self.state = GateState {
            required: true,
            message: signal.message.clone(),
            channel_url: signal.channel_url.clone(),
            group_url: signal.group_url.clone(),
        };
    }

    /// 解除门控
    pub fn clear(&mut self) {
        self.state = GateState::default();
    }

    /// 复查：重新拉取分类列表
    ///
    /// # 返回
    /// 成功时解除门控并返回分类列表；仍被拦截或被拒绝时返回 None，
    /// 门控保持原样（由用户继续手动重试）。
    pub async fn recheck(&mut self, client: &ApiClient) -> AppResult<Option<Vec<Category>>> {
        match client.list_categories().await? {
            ApiReply::Ok(body) => {
                info!("✓ 门控解除，恢复正常流程");
                self.clear();
                Ok(Some(body.categories))
            }
            ApiReply::Gate(signal) => {
                self.engage(&signal);
                Ok(None)
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ 门控复查被拒绝: {}", message);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> GateSignal {
        GateSignal {
            message: "Join required".to_string(),
            channel_url: "https://t.me/c".to_string(),
            group_url: "https://t.me/g".to_string(),
        }
    }

    #[test]
    fn test_not_required_at_boot() {
        let gate = GateController::new();
        assert!(!gate.is_required());
        assert!(gate.state().message.is_empty());
    }

    #[test]
    fn test_engage_populates_state() {
        let mut gate = GateController::new();
        gate.engage(&signal());
        assert!(gate.is_required());
        assert_eq!(gate.state().message, "Join required");
        assert_eq!(gate.state().channel_url, "https://t.me/c");
        assert_eq!(gate.state().group_url, "https://t.me/g");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut gate = GateController::new();
        gate.engage(&signal());
        gate.clear();
        assert!(!gate.is_required());
        assert!(gate.state().channel_url.is_empty());
    }
}
