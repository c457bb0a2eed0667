//! 提交协调 - 流程层
//!
//! 把当前答案存储序列化为线上格式并驱动 提交 → 结果
//! （或 保存 → 刷新）序列。核心约束是单飞保护：同一会话同一
//! 时刻最多一个在途提交，后续触发一律忽略直到前一个了结。
//! 失败路径从不修改本地答案数据。

use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::api::{ApiReply, ScoreReport};
use crate::models::test::Test;
use crate::services::gate::GateController;
use crate::services::role::RoleContext;
use crate::workflow::calibration::{CalibrationMode, CalibrationWorkflow, BASELINE_SLOT_COUNT};
use crate::workflow::session::SolveSession;

/// 一次提交动作的结局
#[derive(Debug)]
pub enum SubmitOutcome {
    /// 已有在途提交，本次触发被忽略
    Busy,
    /// 普通用户判分成功
    Scored(ScoreReport),
    /// 标准答案保存成功
    KeySaved,
    /// baseline 保存成功，附服务端报告的完成数
    BaselineSaved { have: u8, need: u8 },
    /// 证书已发送到宿主聊天
    CertificateSent,
    /// 触发了订阅门控（已交给 GateController）
    GateRequired,
    /// 服务端拒绝，附可读消息；本地数据原样保留
    Rejected(String),
}

/// 提交协调器
#[derive(Debug, Default)]
pub struct SubmissionCoordinator {
    in_flight: bool,
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否有在途提交
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// 提交当前会话的答案
    ///
    /// 按角色分派：管理员界面走标定流程的保存契约（标准答案或
    /// baseline），普通用户走判分提交。
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        roles: &RoleContext,
        session: &mut SolveSession,
        gate: &mut GateController,
    ) -> AppResult<SubmitOutcome> {
        if !self.begin() {
            warn!("⚠️ 已有在途提交，忽略重复触发");
            return Ok(SubmitOutcome::Busy);
        }
        let result = Self::dispatch(client, roles, session, gate).await;
        self.finish();
        result
    }

    /// 请求把证书发送到宿主聊天（同样受单飞保护）
    pub async fn send_certificate(
        &mut self,
        client: &ApiClient,
        certificate_id: u64,
    ) -> AppResult<SubmitOutcome> {
        if !self.begin() {
            warn!("⚠️ 已有在途提交，忽略证书发送");
            return Ok(SubmitOutcome::Busy);
        }
        let result = Self::do_send_certificate(client, certificate_id).await;
        self.finish();
        result
    }

    // ========== 内部分派 ==========

    fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    fn finish(&mut self) {
        self.in_flight = false;
    }

    async fn dispatch(
        client: &ApiClient,
        roles: &RoleContext,
        session: &mut SolveSession,
        gate: &mut GateController,
    ) -> AppResult<SubmitOutcome> {
        if roles.effective_admin_ui() {
            if let Some((test, workflow)) = session.calibration_parts() {
                return match workflow.mode() {
                    CalibrationMode::AnswerKey => {
                        Self::save_answer_key(client, test, workflow, gate).await
                    }
                    CalibrationMode::Baseline => {
                        Self::save_baseline(client, test, workflow, gate).await
                    }
                };
            }
        }
        Self::submit_for_scoring(client, session, gate).await
    }

    /// 普通用户：提交判分
    async fn submit_for_scoring(
        client: &ApiClient,
        session: &SolveSession,
        gate: &mut GateController,
    ) -> AppResult<SubmitOutcome> {
        let test = session.test();
        info!("📤 正在提交答案判分: {} (测试 {})", test.name, test.id);

        let snapshot = session.store().snapshot();
        match client.submit(test.id, &snapshot).await? {
            ApiReply::Ok(report) => {
                info!(
                    "✓ 判分完成: {} ({})",
                    report.correct_text(),
                    report.result.score_text
                );
                Ok(SubmitOutcome::Scored(report))
            }
            ApiReply::Gate(signal) => {
                gate.engage(&signal);
                Ok(SubmitOutcome::GateRequired)
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ 判分被拒绝: {}", message);
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }

    /// 管理员：保存标准答案，成功后刷新 baseline 状态
    async fn save_answer_key(
        client: &ApiClient,
        test: &Test,
        workflow: &mut CalibrationWorkflow,
        gate: &mut GateController,
    ) -> AppResult<SubmitOutcome> {
        info!("💾 正在保存标准答案: {} (测试 {})", test.name, test.id);

        let snapshot = workflow.store().snapshot();
        match client.save_answers(test.id, &snapshot).await? {
            ApiReply::Ok(_) => {
                // 标准答案变更可能影响下游就绪状态
                workflow.refresh_status(client, test).await?;
                info!("✓ 标准答案已保存");
                Ok(SubmitOutcome::KeySaved)
            }
            ApiReply::Gate(signal) => {
                gate.engage(&signal);
                Ok(SubmitOutcome::GateRequired)
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ 标准答案保存被拒绝: {}", message);
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }

    /// 管理员：提交当前 slot 的 baseline 答卷
    async fn save_baseline(
        client: &ApiClient,
        test: &Test,
        workflow: &mut CalibrationWorkflow,
        gate: &mut GateController,
    ) -> AppResult<SubmitOutcome> {
        let slot = workflow.selected_slot();
        info!("💾 正在保存 baseline slot {} (测试 {})", slot, test.id);

        let snapshot = workflow.store().snapshot();
        match client.baseline_submit(test.id, slot, &snapshot).await? {
            ApiReply::Ok(body) => {
                workflow.apply_status(&body);
                let have = workflow.baseline_done().len() as u8;
                info!("✓ baseline 已保存: {}/{}", have, BASELINE_SLOT_COUNT);
                Ok(SubmitOutcome::BaselineSaved {
                    have,
                    need: BASELINE_SLOT_COUNT,
                })
            }
            ApiReply::Gate(signal) => {
                gate.engage(&signal);
                Ok(SubmitOutcome::GateRequired)
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ baseline 保存被拒绝: {}", message);
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }

    async fn do_send_certificate(
        client: &ApiClient,
        certificate_id: u64,
    ) -> AppResult<SubmitOutcome> {
        info!("🏅 正在发送证书 {}", certificate_id);
        match client.send_certificate(certificate_id).await? {
            ApiReply::Ok(_) => {
                info!("✓ 证书已发送");
                Ok(SubmitOutcome::CertificateSent)
            }
            ApiReply::Gate(signal) => {
                warn!("⚠️ 证书发送被拦截: {}", signal.message);
                Ok(SubmitOutcome::Rejected(signal.message))
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ 证书发送失败: {}", message);
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight_guard() {
        let mut coordinator = SubmissionCoordinator::new();
        assert!(!coordinator.is_in_flight());

        assert!(coordinator.begin());
        assert!(coordinator.is_in_flight());

        // 在途期间的第二次触发被拒绝
        assert!(!coordinator.begin());

        coordinator.finish();
        assert!(coordinator.begin());
        coordinator.finish();
    }
}
