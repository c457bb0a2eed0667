//! 标定流程 - 流程层（仅管理员）
//!
//! 双模式控制器：
//! - 标准答案模式：整份测试一套标准答案
//! - baseline 模式：10 个合成答卷 slot（1..=10），各自独立的答案存储
//!
//! 切换模式/slot 不会触碰另一侧已录入的数据。完成集合
//! （哪些 slot 已录入）永远以服务端报告为准，本地从不推算。

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::api::{ApiReply, BaselineStatusBody};
use crate::models::test::Test;
use crate::services::answer_store::AnswerStore;

/// baseline slot 总数
pub const BASELINE_SLOT_COUNT: u8 = 10;

/// 标定模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMode {
    /// 录入标准答案
    AnswerKey,
    /// 录入 baseline 答卷
    Baseline,
}

/// baseline 就绪状态提示（纯信息，不阻塞任何本地操作）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineReadiness {
    /// 非 Rasch 测试，无需 baseline
    NotApplicable,
    /// 还差若干个 slot
    Incomplete { have: u8 },
    /// 10 个 slot 全部就绪
    Ready,
}

/// 标定流程控制器
#[derive(Debug)]
pub struct CalibrationWorkflow {
    mode: CalibrationMode,
    selected_slot: u8,
    key_store: AnswerStore,
    slot_stores: Vec<AnswerStore>,
    baseline_done: BTreeSet<u8>,
}

impl CalibrationWorkflow {
    /// 为一次管理员会话创建标定流程
    ///
    /// 标准答案存储和 10 个 slot 存储各自独立，全部初始为空。
    pub fn new(total_questions: u32) -> Self {
        Self {
            mode: CalibrationMode::AnswerKey,
            selected_slot: 1,
            key_store: AnswerStore::new(total_questions),
            slot_stores: (0..BASELINE_SLOT_COUNT)
                .map(|_| AnswerStore::new(total_questions))
                .collect(),
            baseline_done: BTreeSet::new(),
        }
    }

    /// 当前模式
    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    /// 当前选中的 slot（1..=10）
    pub fn selected_slot(&self) -> u8 {
        self.selected_slot
    }

    /// 纯状态的模式切换（不做远程刷新）
    pub fn set_mode(&mut self, mode: CalibrationMode) {
        self.mode = mode;
    }

    /// 进入某个模式并刷新 baseline 状态
    pub async fn enter_mode(
        &mut self,
        mode: CalibrationMode,
        client: &ApiClient,
        test: &Test,
    ) -> AppResult<()> {
        self.set_mode(mode);
        self.refresh_status(client, test).await
    }

    /// 切换 baseline slot，越界钳制到 [1, 10]
    ///
    /// 已完成的 slot 也可以自由切换——重新提交即覆盖。
    pub fn select_slot(&mut self, slot: u8) {
        self.selected_slot = slot.clamp(1, BASELINE_SLOT_COUNT);
    }

    /// 当前模式/slot 对应的答案存储
    pub fn store(&self) -> &AnswerStore {
        match self.mode {
            CalibrationMode::AnswerKey => &self.key_store,
            CalibrationMode::Baseline => &self.slot_stores[(self.selected_slot - 1) as usize],
        }
    }

    /// 当前模式/slot 对应的答案存储（可变）
    pub fn store_mut(&mut self) -> &mut AnswerStore {
        match self.mode {
            CalibrationMode::AnswerKey => &mut self.key_store,
            CalibrationMode::Baseline => &mut self.slot_stores[(self.selected_slot - 1) as usize],
        }
    }

    /// 服务端报告的已完成 slot 集合
    pub fn baseline_done(&self) -> &BTreeSet<u8> {
        &self.baseline_done
    }

    /// 用服务端响应整体替换完成集合（越界编号丢弃）
    pub fn apply_status(&mut self, body: &BaselineStatusBody) {
        self.baseline_done = body
            .done
            .iter()
            .copied()
            .filter(|slot| (1..=BASELINE_SLOT_COUNT).contains(slot))
            .collect();
    }

    /// 清空完成集合（非 Rasch 测试）
    pub fn clear_status(&mut self) {
        self.baseline_done.clear();
    }

    /// 就绪提示：Rasch 测试且完成数不足 10 时为"未完成"
    pub fn readiness(&self, test: &Test) -> BaselineReadiness {
        if !test.is_rasch {
            return BaselineReadiness::NotApplicable;
        }
        let have = self.baseline_done.len() as u8;
        if have < BASELINE_SLOT_COUNT {
            BaselineReadiness::Incomplete { have }
        } else {
            BaselineReadiness::Ready
        }
    }

    /// 从服务端刷新 baseline 完成状态
    ///
    /// 非 Rasch 测试直接清空集合并跳过请求。刷新失败只记日志，
    /// 保留旧集合（提示是纯信息性的，不值得中断流程）。
    pub async fn refresh_status(&mut self, client: &ApiClient, test: &Test) -> AppResult<()> {
        if !test.is_rasch {
            self.clear_status();
            return Ok(());
        }

        match client.baseline_status(test.id).await {
            Ok(ApiReply::Ok(body)) => {
                self.apply_status(&body);
                info!("🧪 baseline 状态: {}/{}", self.baseline_done.len(), BASELINE_SLOT_COUNT);
            }
            Ok(ApiReply::Gate(_)) | Ok(ApiReply::Rejected(_)) => {
                warn!("⚠️ baseline 状态查询被拒绝，保留旧状态");
            }
            Err(e) => {
                warn!("⚠️ baseline 状态刷新失败: {}", e);
            }
        }
        Ok(())
    }
}
