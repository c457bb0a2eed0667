//! 答题会话 - 流程层
//!
//! 封装"我正在答哪份测试"的全部可变状态：测试描述符、答案存储、
//! 导航器，管理员会话额外带一个标定流程。每次选择测试都创建新
//! 会话，返回列表即丢弃，状态绝不跨会话复用。

use crate::models::test::Test;
use crate::services::answer_store::{AnswerStore, Progress};
use crate::services::navigator::Navigator;
use crate::workflow::calibration::CalibrationWorkflow;
use crate::workflow::command::{apply_edit, apply_nav, SessionCommand};

/// 答题会话
#[derive(Debug)]
pub struct SolveSession {
    test: Test,
    store: AnswerStore,
    navigator: Navigator,
    calibration: Option<CalibrationWorkflow>,
}

impl SolveSession {
    /// 为选中的测试创建会话
    ///
    /// # 参数
    /// - `test`: 测试描述符（会话期间不可变）
    /// - `admin_ui`: 是否管理员界面（决定是否挂载标定流程）
    pub fn new(test: Test, admin_ui: bool) -> Self {
        let total = test.num_questions;
        Self {
            store: AnswerStore::new(total),
            navigator: Navigator::new(total),
            calibration: admin_ui.then(|| CalibrationWorkflow::new(total)),
            test,
        }
    }

    /// 会话的测试描述符
    pub fn test(&self) -> &Test {
        &self.test
    }

    /// 导航器
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// 标定流程（仅管理员会话）
    pub fn calibration(&self) -> Option<&CalibrationWorkflow> {
        self.calibration.as_ref()
    }

    /// 同时借出测试描述符和标定流程（保存流程需要两者）
    pub fn calibration_parts(&mut self) -> Option<(&Test, &mut CalibrationWorkflow)> {
        let Self { test, calibration, .. } = self;
        calibration.as_mut().map(|wf| (&*test, wf))
    }

    /// 当前生效的答案存储
    ///
    /// 管理员会话路由到标定流程当前模式/slot 的存储，
    /// 普通会话路由到自己的答题存储。
    pub fn store(&self) -> &AnswerStore {
        match &self.calibration {
            Some(wf) => wf.store(),
            None => &self.store,
        }
    }

    /// 当前生效的答案存储（可变）
    pub fn store_mut(&mut self) -> &mut AnswerStore {
        match &mut self.calibration {
            Some(wf) => wf.store_mut(),
            None => &mut self.store,
        }
    }

    /// 当前进度（基于生效存储）
    pub fn progress(&self) -> Progress {
        self.store().progress()
    }

    /// 消费一条会话命令
    pub fn apply(&mut self, command: &SessionCommand) {
        match command {
            SessionCommand::Edit(edit) => apply_edit(self.store_mut(), edit),
            SessionCommand::Nav(nav) => apply_nav(&mut self.navigator, nav),
            SessionCommand::SwitchMode(mode) => {
                if let Some(wf) = self.calibration.as_mut() {
                    wf.set_mode(*mode);
                }
            }
            SessionCommand::SwitchSlot(slot) => {
                if let Some(wf) = self.calibration.as_mut() {
                    wf.select_slot(*slot);
                }
            }
        }
    }
}
