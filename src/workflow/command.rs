//! 类型化命令 - 流程层
//!
//! UI 事件先翻译为类型化命令，再由各组件的 reducer 消费。
//! 命令序列可以在测试里确定性地重放。

use crate::services::answer_store::AnswerStore;
use crate::services::navigator::Navigator;
use crate::workflow::calibration::CalibrationMode;

/// 答案编辑命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// 翻转某题某个选项字母
    ToggleChoice { question: u32, letter: char },
    /// 追加一条手动答案
    AddManual { question: u32, text: String },
    /// 按位置删除一条手动答案
    RemoveManual { question: u32, index: usize },
    /// 清空某题答案
    ClearAnswer { question: u32 },
}

/// 导航命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Prev,
    Next,
    Jump(u32),
}

/// 会话级命令（编辑 + 导航 + 管理员模式切换）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Edit(EditCommand),
    Nav(NavCommand),
    /// 切换标定模式（纯状态切换；状态刷新由上层异步触发）
    SwitchMode(CalibrationMode),
    /// 切换 baseline slot（1..=10，越界钳制）
    SwitchSlot(u8),
}

/// 把编辑命令应用到答案存储
pub fn apply_edit(store: &mut AnswerStore, command: &EditCommand) {
    match command {
        EditCommand::ToggleChoice { question, letter } => store.toggle_choice(*question, *letter),
        EditCommand::AddManual { question, text } => store.add_manual(*question, text),
        EditCommand::RemoveManual { question, index } => store.remove_manual(*question, *index),
        EditCommand::ClearAnswer { question } => store.clear(*question),
    }
}

/// 把导航命令应用到导航器
pub fn apply_nav(navigator: &mut Navigator, command: &NavCommand) {
    match command {
        NavCommand::Prev => navigator.prev(),
        NavCommand::Next => navigator.next(),
        NavCommand::Jump(question) => navigator.jump(*question),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_commands() -> Vec<EditCommand> {
        vec![
            EditCommand::ToggleChoice { question: 1, letter: 'b' },
            EditCommand::ToggleChoice { question: 1, letter: 'd' },
            EditCommand::AddManual { question: 2, text: " 2**2 ".to_string() },
            EditCommand::AddManual { question: 2, text: "2**2".to_string() },
            EditCommand::ToggleChoice { question: 3, letter: 'A' },
            EditCommand::ClearAnswer { question: 3 },
        ]
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut first = AnswerStore::new(5);
        let mut second = AnswerStore::new(5);
        for command in sample_commands() {
            apply_edit(&mut first, &command);
        }
        for command in sample_commands() {
            apply_edit(&mut second, &command);
        }
        assert_eq!(first.snapshot(), second.snapshot());
        assert_eq!(first.progress().done, 2);
    }

    #[test]
    fn test_nav_commands_clamp() {
        let mut nav = Navigator::new(3);
        apply_nav(&mut nav, &NavCommand::Prev);
        assert_eq!(nav.current(), 1);
        apply_nav(&mut nav, &NavCommand::Jump(7));
        assert_eq!(nav.current(), 3);
        apply_nav(&mut nav, &NavCommand::Next);
        assert_eq!(nav.current(), 3);
    }
}
