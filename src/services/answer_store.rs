//! 答案存储 - 业务能力层
//!
//! 持有一次答题会话内"题号 → 答案"的完整映射，并负责进度统计。
//! 每次选择测试（或切换 baseline slot）都会创建全新的实例，
//! 会话结束即丢弃。失败的远程调用永远不会修改这里的数据。

use std::collections::BTreeMap;

use crate::models::answer::{renormalize, Answer, CHOICE_LETTERS};

/// 派生的答题进度（每次查询现算，不缓存）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 已作答题数（答案非空）
    pub done: u32,
    /// 总题数
    pub total: u32,
    /// 完成百分比（四舍五入；total 为 0 时为 0）
    pub percent: u32,
}

/// 答案存储
///
/// 题号从 1 开始连续编号，无空洞。所有写操作之后立即重新归一化，
/// 因此 [`snapshot`](AnswerStore::snapshot) 永远不含非法字母或空白文本。
#[derive(Debug, Clone)]
pub struct AnswerStore {
    answers: BTreeMap<u32, Answer>,
}

impl AnswerStore {
    /// 为 `total_questions` 道题创建全空的存储
    pub fn new(total_questions: u32) -> Self {
        let mut store = Self {
            answers: BTreeMap::new(),
        };
        store.reset(total_questions);
        store
    }

    /// 重置为 `total_questions` 道全空的题
    pub fn reset(&mut self, total_questions: u32) {
        self.answers.clear();
        for q in 1..=total_questions {
            self.answers.insert(q, Answer::default());
        }
    }

    /// 总题数
    pub fn total(&self) -> u32 {
        self.answers.len() as u32
    }

    /// 读取某题答案；题号越界返回 None
    pub fn answer(&self, question: u32) -> Option<&Answer> {
        self.answers.get(&question)
    }

    /// 翻转某题某个选项字母的选中状态
    ///
    /// 非法字母或越界题号静默忽略（归一化即校验，不报错）。
    pub fn toggle_choice(&mut self, question: u32, letter: char) {
        let upper = letter.to_ascii_uppercase();
        if !CHOICE_LETTERS.contains(&upper) {
            return;
        }
        if let Some(answer) = self.answers.get_mut(&question) {
            if let Some(pos) = answer.choices.iter().position(|&c| c == upper) {
                answer.choices.remove(pos);
            } else {
                answer.choices.push(upper);
            }
            *answer = renormalize(answer);
        }
    }

    /// 清空某题答案
    pub fn clear(&mut self, question: u32) {
        if let Some(answer) = self.answers.get_mut(&question) {
            *answer = Answer::default();
        }
    }

    /// 追加一条手动答案（去空白后为空或重复则无效果）
    pub fn add_manual(&mut self, question: u32, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(answer) = self.answers.get_mut(&question) {
            answer.manual.push(trimmed.to_string());
            *answer = renormalize(answer);
        }
    }

    /// 按当前列表位置删除一条手动答案
    pub fn remove_manual(&mut self, question: u32, index: usize) {
        if let Some(answer) = self.answers.get_mut(&question) {
            if index < answer.manual.len() {
                answer.manual.remove(index);
                *answer = renormalize(answer);
            }
        }
    }

    /// 当前进度（现算）
    pub fn progress(&self) -> Progress {
        let total = self.total();
        let done = self.answers.values().filter(|a| !a.is_empty()).count() as u32;
        let percent = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0).round() as u32
        };
        Progress {
            done,
            total,
            percent,
        }
    }

    /// 导出完整映射用于序列化（每个答案保证已归一化）
    pub fn snapshot(&self) -> BTreeMap<u32, Answer> {
        self.answers
            .iter()
            .map(|(q, a)| (*q, renormalize(a)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_creates_empty_answers() {
        let store = AnswerStore::new(5);
        assert_eq!(store.total(), 5);
        assert_eq!(store.progress(), Progress { done: 0, total: 5, percent: 0 });
        assert!(store.answer(3).map(|a| a.is_empty()).unwrap_or(false));
        assert!(store.answer(6).is_none());
    }

    #[test]
    fn test_toggle_choice_on_off() {
        let mut store = AnswerStore::new(3);
        store.toggle_choice(1, 'd');
        store.toggle_choice(1, 'b');
        assert_eq!(store.answer(1).map(|a| a.choices.clone()), Some(vec!['B', 'D']));

        store.toggle_choice(1, 'D');
        assert_eq!(store.answer(1).map(|a| a.choices.clone()), Some(vec!['B']));
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut store = AnswerStore::new(2);
        store.toggle_choice(9, 'A');
        store.toggle_choice(1, 'z');
        assert_eq!(store.progress().done, 0);
    }

    #[test]
    fn test_manual_add_remove() {
        let mut store = AnswerStore::new(2);
        store.add_manual(2, " 2**2 ");
        store.add_manual(2, "2**2");
        store.add_manual(2, "   ");
        store.add_manual(2, "sqrt(16)");
        assert_eq!(
            store.answer(2).map(|a| a.manual.clone()),
            Some(vec!["2**2".to_string(), "sqrt(16)".to_string()])
        );

        store.remove_manual(2, 0);
        assert_eq!(
            store.answer(2).map(|a| a.manual.clone()),
            Some(vec!["sqrt(16)".to_string()])
        );

        // 越界索引无效果
        store.remove_manual(2, 5);
        assert_eq!(store.answer(2).map(|a| a.manual.len()), Some(1));
    }

    #[test]
    fn test_progress_scenario() {
        // 5 道题：Q1 选 {B,D}，Q2 手动 "2**2"，其余空
        let mut store = AnswerStore::new(5);
        store.toggle_choice(1, 'B');
        store.toggle_choice(1, 'D');
        store.add_manual(2, "2**2");
        assert_eq!(store.progress(), Progress { done: 2, total: 5, percent: 40 });
    }

    #[test]
    fn test_done_never_exceeds_total() {
        let mut store = AnswerStore::new(2);
        for q in 1..=2 {
            store.toggle_choice(q, 'A');
            store.add_manual(q, "x");
        }
        let progress = store.progress();
        assert_eq!(progress.done, 2);
        assert!(progress.done <= progress.total);
        assert_eq!(progress.percent, 100);
    }

    #[test]
    fn test_clear_resets_question() {
        let mut store = AnswerStore::new(2);
        store.toggle_choice(1, 'A');
        store.add_manual(1, "x");
        store.clear(1);
        assert_eq!(store.progress().done, 0);
    }

    #[test]
    fn test_snapshot_is_normalized() {
        let mut store = AnswerStore::new(2);
        store.toggle_choice(1, 'c');
        store.toggle_choice(1, 'a');
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&1].choices, vec!['A', 'C']);
        assert!(snapshot[&2].is_empty());
    }

    #[test]
    fn test_empty_store_progress() {
        let store = AnswerStore::new(0);
        assert_eq!(store.progress(), Progress { done: 0, total: 0, percent: 0 });
    }
}
