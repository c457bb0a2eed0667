//! 答案数据模型与归一化
//!
//! 每道题的答案由两部分组成：
//! - `choices`: 选项字母集合（固定字母表 A-F）
//! - `manual`: 手动输入的自由文本列表
//!
//! 归一化规则：字母统一大写、去重、升序排序；手动文本去首尾空白、
//! 丢弃空串、按首次出现顺序去重。归一化是幂等的，非法输入只会被
//! 静默丢弃，永远不会报错。

use serde::{Deserialize, Serialize};

/// 固定选项字母表
pub const CHOICE_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// 未归一化的原始答案（来自 UI 输入或外部数据）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnswer {
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub manual: Vec<String>,
}

/// 归一化后的单题答案
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// 选项字母，大写、去重、升序
    #[serde(default)]
    pub choices: Vec<char>,
    /// 手动答案，已去空白去重，保留首次出现顺序
    #[serde(default)]
    pub manual: Vec<String>,
}

impl Answer {
    /// 判断答案是否为空
    ///
    /// 选项集合为空且所有手动条目去空白后为空时才算空。
    /// 选项与手动答案可以同时非空（题目允许"选项 + 手动补充"）。
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty() && self.manual.iter().all(|m| m.trim().is_empty())
    }
}

/// 将原始答案归一化为标准形式
///
/// # 参数
/// - `raw`: 原始答案（任意字符串序列）
///
/// # 返回
/// 归一化后的 [`Answer`]，非法字母和空白文本被丢弃
pub fn normalize(raw: &RawAnswer) -> Answer {
    normalize_parts(
        raw.choices.iter().map(String::as_str),
        raw.manual.iter().map(String::as_str),
    )
}

/// 对已归一化的答案再次归一化（变更后维护不变量用）
pub fn renormalize(answer: &Answer) -> Answer {
    let choices: Vec<String> = answer.choices.iter().map(|c| c.to_string()).collect();
    normalize_parts(
        choices.iter().map(String::as_str),
        answer.manual.iter().map(String::as_str),
    )
}

fn normalize_parts<'a>(
    choices: impl Iterator<Item = &'a str>,
    manual: impl Iterator<Item = &'a str>,
) -> Answer {
    let mut letters: Vec<char> = Vec::new();
    for raw in choices {
        let upper = raw.trim().to_uppercase();
        let mut chars = upper.chars();
        // 只接受单个字母，且必须在固定字母表内
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if CHOICE_LETTERS.contains(&c) && !letters.contains(&c) {
                letters.push(c);
            }
        }
    }
    letters.sort_unstable();

    let mut texts: Vec<String> = Vec::new();
    for raw in manual {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !texts.iter().any(|t| t == trimmed) {
            texts.push(trimmed.to_string());
        }
    }

    Answer {
        choices: letters,
        manual: texts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(choices: &[&str], manual: &[&str]) -> RawAnswer {
        RawAnswer {
            choices: choices.iter().map(|s| s.to_string()).collect(),
            manual: manual.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_choices_canonical_order() {
        let a = normalize(&raw(&["c", "a", "a"], &[]));
        assert_eq!(a.choices, vec!['A', 'C']);
    }

    #[test]
    fn test_invalid_letters_dropped() {
        let a = normalize(&raw(&["G", "ab", "", "b"], &[]));
        assert_eq!(a.choices, vec!['B']);
    }

    #[test]
    fn test_manual_dedup_preserves_order() {
        let a = normalize(&raw(&[], &[" x ", " y", "x"]));
        assert_eq!(a.manual, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_blank_manual_is_empty() {
        let a = normalize(&raw(&[], &["  "]));
        assert!(a.is_empty());
    }

    #[test]
    fn test_both_kinds_allowed() {
        let a = normalize(&raw(&["B"], &["2**2"]));
        assert!(!a.is_empty());
        assert_eq!(a.choices, vec!['B']);
        assert_eq!(a.manual, vec!["2**2".to_string()]);
    }

    #[test]
    fn test_normalize_idempotent() {
        let a = normalize(&raw(&["f", "B", "b", "q"], &["  1 ", "1", "", "2"]));
        assert_eq!(renormalize(&a), a);
    }

    #[test]
    fn test_wire_shape() {
        let a = normalize(&raw(&["d", "b"], &["ok"]));
        let json = serde_json::to_string(&a).expect("序列化失败");
        assert_eq!(json, r#"{"choices":["B","D"],"manual":["ok"]}"#);
    }
}
