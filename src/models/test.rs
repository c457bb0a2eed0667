//! 测试/分类描述符与角色模型

use serde::{Deserialize, Serialize};

/// 测试分类（服务端下发）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

/// 测试描述符
///
/// 由服务端下发，在一次答题会话内不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Test {
    pub id: i64,
    pub name: String,
    pub num_questions: u32,
    #[serde(default)]
    pub is_rasch: bool,
    /// 仅对 Rasch 测试有意义；缺省按"已就绪"处理
    #[serde(default = "default_baseline_ready")]
    pub baseline_ready: bool,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_baseline_ready() -> bool {
    true
}

/// 身份服务报告的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
    Ceo,
}

impl Role {
    /// 从角色名解析，未知角色返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "ceo" => Some(Role::Ceo),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Ceo => "ceo",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 启动参数指定的 UI 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    User,
    Admin,
}

impl UiMode {
    /// 从启动参数解析，未知值退回普通用户模式
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("admin") {
            UiMode::Admin
        } else {
            UiMode::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse(" Admin "), Some(Role::Admin));
        assert_eq!(Role::parse("ceo"), Some(Role::Ceo));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_ui_mode_unknown_falls_back_to_user() {
        assert_eq!(UiMode::parse("admin"), UiMode::Admin);
        assert_eq!(UiMode::parse("whatever"), UiMode::User);
    }

    #[test]
    fn test_test_decode_defaults() {
        let t: Test =
            serde_json::from_str(r#"{"id": 7, "name": "Algebra", "num_questions": 5}"#)
                .expect("解析失败");
        assert!(!t.is_rasch);
        assert!(t.baseline_ready);
        assert_eq!(t.category, None);
    }
}
