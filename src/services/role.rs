//! 角色上下文 - 业务能力层
//!
//! 结合启动时固定的 UI 模式和身份服务报告的角色集合，
//! 推导"是否启用管理员界面"。身份未就绪或查询失败时
//! 一律按普通用户处理（fail-closed）。

use crate::models::test::{Role, UiMode};

/// 角色上下文
#[derive(Debug, Clone)]
pub struct RoleContext {
    mode: UiMode,
    roles: Vec<Role>,
}

impl RoleContext {
    /// 创建角色上下文；身份尚未解析时角色默认为 {user}
    pub fn new(mode: UiMode) -> Self {
        Self {
            mode,
            roles: vec![Role::User],
        }
    }

    /// 启动时固定的 UI 模式
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// 当前角色集合
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// 应用身份服务返回的角色名列表
    ///
    /// 未知角色名被丢弃；全部无法识别时退回 {user}。
    pub fn apply_identity(&mut self, names: &[String]) {
        let mut roles: Vec<Role> = Vec::new();
        for name in names {
            if let Some(role) = Role::parse(name) {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }
        if roles.is_empty() {
            roles.push(Role::User);
        }
        self.roles = roles;
    }

    /// 最高权限角色（ceo > admin > user），用于日志显示
    pub fn primary_role(&self) -> Role {
        if self.roles.contains(&Role::Ceo) {
            Role::Ceo
        } else if self.roles.contains(&Role::Admin) {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// 是否启用管理员界面
    ///
    /// 需要同时满足：启动模式为 admin，且角色集合与 {admin, ceo} 相交。
    pub fn effective_admin_ui(&self) -> bool {
        self.mode == UiMode::Admin
            && self
                .roles
                .iter()
                .any(|r| matches!(r, Role::Admin | Role::Ceo))
    }
}
