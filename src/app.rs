//! 应用编排 - 编排层
//!
//! 持有整次运行的会话对象（角色上下文、门控、提交协调器、
//! 分类/测试列表、当前答题会话），驱动启动序列：
//! 身份 → 分类 → （固定测试直开 或 默认选中第一个分类）。
//! 各组件只通过这里获得自己那份状态切片。

use anyhow::Result;
use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::api::ApiReply;
use crate::models::test::{Category, Test, UiMode};
use crate::services::gate::{GateController, GateState};
use crate::services::role::RoleContext;
use crate::workflow::calibration::CalibrationMode;
use crate::workflow::command::SessionCommand;
use crate::workflow::session::SolveSession;
use crate::workflow::submission::{SubmissionCoordinator, SubmitOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    client: ApiClient,
    roles: RoleContext,
    gate: GateController,
    coordinator: SubmissionCoordinator,
    categories: Vec<Category>,
    selected_category: Option<String>,
    tests: Vec<Test>,
    session: Option<SolveSession>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        let client = ApiClient::new(&config)?;
        let mode = UiMode::parse(&config.mode);

        Ok(Self {
            client,
            roles: RoleContext::new(mode),
            gate: GateController::new(),
            coordinator: SubmissionCoordinator::new(),
            categories: Vec::new(),
            selected_category: None,
            tests: Vec::new(),
            session: None,
            config,
        })
    }

    /// 运行启动序列
    pub async fn run(&mut self) -> Result<()> {
        log_startup(&self.config);

        self.load_identity().await;

        if !self.load_categories().await? {
            if self.gate.is_required() {
                log_gate(self.gate.state());
            }
            return Ok(());
        }

        if let Some(test_id) = self.config.fixed_test_id {
            // 固定测试直开，跳过分类浏览
            self.open_fixed_test(test_id).await?;
        } else if let Some(first) = self.categories.first().map(|c| c.key.clone()) {
            self.select_category(&first).await?;
        }

        log_boot_summary(&self.roles, &self.categories, self.session.as_ref());
        Ok(())
    }

    // ========== 启动序列 ==========

    /// 查询身份；失败时保持 {user}（fail-closed）
    pub async fn load_identity(&mut self) {
        match self.client.get_identity().await {
            Ok(ApiReply::Ok(me)) => {
                self.roles.apply_identity(&me.roles);
                info!("✓ 身份就绪: {}", self.roles.primary_role());
            }
            Ok(_) | Err(_) => {
                warn!("⚠️ 身份查询失败，按普通用户处理");
            }
        }
    }

    /// 拉取分类列表
    ///
    /// # 返回
    /// 成功返回 true；被门控或被拒绝返回 false
    pub async fn load_categories(&mut self) -> AppResult<bool> {
        match self.client.list_categories().await? {
            ApiReply::Ok(body) => {
                info!("✓ 找到 {} 个分类", body.categories.len());
                self.categories = body.categories;
                self.gate.clear();
                Ok(true)
            }
            ApiReply::Gate(signal) => {
                self.gate.engage(&signal);
                Ok(false)
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ 分类加载失败: {}", message);
                Ok(false)
            }
        }
    }

    /// 门控复查：重新拉取分类，成功则恢复正常流程
    pub async fn recheck_gate(&mut self) -> AppResult<bool> {
        let Self { client, gate, .. } = self;
        match gate.recheck(client).await? {
            Some(categories) => {
                self.categories = categories;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========== 分类与测试选择 ==========

    /// 选中分类并拉取其测试列表
    ///
    /// 切换分类会丢弃旧测试列表和当前会话。
    pub async fn select_category(&mut self, key: &str) -> AppResult<()> {
        self.selected_category = Some(key.to_string());
        self.tests.clear();
        self.session = None;

        // 普通用户视角：服务端过滤 baseline 未完成的 Rasch 测试
        let for_check = !self.roles.effective_admin_ui();

        match self.client.list_tests(key, for_check).await? {
            ApiReply::Ok(body) => {
                info!("✓ 分类 {}: {} 个测试", key, body.tests.len());
                self.tests = body.tests;
                self.gate.clear();
            }
            ApiReply::Gate(signal) => self.gate.engage(&signal),
            ApiReply::Rejected(message) => {
                warn!("⚠️ 测试列表加载失败: {}", message);
            }
        }
        Ok(())
    }

    /// 普通用户能否开始该测试
    ///
    /// baseline 未完成的 Rasch 测试对普通用户关闭；管理员总是可以打开。
    pub fn can_start(&self, test: &Test) -> bool {
        self.roles.effective_admin_ui() || !test.is_rasch || test.baseline_ready
    }

    /// 打开测试，创建新的答题会话
    pub async fn open_test(&mut self, test: Test) -> AppResult<()> {
        if !self.can_start(&test) {
            return Err(BusinessError::TestNotReady { test_id: test.id }.into());
        }

        let admin_ui = self.roles.effective_admin_ui();
        info!(
            "📝 打开测试: {} ({} 题{})",
            test.name,
            test.num_questions,
            if test.is_rasch { " • Rasch" } else { "" }
        );

        let mut session = SolveSession::new(test, admin_ui);
        if let Some((test, workflow)) = session.calibration_parts() {
            workflow.refresh_status(&self.client, test).await?;
        }
        self.session = Some(session);
        Ok(())
    }

    /// 按 ID 加载并打开固定测试（启动参数直开）
    pub async fn open_fixed_test(&mut self, test_id: i64) -> AppResult<()> {
        match self.client.get_test(test_id).await? {
            ApiReply::Ok(body) => self.open_test(body.test).await,
            ApiReply::Gate(signal) => {
                self.gate.engage(&signal);
                Ok(())
            }
            ApiReply::Rejected(message) => {
                warn!("⚠️ 测试 {} 加载失败: {}", test_id, message);
                Ok(())
            }
        }
    }

    /// 返回测试列表，丢弃当前会话
    pub fn close_session(&mut self) {
        self.session = None;
    }

    // ========== 会话操作 ==========

    /// 消费一条会话命令（无会话时忽略）
    pub fn apply(&mut self, command: &SessionCommand) {
        if let Some(session) = self.session.as_mut() {
            session.apply(command);
        }
    }

    /// 切换标定模式并刷新 baseline 状态（仅管理员会话有效）
    pub async fn switch_calibration_mode(&mut self, mode: CalibrationMode) -> AppResult<()> {
        let Self { client, session, .. } = self;
        if let Some(session) = session.as_mut() {
            if let Some((test, workflow)) = session.calibration_parts() {
                workflow.enter_mode(mode, client, test).await?;
            }
        }
        Ok(())
    }

    /// 提交当前会话（按角色分派，受单飞保护）
    pub async fn submit(&mut self) -> AppResult<SubmitOutcome> {
        let Self {
            client,
            roles,
            gate,
            coordinator,
            session,
            ..
        } = self;
        let Some(session) = session.as_mut() else {
            return Err(BusinessError::NoTestSelected.into());
        };
        coordinator.submit(client, roles, session, gate).await
    }

    /// 请求发送证书
    pub async fn send_certificate(&mut self, certificate_id: u64) -> AppResult<SubmitOutcome> {
        let Self { client, coordinator, .. } = self;
        coordinator.send_certificate(client, certificate_id).await
    }

    // ========== 状态访问 ==========

    pub fn roles(&self) -> &RoleContext {
        &self.roles
    }

    pub fn gate_state(&self) -> &GateState {
        self.gate.state()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn session(&self) -> Option<&SolveSession> {
        self.session.as_ref()
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Mini App 引擎启动 - {} 模式", config.mode);
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📡 服务端: {}", config.api_base_url);
    info!("{}", "=".repeat(60));
}

fn log_gate(state: &GateState) {
    warn!("🔒 订阅门控生效: {}", state.message);
    warn!("   频道: {}", state.channel_url);
    warn!("   群组: {}", state.group_url);
}

fn log_boot_summary(roles: &RoleContext, categories: &[Category], session: Option<&SolveSession>) {
    info!("{}", "─".repeat(60));
    info!("📊 启动完成");
    info!("角色: {}", roles.primary_role());
    info!("分类数: {}", categories.len());
    if let Some(session) = session {
        info!("当前测试: {}", session.test().name);
    }
    info!("{}", "─".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasch_not_ready() -> Test {
        Test {
            id: 9,
            name: "Rasch".to_string(),
            num_questions: 5,
            is_rasch: true,
            baseline_ready: false,
            category: None,
        }
    }

    fn app_with_mode(mode: &str) -> App {
        let config = Config {
            mode: mode.to_string(),
            ..Config::default()
        };
        App::initialize(config).expect("初始化失败")
    }

    #[test]
    fn test_user_cannot_start_unready_rasch() {
        let app = app_with_mode("user");
        assert!(!app.can_start(&rasch_not_ready()));

        let mut ready = rasch_not_ready();
        ready.baseline_ready = true;
        assert!(app.can_start(&ready));
    }

    #[test]
    fn test_admin_can_always_start() {
        let mut app = app_with_mode("admin");
        app.roles.apply_identity(&["admin".to_string()]);
        assert!(app.can_start(&rasch_not_ready()));
    }

    #[test]
    fn test_admin_mode_without_role_is_user_view() {
        // 身份未确认前 admin 模式也按普通用户处理
        let app = app_with_mode("admin");
        assert!(!app.roles().effective_admin_ui());
        assert!(!app.can_start(&rasch_not_ready()));
    }

    #[test]
    fn test_close_session_discards_state() {
        let mut app = app_with_mode("user");
        app.session = Some(SolveSession::new(
            Test {
                id: 1,
                name: "Demo".to_string(),
                num_questions: 3,
                is_rasch: false,
                baseline_ready: true,
                category: None,
            },
            false,
        ));
        app.close_session();
        assert!(app.session().is_none());
    }
}
