//! Mini App 后端 API 客户端
//!
//! 封装所有与后端相关的调用逻辑：URL 拼接、鉴权头附加、
//! 响应分类（正常载荷 / 策略信号 / 服务端拒绝）。
//! 组件层只看到类型化的 [`ApiReply`]，从不直接接触 HTTP。

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppResult};
use crate::models::answer::Answer;
use crate::models::api::{
    AckBody, ApiReply, BaselineStatusBody, CategoriesBody, GateSignal, MeBody, ScoreReport,
    TestBody, TestsBody,
};

/// 鉴权头名称（宿主下发的 initData 原样携带）
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// 服务端没有给出可读消息时的兜底文案
const GENERIC_ERROR: &str = "Xatolik";

/// Mini App 后端 API 客户端
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    init_data: String,
}

impl ApiClient {
    /// 创建新的 API 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::RequestFailed {
                endpoint: "client".to_string(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            init_data: config.init_data.clone(),
        })
    }

    /// 列出测试分类
    pub async fn list_categories(&self) -> AppResult<ApiReply<CategoriesBody>> {
        let (status, body) = self.get("categories", "/api/categories", &[]).await?;
        self.classify("categories", status, body)
    }

    /// 列出某分类下的测试
    ///
    /// # 参数
    /// - `category`: 分类 key
    /// - `for_check`: 普通用户视角（服务端会过滤 baseline 未完成的 Rasch 测试）
    pub async fn list_tests(
        &self,
        category: &str,
        for_check: bool,
    ) -> AppResult<ApiReply<TestsBody>> {
        let mut query: Vec<(&str, String)> = vec![("category", category.to_string())];
        if for_check {
            query.push(("for_check", "1".to_string()));
        }
        let (status, body) = self.get("tests", "/api/tests", &query).await?;
        self.classify("tests", status, body)
    }

    /// 获取单个测试（固定测试直开用）
    pub async fn get_test(&self, test_id: i64) -> AppResult<ApiReply<TestBody>> {
        let query = [("test_id", test_id.to_string())];
        let (status, body) = self.get("test", "/api/test", &query).await?;
        self.classify("test", status, body)
    }

    /// 查询当前身份的角色集合
    pub async fn get_identity(&self) -> AppResult<ApiReply<MeBody>> {
        let (status, body) = self.get("me", "/api/me", &[]).await?;
        self.classify("me", status, body)
    }

    /// 提交答案判分（普通用户）
    ///
    /// # 参数
    /// - `test_id`: 测试 ID
    /// - `answers`: 题号 → 归一化答案（序列化为字符串键对象）
    ///
    /// # 返回
    /// 判分结果，或策略信号/拒绝
    pub async fn submit(
        &self,
        test_id: i64,
        answers: &BTreeMap<u32, Answer>,
    ) -> AppResult<ApiReply<ScoreReport>> {
        let payload = json!({ "test_id": test_id, "answers": answers });
        let (status, body) = self.post("submit", "/api/submit", &payload).await?;
        self.classify("submit", status, body)
    }

    /// 保存标准答案（管理员）
    pub async fn save_answers(
        &self,
        test_id: i64,
        answers: &BTreeMap<u32, Answer>,
    ) -> AppResult<ApiReply<AckBody>> {
        let payload = json!({ "test_id": test_id, "answers": answers });
        let (status, body) = self
            .post("save_answers", "/api/admin/save_answers", &payload)
            .await?;
        self.classify("save_answers", status, body)
    }

    /// 查询 baseline 录入状态（管理员）
    pub async fn baseline_status(&self, test_id: i64) -> AppResult<ApiReply<BaselineStatusBody>> {
        let query = [("test_id", test_id.to_string())];
        let (status, body) = self
            .get("baseline_status", "/api/admin/baseline_status", &query)
            .await?;
        self.classify("baseline_status", status, body)
    }

    /// 提交某个 slot 的 baseline 答案（管理员）
    ///
    /// # 参数
    /// - `test_id`: 测试 ID
    /// - `slot`: baseline slot 编号（1..=10）
    /// - `answers`: 题号 → 归一化答案
    ///
    /// # 返回
    /// 服务端更新后的完成集合
    pub async fn baseline_submit(
        &self,
        test_id: i64,
        slot: u8,
        answers: &BTreeMap<u32, Answer>,
    ) -> AppResult<ApiReply<BaselineStatusBody>> {
        let payload = json!({
            "test_id": test_id,
            "baseline_index": slot,
            "answers": answers,
        });
        let (status, body) = self
            .post("baseline_submit", "/api/admin/baseline_submit", &payload)
            .await?;
        self.classify("baseline_submit", status, body)
    }

    /// 请求把证书发送到宿主聊天
    pub async fn send_certificate(&self, certificate_id: u64) -> AppResult<ApiReply<AckBody>> {
        let payload = json!({ "certificate_id": certificate_id });
        let (status, body) = self
            .post("send_certificate", "/api/send_certificate", &payload)
            .await?;
        self.classify("send_certificate", status, body)
    }

    // ========== 传输与分类 ==========

    async fn get(
        &self,
        endpoint: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url).query(query);
        if !self.init_data.is_empty() {
            request = request.header(INIT_DATA_HEADER, &self.init_data);
        }

        let response = request.send().await.map_err(|e| ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        debug!("GET {} -> {} {}", endpoint, status, body);
        Ok((status, body))
    }

    async fn post(
        &self,
        endpoint: &str,
        path: &str,
        payload: &Value,
    ) -> AppResult<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url).json(payload);
        if !self.init_data.is_empty() {
            request = request.header(INIT_DATA_HEADER, &self.init_data);
        }

        debug!("POST {} Payload: {}", endpoint, payload);

        let response = request.send().await.map_err(|e| ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        debug!("POST {} -> {} {}", endpoint, status, body);
        Ok((status, body))
    }

    /// 把原始响应分类为正常载荷 / 策略信号 / 服务端拒绝
    fn classify<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        status: StatusCode,
        body: Value,
    ) -> AppResult<ApiReply<T>> {
        if Self::is_gate_signal(&body) {
            let signal: GateSignal =
                serde_json::from_value(body).map_err(|e| ApiError::JsonParseFailed {
                    endpoint: endpoint.to_string(),
                    source: e,
                })?;
            return Ok(ApiReply::Gate(signal));
        }

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(GENERIC_ERROR)
                .to_string();
            return Ok(ApiReply::Rejected(message));
        }

        let parsed: T = serde_json::from_value(body).map_err(|e| ApiError::JsonParseFailed {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        Ok(ApiReply::Ok(parsed))
    }

    /// 检查响应是否是"需要加入"策略信号
    fn is_gate_signal(body: &Value) -> bool {
        body.get("join_required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&Config::default()).expect("创建客户端失败")
    }

    #[test]
    fn test_classify_gate_signal() {
        let body = json!({
            "join_required": true,
            "message": "Join required",
            "channel_url": "https://t.me/c",
            "group_url": "https://t.me/g"
        });
        let reply: ApiReply<CategoriesBody> = client()
            .classify("categories", StatusCode::FORBIDDEN, body)
            .expect("分类失败");
        match reply {
            ApiReply::Gate(sig) => assert_eq!(sig.message, "Join required"),
            other => panic!("应当是策略信号: {:?}", other),
        }
    }

    #[test]
    fn test_classify_rejection_uses_server_message() {
        let body = json!({"error": "admin only"});
        let reply: ApiReply<AckBody> = client()
            .classify("save_answers", StatusCode::FORBIDDEN, body)
            .expect("分类失败");
        match reply {
            ApiReply::Rejected(msg) => assert_eq!(msg, "admin only"),
            other => panic!("应当是拒绝: {:?}", other),
        }
    }

    #[test]
    fn test_classify_rejection_fallback_message() {
        let body = json!({"whatever": 1});
        let reply: ApiReply<AckBody> = client()
            .classify("submit", StatusCode::INTERNAL_SERVER_ERROR, body)
            .expect("分类失败");
        match reply {
            ApiReply::Rejected(msg) => assert_eq!(msg, GENERIC_ERROR),
            other => panic!("应当是拒绝: {:?}", other),
        }
    }

    #[test]
    fn test_classify_ok_payload() {
        let body = json!({"categories": [{"key": "math", "label": "Matematika"}]});
        let reply: ApiReply<CategoriesBody> = client()
            .classify("categories", StatusCode::OK, body)
            .expect("分类失败");
        match reply {
            ApiReply::Ok(parsed) => {
                assert_eq!(parsed.categories.len(), 1);
                assert_eq!(parsed.categories[0].key, "math");
            }
            other => panic!("应当是正常载荷: {:?}", other),
        }
    }
}
