//! 目录管理后端的 HTTP 客户端
//!
//! 每个操作只发一次请求，不重试也不设超时。非成功状态码的响应体中若有
//! `message` 字段则作为错误信息，否则使用 `HTTP error! status: <code>`。

use application::{
    AuditLogGateway, DepartmentGateway, DomainGateway, GatewayResult, TransportError, UserGateway,
};
use async_trait::async_trait;
use domain::{
    AccountId, AuditLogQuery, DepartmentId, DepartmentUpdate, DomainId, DomainPayload,
    NewDepartment, NewUser, UserKey, UserStatus, UserUpdate, Username,
};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    http: Client,
    base_url: Url,
}

impl HttpDirectoryClient {
    /// `base_url` 是接口根路径，例如 `http://127.0.0.1:8000/api`
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_http_client(base_url, Client::new())
    }

    pub fn with_http_client(base_url: &str, http: Client) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| TransportError::network(format!("invalid base url {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::network(format!(
                "invalid base url {base_url}: cannot be a base"
            )));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 拼接路径段（逐段转义）和查询参数
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::network(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn account_query(account: AccountId) -> Vec<(&'static str, String)> {
        vec![("user_id", account.to_string())]
    }

    async fn send(&self, method: Method, url: Url) -> GatewayResult {
        // 带请求体时由 `json` 设置
        let request = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        self.execute(method, url, request).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> GatewayResult {
        let request = self.http.request(method.clone(), url.clone()).json(body);
        self.execute(method, url, request).await
    }

    async fn execute(&self, method: Method, url: Url, request: RequestBuilder) -> GatewayResult {
        tracing::debug!(%method, %url, "发送请求");

        let response = request
            .send()
            .await
            .map_err(|err| {
                tracing::error!(%method, %url, error = %err, "请求失败");
                TransportError::network(err.to_string())
            })?;

        self.handle_response(method, url, response).await
    }

    async fn handle_response(
        &self,
        method: Method,
        url: Url,
        response: reqwest::Response,
    ) -> GatewayResult {
        let status = response.status();
        let text = response.text().await.map_err(|err| {
            tracing::error!(%method, %url, error = %err, "读取响应失败");
            TransportError::network(err.to_string())
        })?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|err| {
                tracing::error!(%method, %url, error = %err, "响应不是合法的 JSON");
                TransportError::status(status.as_u16(), format!("invalid JSON response: {err}"))
            });
        }

        let error = error_from_body(status.as_u16(), &text);
        tracing::error!(
            %method,
            %url,
            status = status.as_u16(),
            error = %error.message,
            "请求返回错误状态"
        );
        Err(error)
    }
}

/// 错误响应体中的 `message` 字段优先
fn error_from_body(status: u16, text: &str) -> TransportError {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_owned))
        .map(|message| TransportError::status(status, message))
        .unwrap_or_else(|| TransportError::from_status(status))
}

#[async_trait]
impl DomainGateway for HttpDirectoryClient {
    async fn list_domains(&self, account: AccountId) -> GatewayResult {
        let url = self.url(&["list_domains"], &Self::account_query(account))?;
        self.send(Method::GET, url).await
    }

    async fn add_domain(&self, payload: &DomainPayload) -> GatewayResult {
        let url = self.url(&["add_domain"], &[])?;
        self.send_json(Method::POST, url, payload).await
    }

    async fn update_domain(
        &self,
        id: DomainId,
        payload: &DomainPayload,
        account: AccountId,
    ) -> GatewayResult {
        let id = id.to_string();
        let url = self.url(&["update_domain", &id], &Self::account_query(account))?;
        self.send_json(Method::PUT, url, payload).await
    }

    async fn delete_domain(&self, id: DomainId, account: AccountId) -> GatewayResult {
        let id = id.to_string();
        let url = self.url(&["delete_domain", &id], &Self::account_query(account))?;
        self.send(Method::DELETE, url).await
    }
}

#[async_trait]
impl DepartmentGateway for HttpDirectoryClient {
    async fn list_departments(&self) -> GatewayResult {
        let url = self.url(&["list_departments"], &[])?;
        self.send(Method::GET, url).await
    }

    async fn list_departments_by_domain(
        &self,
        domain_id: DomainId,
        account: AccountId,
    ) -> GatewayResult {
        let domain_id = domain_id.to_string();
        let url = self.url(
            &["list_departments_by_domain", &domain_id],
            &Self::account_query(account),
        )?;
        self.send(Method::GET, url).await
    }

    async fn add_department(&self, department: &NewDepartment) -> GatewayResult {
        let url = self.url(&["add_department"], &[])?;
        self.send_json(Method::POST, url, department).await
    }

    async fn update_department(
        &self,
        domain_id: DomainId,
        department_id: DepartmentId,
        update: &DepartmentUpdate,
        account: AccountId,
    ) -> GatewayResult {
        let (domain_id, department_id) = (domain_id.to_string(), department_id.to_string());
        let url = self.url(
            &["update_department", &domain_id, &department_id],
            &Self::account_query(account),
        )?;
        self.send_json(Method::PUT, url, update).await
    }

    async fn delete_department(
        &self,
        domain_id: DomainId,
        department_id: DepartmentId,
        account: AccountId,
    ) -> GatewayResult {
        let (domain_id, department_id) = (domain_id.to_string(), department_id.to_string());
        let url = self.url(
            &["delete_department", &domain_id, &department_id],
            &Self::account_query(account),
        )?;
        self.send(Method::DELETE, url).await
    }
}

#[async_trait]
impl UserGateway for HttpDirectoryClient {
    async fn list_users_by_domain(
        &self,
        domain_id: DomainId,
        status: Option<UserStatus>,
    ) -> GatewayResult {
        let domain_id = domain_id.to_string();
        let query: Vec<(&str, String)> = status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default();
        let url = self.url(&["list_users_by_domain", &domain_id], &query)?;
        self.send(Method::GET, url).await
    }

    async fn add_user(&self, user: &NewUser) -> GatewayResult {
        let url = self.url(&["add_user"], &[])?;
        self.send_json(Method::POST, url, user).await
    }

    async fn update_user(
        &self,
        domain_id: DomainId,
        username: &Username,
        update: &UserUpdate,
        account: AccountId,
    ) -> GatewayResult {
        let domain_id = domain_id.to_string();
        let url = self.url(
            &["update_user", &domain_id, username.as_str()],
            &Self::account_query(account),
        )?;
        self.send_json(Method::PUT, url, update).await
    }

    async fn delete_user(&self, key: &UserKey) -> GatewayResult {
        let url = self.url(&["delete_user"], &[])?;
        self.send_json(Method::DELETE, url, key).await
    }

    async fn enable_user(&self, key: &UserKey) -> GatewayResult {
        let url = self.url(&["enable_user"], &[])?;
        self.send_json(Method::POST, url, key).await
    }

    async fn disable_user(&self, key: &UserKey) -> GatewayResult {
        let url = self.url(&["disable_user"], &[])?;
        self.send_json(Method::POST, url, key).await
    }
}

#[async_trait]
impl AuditLogGateway for HttpDirectoryClient {
    async fn list_logs(&self, account: AccountId, query: &AuditLogQuery) -> GatewayResult {
        let mut params = Self::account_query(account);
        if let Some(endpoint) = &query.endpoint {
            params.push(("endpoint", endpoint.clone()));
        }
        if let Some(operation_type) = query.operation_type {
            params.push(("operation_type", operation_type.as_str().to_string()));
        }
        params.push(("limit", query.limit.to_string()));
        params.push(("offset", query.offset.to_string()));

        let url = self.url(&["logs"], &params)?;
        self.send(Method::GET, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn path_segments_are_escaped() {
        let client = HttpDirectoryClient::new("http://127.0.0.1:8000/api/").unwrap();
        let url = client
            .url(&["update_user", "3", "mehmet ali/x"], &[("user_id", "u".into())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/update_user/3/mehmet%20ali%2Fx?user_id=u"
        );
    }

    #[test]
    fn account_is_sent_as_user_id() {
        let client = HttpDirectoryClient::new("http://127.0.0.1:8000/api").unwrap();
        let account = AccountId(Uuid::nil());
        let url = client
            .url(&["list_domains"], &HttpDirectoryClient::account_query(account))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/list_domains?user_id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn error_message_prefers_body() {
        let err = error_from_body(400, r#"{"message": "Domain bulunamadı"}"#);
        assert_eq!(err.message, "Domain bulunamadı");
        assert_eq!(err.status, Some(400));

        let err = error_from_body(404, "<html>not found</html>");
        assert_eq!(err.message, "HTTP error! status: 404");

        let err = error_from_body(500, r#"{"detail": "boom"}"#);
        assert_eq!(err.message, "HTTP error! status: 500");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpDirectoryClient::new("not a url").is_err());
        assert!(HttpDirectoryClient::new("mailto:admin@odie.local").is_err());
    }
}
