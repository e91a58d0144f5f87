//! GoTrue 兼容的身份服务客户端
//!
//! 会话以 JSON 保存在 [`SessionStorage`] 中，状态变化通过广播通道通知订阅者。

use std::sync::Arc;

use application::{Credentials, IdentityError, IdentityProvider, SessionStorage};
use async_trait::async_trait;
use chrono::Utc;
use domain::{AuthEvent, AuthSession, AuthUser};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// 令牌接口的响应
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self.expires_at.or_else(|| {
            self.expires_in
                .map(|expires_in| Utc::now().timestamp() + expires_in)
        });
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

pub struct HttpIdentityProvider {
    http: Client,
    base_url: Url,
    anon_key: String,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpIdentityProvider {
    pub fn new(
        base_url: &str,
        anon_key: impl Into<String>,
        storage: Arc<dyn SessionStorage>,
        storage_key: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            IdentityError::Transport(format!("invalid identity url {base_url}: {err}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(IdentityError::Transport(format!(
                "invalid identity url {base_url}: cannot be a base"
            )));
        }
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http: Client::new(),
            base_url,
            anon_key: anon_key.into(),
            storage,
            storage_key: storage_key.into(),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::Transport(format!("invalid identity url {}", self.base_url)))?
            .pop_if_empty()
            .extend(["auth", "v1", path]);
        Ok(url)
    }

    fn token_endpoint(&self, grant_type: &str) -> Result<Url, IdentityError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    async fn call(&self, request: RequestBuilder) -> Result<Value, IdentityError> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "身份服务请求失败");
                IdentityError::Transport(err.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            return Ok(body);
        }

        let message = rejection_message(&body)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        tracing::warn!(status = status.as_u16(), error = %message, "身份服务拒绝请求");
        Err(IdentityError::Rejected {
            message,
            status: Some(status.as_u16()),
        })
    }

    fn decode_session(body: Value) -> Result<AuthSession, IdentityError> {
        serde_json::from_value::<TokenResponse>(body)
            .map(TokenResponse::into_session)
            .map_err(|err| IdentityError::Transport(format!("invalid session response: {err}")))
    }

    fn stored_session(&self) -> Result<Option<AuthSession>, IdentityError> {
        let Some(raw) = self.storage.load(&self.storage_key).map_err(storage_failure)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!(error = %err, "本地会话无法解析，已丢弃");
                self.storage.remove(&self.storage_key).map_err(storage_failure)?;
                Ok(None)
            }
        }
    }

    fn persist(&self, session: &AuthSession) -> Result<(), IdentityError> {
        let raw = serde_json::to_string(session)
            .map_err(|err| IdentityError::Transport(err.to_string()))?;
        self.storage
            .save(&self.storage_key, &raw)
            .map_err(storage_failure)
    }

    fn publish(&self, event: AuthEvent) {
        if self.events.receiver_count() == 0 {
            return;
        }
        // 只在没有接收者时失败
        let _ = self.events.send(event);
    }
}

fn storage_failure(err: application::StorageError) -> IdentityError {
    IdentityError::Transport(err.to_string())
}

/// 依次尝试 `error_description`、`msg`、`message`、`error`
fn rejection_message(body: &Value) -> Option<String> {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<AuthSession>, IdentityError> {
        let request = self.http.post(self.endpoint("signup")?).json(&json!({
            "email": credentials.email,
            "password": credentials.password,
        }));
        let body = self.call(request).await?;

        // 需要邮箱确认时只返回用户对象
        if body.get("access_token").is_none() {
            return Ok(None);
        }
        let session = Self::decode_session(body)?;
        self.persist(&session)?;
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(Some(session))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, IdentityError> {
        let request = self.http.post(self.token_endpoint("password")?).json(&json!({
            "email": credentials.email,
            "password": credentials.password,
        }));
        let session = Self::decode_session(self.call(request).await?)?;

        self.persist(&session)?;
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// 本地会话总会被清除；服务端登出失败时返回错误
    async fn sign_out(&self) -> Result<(), IdentityError> {
        let session = self.stored_session().unwrap_or_default();
        self.storage
            .remove(&self.storage_key)
            .map_err(storage_failure)?;
        self.publish(AuthEvent::SignedOut);

        let Some(session) = session else {
            return Ok(());
        };
        let request = self
            .http
            .post(self.endpoint("logout")?)
            .bearer_auth(&session.access_token);
        self.call(request).await.map(|_| ())
    }

    async fn get_session(&self) -> Result<Option<AuthSession>, IdentityError> {
        match self.stored_session()? {
            Some(session) if session.is_expired() => {
                tracing::debug!("会话已过期，尝试刷新");
                self.refresh_session().await.map(Some)
            }
            session => Ok(session),
        }
    }

    async fn refresh_session(&self) -> Result<AuthSession, IdentityError> {
        let Some(current) = self.stored_session()? else {
            return Err(IdentityError::rejected("Auth session missing!"));
        };

        let request = self
            .http
            .post(self.token_endpoint("refresh_token")?)
            .json(&json!({ "refresh_token": current.refresh_token }));
        let session = Self::decode_session(self.call(request).await?)?;

        self.persist(&session)?;
        self.publish(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_storage::MemorySessionStorage;

    fn provider() -> HttpIdentityProvider {
        HttpIdentityProvider::new(
            "https://auth.odie.local",
            "anon",
            Arc::new(MemorySessionStorage::default()),
            domain::SESSION_STORAGE_KEY,
        )
        .unwrap()
    }

    #[test]
    fn endpoints() {
        let provider = provider();
        assert_eq!(
            provider.token_endpoint("password").unwrap().as_str(),
            "https://auth.odie.local/auth/v1/token?grant_type=password"
        );
        assert_eq!(
            provider.endpoint("logout").unwrap().as_str(),
            "https://auth.odie.local/auth/v1/logout"
        );
    }

    #[test]
    fn rejection_message_order() {
        let body = json!({"error": "invalid_grant", "error_description": "Invalid login credentials"});
        assert_eq!(
            rejection_message(&body).as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            rejection_message(&json!({"code": 400, "msg": "User already registered"})).as_deref(),
            Some("User already registered")
        );
        assert_eq!(rejection_message(&json!({"code": 500})), None);
    }

    #[test]
    fn expiry_derived_from_expires_in() {
        let response: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": {"id": "6f1c1d2e-8a61-4c3b-9d4e-0f7a2b3c4d5e", "email": "admin@odie.local"}
        }))
        .unwrap();
        let session = response.into_session();
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at > Utc::now().timestamp() + 3500);
        assert!(!session.is_expired());
    }
}
